//! Role Model

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Permission};

/// Named permission set assigned to users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// e.g. `["*"]`, `["purchase_order:check", "store_requisition:*"]`
    #[serde(default)]
    pub permissions: Vec<Permission>,
    /// Built-in roles cannot be deleted
    #[serde(default)]
    pub is_system: bool,
}

impl Role {
    pub fn grants(&self, action: &str) -> bool {
        self.permissions.iter().any(|p| p.grants(action))
    }
}

/// Create role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub permissions: Vec<Permission>,
}

/// Update role payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,
}
