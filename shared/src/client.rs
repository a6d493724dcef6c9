//! Auth API DTOs shared by the client and the CLI

use serde::{Deserialize, Serialize};

use crate::types::{Actor, EntityId, Permission};

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response data
///
/// The session itself travels as a cookie; the body only describes the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserInfo,
}

/// Logged-in user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: EntityId,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl UserInfo {
    /// The workflow actor for this user
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.permissions.iter().cloned())
    }

    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}
