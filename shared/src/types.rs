//! Common types for the shared crate

use serde::{Deserialize, Serialize};

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Server-assigned entity id (products, menus, documents, users...)
pub type EntityId = i64;

/// Permission string held by a user, e.g. `purchase_order:approve`
///
/// `*` grants everything, `purchase_order:*` grants every action on one
/// resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(pub String);

impl Permission {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Check if this permission grants access to the given resource action
    pub fn grants(&self, action: &str) -> bool {
        if self.0 == "*" {
            return true;
        }
        if let Some(prefix) = self.0.strip_suffix(":*") {
            return action
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with(':'));
        }
        self.0 == action
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The user performing an action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: EntityId,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Actor {
    pub fn new(user_id: EntityId, permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            user_id,
            permissions: permissions.into_iter().collect(),
        }
    }

    pub fn can(&self, action: &str) -> bool {
        self.permissions.iter().any(|p| p.grants(action))
    }
}
