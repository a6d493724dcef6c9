use serde::{Deserialize, Serialize};
use std::fmt;

use crate::document::DocumentKind;
use crate::types::{EntityId, Timestamp};

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    #[default]
    Info,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Document a notification points at, e.g. "PO-0012 was rejected"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub kind: DocumentKind,
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

/// Sent once by the client right after connecting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakePayload {
    pub version: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_version: Option<String>,
    /// Logged-in user, so the server can route personal notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<EntityId>,
}

/// "New notification" event pushed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Id of the stored notification, usable with `PATCH /notifications/:id/read`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<EntityId>,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub level: NotificationLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentRef>,
    #[serde(default)]
    pub created_at: Timestamp,
}

impl NotificationPayload {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            notification_id: None,
            title: title.into(),
            message: message.into(),
            level: NotificationLevel::Info,
            document: None,
            created_at: crate::util::now_millis(),
        }
    }

    pub fn with_level(mut self, level: NotificationLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_document(mut self, kind: DocumentKind, id: EntityId, number: Option<String>) -> Self {
        self.document = Some(DocumentRef { kind, id, number });
        self
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.notification_id = Some(id);
        self
    }
}
