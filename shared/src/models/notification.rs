//! Notification Model

use serde::{Deserialize, Serialize};

use crate::message::{DocumentRef, NotificationLevel, NotificationPayload};
use crate::types::{EntityId, Timestamp};

/// Stored notification as listed by `GET /notifications`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: EntityId,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub level: NotificationLevel,
    #[serde(default)]
    pub document: Option<DocumentRef>,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: Timestamp,
}

impl Notification {
    /// Build the listing entry from a pushed event, when it carries an id
    pub fn from_push(payload: &NotificationPayload) -> Option<Self> {
        Some(Self {
            id: payload.notification_id?,
            title: payload.title.clone(),
            message: payload.message.clone(),
            level: payload.level,
            document: payload.document.clone(),
            is_read: false,
            created_at: payload.created_at,
        })
    }
}

/// Unread counter shown on the notification bell
pub fn unread_count(list: &[Notification]) -> usize {
    list.iter().filter(|n| !n.is_read).count()
}
