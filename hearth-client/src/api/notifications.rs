use shared::models::Notification;
use shared::types::EntityId;
use shared::{ListQuery, PaginatedResponse};

use crate::error::ClientResult;
use crate::http::{HttpClient, NetworkHttpClient};

pub struct NotificationApi<'a, C = NetworkHttpClient> {
    http: &'a C,
}

impl<'a, C: HttpClient> NotificationApi<'a, C> {
    pub fn new(http: &'a C) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<PaginatedResponse<Notification>> {
        self.http.get_query("notifications", &query.to_pairs()).await
    }

    pub async fn mark_read(&self, id: EntityId) -> ClientResult<()> {
        self.http
            .patch(&format!("notifications/{}/read", id), &serde_json::json!({}))
            .await
    }
}
