use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::document::{Document, LineItem, LineItemInput, RejectReason, WorkflowAction, WorkflowStatus};
use shared::types::EntityId;
use shared::{DocumentKind, ListQuery, PaginatedResponse, WorkflowError};
use std::marker::PhantomData;

use super::{Template, fetch_template};
use crate::error::ClientResult;
use crate::http::{HttpClient, NetworkHttpClient};

/// Body of `PATCH /<resource>/:id/{action}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<Option<RejectReason>> for ActionRequest {
    fn from(reason: Option<RejectReason>) -> Self {
        Self {
            reason: reason.map(|r| r.reason),
        }
    }
}

/// Endpoints of one document kind, e.g. `/purchase-orders`
pub struct DocumentApi<'a, S, P, C = NetworkHttpClient> {
    http: &'a C,
    _doc: PhantomData<fn() -> (S, P)>,
}

impl<'a, S, P, C> DocumentApi<'a, S, P, C>
where
    S: WorkflowStatus,
    P: Serialize + DeserializeOwned + Send + Sync + 'static,
    C: HttpClient,
{
    pub fn new(http: &'a C) -> Self {
        Self {
            http,
            _doc: PhantomData,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        S::KIND
    }

    fn path(&self, tail: std::fmt::Arguments<'_>) -> String {
        format!("{}{}", S::KIND.resource(), tail)
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<PaginatedResponse<Document<S, P>>> {
        self.http
            .get_query(S::KIND.resource(), &query.to_pairs())
            .await
    }

    pub async fn get(&self, id: EntityId) -> ClientResult<Document<S, P>> {
        self.http.get(&self.path(format_args!("/{}", id))).await
    }

    /// Save a new document with its rows; the reply carries server ids
    #[tracing::instrument(skip(self, doc), fields(kind = %S::KIND, number = %doc.number))]
    pub async fn create(&self, doc: &Document<S, P>) -> ClientResult<Document<S, P>> {
        self.http.post(S::KIND.resource(), doc).await
    }

    /// Save header changes of a persisted document
    pub async fn update(&self, doc: &Document<S, P>) -> ClientResult<Document<S, P>> {
        let id = doc
            .id
            .ok_or_else(|| WorkflowError::Validation("document has not been saved".into()))?;
        self.http.put(&self.path(format_args!("/{}", id)), doc).await
    }

    pub async fn delete(&self, id: EntityId) -> ClientResult<()> {
        self.http.delete(&self.path(format_args!("/{}", id))).await
    }

    /// Ask the server to run `action`; the server decides
    #[tracing::instrument(skip(self, reason), fields(kind = %S::KIND))]
    pub async fn action(
        &self,
        id: EntityId,
        action: WorkflowAction,
        reason: Option<RejectReason>,
    ) -> ClientResult<Document<S, P>> {
        let body = ActionRequest::from(reason);
        self.http
            .patch(&self.path(format_args!("/{}/{}", id, action.as_str())), &body)
            .await
    }

    pub async fn add_item(&self, id: EntityId, input: &LineItemInput) -> ClientResult<LineItem> {
        self.http
            .post(&self.path(format_args!("/{}/items", id)), input)
            .await
    }

    pub async fn update_item(
        &self,
        id: EntityId,
        item_id: EntityId,
        input: &LineItemInput,
    ) -> ClientResult<LineItem> {
        self.http
            .put(&self.path(format_args!("/{}/items/{}", id, item_id)), input)
            .await
    }

    pub async fn delete_item(&self, id: EntityId, item_id: EntityId) -> ClientResult<()> {
        self.http
            .delete(&self.path(format_args!("/{}/items/{}", id, item_id)))
            .await
    }

    pub async fn template(&self) -> ClientResult<Template> {
        fetch_template(self.http, S::KIND.resource()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_body() {
        let body = ActionRequest::from(RejectReason::parse(Some(" price too high ")).ok());
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"reason":"price too high"}"#
        );
        assert_eq!(serde_json::to_string(&ActionRequest::default()).unwrap(), "{}");
    }
}
