//! Workflow errors

use thiserror::Error;

use super::action::{DocumentKind, WorkflowAction};
use super::line_item::LineItemId;
use crate::error::{AppError, ErrorCode};
use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("cannot {action} a {kind} in status {from}")]
    InvalidTransition {
        kind: DocumentKind,
        from: String,
        action: WorkflowAction,
    },

    #[error("{kind} in status {status} cannot be edited")]
    NotEditable { kind: DocumentKind, status: String },

    #[error("permission `{permission}` required")]
    PermissionDenied { permission: String },

    #[error("a reason is required to reject")]
    ReasonRequired,

    #[error("an item for {key} already exists")]
    DuplicateItem { key: EntityId },

    #[error("item {0} not found")]
    ItemNotFound(LineItemId),

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("unit price cannot be negative")]
    InvalidPrice,

    #[error("item {0} was taken from the source order and cannot be removed")]
    ItemLocked(LineItemId),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("source document {0} is already selected")]
    SourceAlreadySelected(EntityId),

    #[error("source document {0} is not selected")]
    SourceNotSelected(EntityId),
}

impl WorkflowError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            Self::NotEditable { .. } => ErrorCode::DocumentNotEditable,
            Self::PermissionDenied { .. } => ErrorCode::PermissionDenied,
            Self::ReasonRequired => ErrorCode::RejectReasonRequired,
            Self::DuplicateItem { .. } => ErrorCode::DuplicateItem,
            Self::ItemNotFound(_) => ErrorCode::ItemNotFound,
            Self::InvalidQuantity => ErrorCode::InvalidQuantity,
            Self::InvalidPrice => ErrorCode::InvalidPrice,
            Self::ItemLocked(_) => ErrorCode::ItemLocked,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::SourceAlreadySelected(_) => ErrorCode::SourceAlreadySelected,
            Self::SourceNotSelected(_) => ErrorCode::SourceNotSelected,
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        let code = err.code();
        let app = AppError::with_message(code, err.to_string());
        match err {
            WorkflowError::PermissionDenied { permission } => {
                app.with_detail("permission", permission)
            }
            WorkflowError::DuplicateItem { key } => app.with_detail("key", key),
            _ => app,
        }
    }
}

impl From<validator::ValidationErrors> for WorkflowError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        Self::Validation(format!("invalid fields: {}", fields.join(", ")))
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_app_error_keeps_code() {
        let err = WorkflowError::DuplicateItem { key: 42 };
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::DuplicateItem);
        assert_eq!(app.details.unwrap()["key"], serde_json::json!(42));
    }

    #[test]
    fn test_transition_message() {
        let err = WorkflowError::InvalidTransition {
            kind: DocumentKind::PurchaseOrder,
            from: "REQUESTED".into(),
            action: WorkflowAction::Approve,
        };
        assert_eq!(err.to_string(), "cannot approve a purchase order in status REQUESTED");
        assert_eq!(err.code(), ErrorCode::InvalidTransition);
    }
}
