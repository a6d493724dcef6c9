//! Client error types

use serde_json::Value;
use shared::{AppError, ErrorCode, WorkflowError};
use std::collections::HashMap;
use thiserror::Error;

/// How a failure should be surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input: highlight fields, keep the form open
    Validation,
    /// Same product/menu already on the document
    Duplicate,
    /// The server refused an otherwise well-formed request
    ServerRejection,
    /// Session is gone, the user must log in again
    AuthExpired,
    /// Server or printer could not be reached
    Network,
    /// Bug or unexpected payload
    Internal,
}

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error envelope returned by the server
    #[error("{message}")]
    Api {
        status: u16,
        code: ErrorCode,
        message: String,
        details: Option<HashMap<String, Value>>,
    },

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Session expired and could not be refreshed
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error reported without a structured envelope
    #[error("Validation error: {0}")]
    Validation(String),

    /// Rejected locally before anything was sent
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("Print error: {0}")]
    Print(#[from] hearth_printer::PrintError),

    /// Push channel failure
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Api { code, status, .. } => kind_of_code(*code, *status),
            ClientError::Workflow(err) => kind_of_code(err.code(), 400),
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::Unauthorized | ClientError::SessionExpired => ErrorKind::AuthExpired,
            ClientError::Forbidden(_) | ClientError::NotFound(_) => ErrorKind::ServerRejection,
            ClientError::Http(_) | ClientError::Print(_) | ClientError::Connection(_) | ClientError::Io(_) => {
                ErrorKind::Network
            }
            ClientError::Config(_)
            | ClientError::InvalidResponse(_)
            | ClientError::Internal(_)
            | ClientError::Serialization(_) => ErrorKind::Internal,
        }
    }

    /// Per-field messages from a validation envelope
    pub fn field_errors(&self) -> Vec<(String, String)> {
        let ClientError::Api {
            details: Some(details),
            ..
        } = self
        else {
            return Vec::new();
        };
        let mut fields: Vec<(String, String)> = details
            .iter()
            .filter_map(|(field, value)| match value {
                Value::String(msg) => Some((field.clone(), msg.clone())),
                Value::Array(msgs) => msgs
                    .first()
                    .and_then(Value::as_str)
                    .map(|msg| (field.clone(), msg.to_string())),
                _ => None,
            })
            .collect();
        fields.sort();
        fields
    }

    pub fn is_auth_expired(&self) -> bool {
        self.kind() == ErrorKind::AuthExpired
    }
}

fn kind_of_code(code: ErrorCode, status: u16) -> ErrorKind {
    match code {
        ErrorCode::DuplicateItem | ErrorCode::AlreadyExists => ErrorKind::Duplicate,
        ErrorCode::ValidationFailed
        | ErrorCode::RequiredField
        | ErrorCode::ValueOutOfRange
        | ErrorCode::InvalidQuantity
        | ErrorCode::InvalidPrice
        | ErrorCode::RejectReasonRequired => ErrorKind::Validation,
        ErrorCode::NotAuthenticated | ErrorCode::SessionExpired => ErrorKind::AuthExpired,
        ErrorCode::NetworkError | ErrorCode::PrinterError => ErrorKind::Network,
        ErrorCode::Unknown | ErrorCode::InternalError if status >= 500 => ErrorKind::Internal,
        _ => ErrorKind::ServerRejection,
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api {
                code,
                message,
                details,
                ..
            } => AppError {
                code,
                message,
                details,
            },
            ClientError::Workflow(err) => err.into(),
            ClientError::Unauthorized => AppError::not_authenticated(),
            ClientError::SessionExpired => AppError::session_expired(),
            ClientError::Forbidden(msg) => AppError::permission_denied(msg),
            ClientError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            ClientError::Validation(msg) => AppError::validation(msg),
            ClientError::Print(err) => AppError::with_message(ErrorCode::PrinterError, err.to_string()),
            ClientError::Config(msg) => AppError::with_message(ErrorCode::ConfigError, msg),
            err @ (ClientError::Http(_) | ClientError::Connection(_) | ClientError::Io(_)) => {
                AppError::network(err.to_string())
            }
            err => AppError::internal(err.to_string()),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::document::LineItemId;

    fn api(status: u16, code: ErrorCode) -> ClientError {
        ClientError::Api {
            status,
            code,
            message: code.message().to_string(),
            details: None,
        }
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(api(409, ErrorCode::DuplicateItem).kind(), ErrorKind::Duplicate);
        assert_eq!(api(400, ErrorCode::ValidationFailed).kind(), ErrorKind::Validation);
        assert_eq!(api(409, ErrorCode::InvalidTransition).kind(), ErrorKind::ServerRejection);
        assert_eq!(api(500, ErrorCode::InternalError).kind(), ErrorKind::Internal);
        assert_eq!(ClientError::SessionExpired.kind(), ErrorKind::AuthExpired);
        assert_eq!(
            ClientError::Workflow(WorkflowError::DuplicateItem { key: 3 }).kind(),
            ErrorKind::Duplicate
        );
        assert_eq!(
            ClientError::Workflow(WorkflowError::ItemLocked(LineItemId::Persisted(1))).kind(),
            ErrorKind::ServerRejection
        );
    }

    #[test]
    fn test_field_errors() {
        let mut details = HashMap::new();
        details.insert("quantity".to_string(), Value::from("must be positive"));
        details.insert("name".to_string(), serde_json::json!(["too long", "other"]));
        details.insert("count".to_string(), Value::from(2));
        let err = ClientError::Api {
            status: 400,
            code: ErrorCode::ValidationFailed,
            message: "Validation failed".into(),
            details: Some(details),
        };
        assert_eq!(
            err.field_errors(),
            vec![
                ("name".to_string(), "too long".to_string()),
                ("quantity".to_string(), "must be positive".to_string()),
            ]
        );
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = ClientError::SessionExpired.into();
        assert_eq!(app.code, ErrorCode::SessionExpired);

        let app: AppError = ClientError::Connection("refused".into()).into();
        assert_eq!(app.code, ErrorCode::NetworkError);
    }
}
