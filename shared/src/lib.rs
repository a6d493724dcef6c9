//! Shared types for Hearth
//!
//! Domain types used by the client, the CLI and the printer glue: the
//! document workflow, master-data models, error codes, push messages and
//! list/paging DTOs.

pub mod client;
pub mod document;
pub mod error;
pub mod message;
pub mod models;
pub mod request;
pub mod response;
pub mod types;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use document::{DocumentKind, WorkflowAction, WorkflowError, WorkflowStatus};
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use message::{EventType, PushMessage};
pub use request::ListQuery;
pub use response::PaginatedResponse;
