//! Unified error system for Hearth
//!
//! - [`ErrorCode`]: stable numeric codes for every error Hearth can surface
//! - [`ErrorCategory`]: classification of codes by range
//! - [`AppError`]: code + message + optional details
//! - [`ApiResponse`]: the JSON envelope used by the back-office API
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::DuplicateItem).with_detail("key", 42);
//! assert_eq!(err.code.code(), 5001);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
