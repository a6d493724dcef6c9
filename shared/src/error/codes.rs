//! Unified error codes for Hearth
//!
//! Error codes are shared by the client library, the CLI and anything that
//! renders errors for a user. They are grouped by range:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Document workflow errors
//! - 5xxx: Line item errors
//! - 6xxx: Catalog (master data) errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as `u16` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Session has expired and could not be refreshed
    SessionExpired = 1005,
    /// Account is disabled
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Only the document owner may do this
    NotDocumentOwner = 2002,

    // ==================== 4xxx: Document workflow ====================
    /// Document not found
    DocumentNotFound = 4001,
    /// Action is not valid from the current status
    InvalidTransition = 4002,
    /// Document status does not allow item changes
    DocumentNotEditable = 4003,
    /// Rejection requires a reason
    RejectReasonRequired = 4004,
    /// Source document already aggregated
    SourceAlreadySelected = 4005,
    /// Source document is not part of the aggregate
    SourceNotSelected = 4006,

    // ==================== 5xxx: Line items ====================
    /// Another item already references the same product/menu
    DuplicateItem = 5001,
    /// Line item not found
    ItemNotFound = 5002,
    /// Quantity must be a positive integer
    InvalidQuantity = 5003,
    /// Unit price must not be negative
    InvalidPrice = 5004,
    /// Item was derived from a source document and cannot be removed
    ItemLocked = 5005,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Menu item not found
    MenuNotFound = 6101,
    /// Room not found
    RoomNotFound = 6201,
    /// Supplier not found
    SupplierNotFound = 6301,
    /// Staff member not found
    StaffNotFound = 6401,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Network error talking to the server
    NetworkError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Printer error
    PrinterError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Success",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field missing",
            ErrorCode::ValueOutOfRange => "Value out of range",

            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::SessionExpired => "Session expired, please log in again",
            ErrorCode::AccountDisabled => "Account is disabled",

            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::NotDocumentOwner => "Only the document owner can do this",

            ErrorCode::DocumentNotFound => "Document not found",
            ErrorCode::InvalidTransition => "Action not allowed in the current status",
            ErrorCode::DocumentNotEditable => "Document can no longer be edited",
            ErrorCode::RejectReasonRequired => "A reason is required to reject",
            ErrorCode::SourceAlreadySelected => "Source document already selected",
            ErrorCode::SourceNotSelected => "Source document is not selected",

            ErrorCode::DuplicateItem => "Item already exists in this document",
            ErrorCode::ItemNotFound => "Item not found",
            ErrorCode::InvalidQuantity => "Quantity must be at least 1",
            ErrorCode::InvalidPrice => "Price cannot be negative",
            ErrorCode::ItemLocked => "Item comes from the source document and cannot be removed",

            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::MenuNotFound => "Menu item not found",
            ErrorCode::RoomNotFound => "Room not found",
            ErrorCode::SupplierNotFound => "Supplier not found",
            ErrorCode::StaffNotFound => "Staff member not found",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::PrinterError => "Printer error",
        }
    }

    /// Get the HTTP status a server would answer with for this code
    pub fn http_status(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            ErrorCode::Success => StatusCode::OK,
            ErrorCode::NotFound
            | ErrorCode::DocumentNotFound
            | ErrorCode::ItemNotFound
            | ErrorCode::ProductNotFound
            | ErrorCode::MenuNotFound
            | ErrorCode::RoomNotFound
            | ErrorCode::SupplierNotFound
            | ErrorCode::StaffNotFound => StatusCode::NOT_FOUND,
            ErrorCode::AlreadyExists | ErrorCode::DuplicateItem => StatusCode::CONFLICT,
            ErrorCode::NotAuthenticated
            | ErrorCode::InvalidCredentials
            | ErrorCode::SessionExpired => StatusCode::UNAUTHORIZED,
            ErrorCode::AccountDisabled
            | ErrorCode::PermissionDenied
            | ErrorCode::NotDocumentOwner => StatusCode::FORBIDDEN,
            ErrorCode::InvalidTransition
            | ErrorCode::DocumentNotEditable
            | ErrorCode::SourceAlreadySelected
            | ErrorCode::SourceNotSelected
            | ErrorCode::ItemLocked => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InternalError
            | ErrorCode::NetworkError
            | ErrorCode::ConfigError
            | ErrorCode::PrinterError
            | ErrorCode::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when a numeric value does not map to an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,
            7 => ErrorCode::RequiredField,
            8 => ErrorCode::ValueOutOfRange,
            1001 => ErrorCode::NotAuthenticated,
            1002 => ErrorCode::InvalidCredentials,
            1005 => ErrorCode::SessionExpired,
            1007 => ErrorCode::AccountDisabled,
            2001 => ErrorCode::PermissionDenied,
            2002 => ErrorCode::NotDocumentOwner,
            4001 => ErrorCode::DocumentNotFound,
            4002 => ErrorCode::InvalidTransition,
            4003 => ErrorCode::DocumentNotEditable,
            4004 => ErrorCode::RejectReasonRequired,
            4005 => ErrorCode::SourceAlreadySelected,
            4006 => ErrorCode::SourceNotSelected,
            5001 => ErrorCode::DuplicateItem,
            5002 => ErrorCode::ItemNotFound,
            5003 => ErrorCode::InvalidQuantity,
            5004 => ErrorCode::InvalidPrice,
            5005 => ErrorCode::ItemLocked,
            6001 => ErrorCode::ProductNotFound,
            6101 => ErrorCode::MenuNotFound,
            6201 => ErrorCode::RoomNotFound,
            6301 => ErrorCode::SupplierNotFound,
            6401 => ErrorCode::StaffNotFound,
            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::NetworkError,
            9003 => ErrorCode::ConfigError,
            9004 => ErrorCode::PrinterError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
