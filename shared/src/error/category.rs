//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category, determined by the leading digit of the error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Document workflow errors (4xxx)
    Workflow,
    /// Line item errors (5xxx)
    LineItem,
    /// Catalog errors (6xxx)
    Catalog,
    /// System errors (9xxx and anything unmapped)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            4000..5000 => Self::Workflow,
            5000..6000 => Self::LineItem,
            6000..7000 => Self::Catalog,
            _ => Self::System,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Workflow => "workflow",
            Self::LineItem => "line_item",
            Self::Catalog => "catalog",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1005), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2002), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(3000), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(4002), ErrorCategory::Workflow);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::LineItem);
        assert_eq!(ErrorCategory::from_code(6201), ErrorCategory::Catalog);
        assert_eq!(ErrorCategory::from_code(9004), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::DuplicateItem.category(), ErrorCategory::LineItem);
        assert_eq!(
            ErrorCode::InvalidTransition.category(),
            ErrorCategory::Workflow
        );
        assert_eq!(ErrorCode::SessionExpired.category(), ErrorCategory::Auth);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::LineItem).unwrap();
        assert_eq!(json, "\"line_item\"");
        assert_eq!(ErrorCategory::LineItem.name(), "line_item");
    }
}
