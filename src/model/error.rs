//! Validation errors for drive data
//!
//! These are raised before any request is made, so a malformed tag name or
//! color never reaches the server.

use thiserror::Error;

/// Input validation failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Tag name is empty
    #[error("Tag name cannot be empty")]
    EmptyTagName,

    /// Tag name exceeds the maximum length
    #[error("Tag name is too long: {len} characters (max {max})")]
    TagNameTooLong { len: usize, max: usize },

    /// Tag name contains characters outside `[A-Za-z0-9_- ]`
    #[error("Invalid tag name '{0}': only letters, digits, '_', '-' and spaces are allowed")]
    InvalidTagName(String),

    /// Color is not a `#rrggbb` hex string
    #[error("Invalid color '{0}': expected #rrggbb")]
    InvalidColor(String),

    /// Filename is empty or whitespace
    #[error("Filename cannot be empty")]
    EmptyFilename,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_long_message() {
        let error = ValidationError::TagNameTooLong { len: 25, max: 20 };
        assert_eq!(
            error.to_string(),
            "Tag name is too long: 25 characters (max 20)"
        );
    }

    #[test]
    fn test_invalid_color_message() {
        let error = ValidationError::InvalidColor("red".to_string());
        assert!(error.to_string().contains("'red'"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ValidationError>();
    }
}
