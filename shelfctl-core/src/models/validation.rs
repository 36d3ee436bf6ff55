//! Validation error types

use std::fmt;

/// Validation error for user-entered fields.
///
/// These fire before any SQL statement runs; a failed validation leaves the
/// store untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// String doesn't match the required format (name/email/phone)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Input could not be parsed as a YYYY-MM-DD date
    InvalidDate { value: String },

    /// Input could not be parsed as an integer ID
    NotAnInteger { value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} is required", field),
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidDate { value } => {
                write!(f, "'{}' is not a valid date in the format YYYY-MM-DD", value)
            }
            Self::NotAnInteger { value } => {
                write!(f, "'{}' is not a valid integer ID", value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::Empty { field: "email" };
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::InvalidDate {
            value: "2024-13-40".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "'2024-13-40' is not a valid date in the format YYYY-MM-DD"
        );
    }
}
