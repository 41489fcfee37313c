//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Coordinates outside the valid latitude/longitude ranges
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// A location string could not be parsed
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// Loosely-typed input does not name any variant of a flag
    #[error("Unknown {flag} value: {input}")]
    UnknownFlag {
        /// Flag type name
        flag: &'static str,
        /// The rejected input, rendered for diagnostics
        input: String,
    },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create an unknown flag error
    pub fn unknown_flag(flag: &'static str, input: impl Into<String>) -> Self {
        Self::UnknownFlag {
            flag,
            input: input.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_flag_creates_correct_error() {
        let err = DomainError::unknown_flag("SortRule", "sideways");
        match err {
            DomainError::UnknownFlag { flag, input } => {
                assert_eq!(flag, "SortRule");
                assert_eq!(input, "sideways");
            },
            _ => unreachable!("Expected UnknownFlag error"),
        }
    }

    #[test]
    fn unknown_flag_error_message_is_correct() {
        let err = DomainError::unknown_flag("DataType", "xxx");
        assert_eq!(err.to_string(), "Unknown DataType value: xxx");
    }

    #[test]
    fn invalid_location_error_message() {
        let err = DomainError::InvalidLocation("abc".to_string());
        assert_eq!(err.to_string(), "Invalid location: abc");
    }
}
