//! AMap error types

use std::fmt;

use domain::{DomainError, RouteKey};
use thiserror::Error;

use crate::envelope::AnyEnvelope;

/// Diagnostic code carried by every batch aggregate error
pub const BATCH_ERROR_CODE: i64 = 30001;

/// Diagnostic message carried by every batch aggregate error
pub const BATCH_ERROR_MESSAGE: &str = "ENGINE_RESPONSE_DATA_ERROR";

/// Errors that can occur during AMap operations
#[derive(Debug, Error)]
pub enum AmapError {
    /// The vendor reported a non-ok status
    #[error(transparent)]
    Status(Box<StatusError>),

    /// One or more batch items failed
    #[error(transparent)]
    Batch(BatchError),

    /// An entity property outside its declared schema was read
    #[error("Unknown attribute '{attribute}' on {entity}")]
    UnknownAttribute {
        /// Entity kind name
        entity: &'static str,
        /// Requested property
        attribute: String,
    },

    /// JSON could not be parsed or has an unrecognized shape
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Request parameters are missing or invalid
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// No route registered for the key
    #[error("No route registered for {0}")]
    UnknownRoute(RouteKey),

    /// Connection to the web service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl AmapError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }

    /// Vendor status code, if this is a status error
    #[must_use]
    pub fn status_code(&self) -> Option<i64> {
        match self {
            Self::Status(err) => Some(err.code),
            Self::Batch(err) => Some(err.code),
            _ => None,
        }
    }
}

impl From<DomainError> for AmapError {
    fn from(err: DomainError) -> Self {
        Self::InvalidParams(err.to_string())
    }
}

impl From<serde_json::Error> for AmapError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload(err.to_string())
    }
}

impl From<StatusError> for AmapError {
    fn from(err: StatusError) -> Self {
        Self::Status(Box::new(err))
    }
}

impl From<BatchError> for AmapError {
    fn from(err: BatchError) -> Self {
        Self::Batch(err)
    }
}

/// Non-ok vendor status with a back-reference to the envelope that raised it
#[derive(Debug, Clone)]
pub struct StatusError {
    /// Vendor status code
    pub code: i64,
    /// Vendor message
    pub message: Option<String>,
    /// Vendor detail (v4 only)
    pub detail: Option<String>,
    /// Envelope the status was read from, if any
    pub envelope: Option<AnyEnvelope>,
}

impl StatusError {
    /// Message, falling back to detail when the message is empty
    #[must_use]
    pub fn summary(&self) -> &str {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .or(self.detail.as_deref())
            .unwrap_or_default()
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AMAP-ERROR: {}-{}", self.code, self.summary())
    }
}

impl std::error::Error for StatusError {}

/// Stage of the batch pipeline an aggregate error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    /// Preparing sub-requests
    Prepare,
    /// Decoding sub-responses
    Decode,
    /// Checking sub-response status
    Status,
}

impl fmt::Display for BatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Prepare => "prepare",
            Self::Decode => "decode",
            Self::Status => "status",
        })
    }
}

/// Aggregate of per-item batch failures
///
/// `outcomes` has one slot per item in input order: `None` for success, the
/// item's error for failure.
#[derive(Debug)]
pub struct BatchError {
    /// Pipeline stage
    pub phase: BatchPhase,
    /// Always [`BATCH_ERROR_CODE`]
    pub code: i64,
    /// Always [`BATCH_ERROR_MESSAGE`]
    pub message: &'static str,
    /// Per-position outcomes
    pub outcomes: Vec<Option<AmapError>>,
}

impl BatchError {
    /// Create an aggregate error from positional outcomes
    #[must_use]
    pub fn new(phase: BatchPhase, outcomes: Vec<Option<AmapError>>) -> Self {
        Self {
            phase,
            code: BATCH_ERROR_CODE,
            message: BATCH_ERROR_MESSAGE,
            outcomes,
        }
    }

    /// Positions that failed, ascending
    #[must_use]
    pub fn failed_positions(&self) -> Vec<usize> {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.as_ref().map(|_| i))
            .collect()
    }

    /// Number of failed items
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_some()).count()
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AMAP-ERROR: {}-{} ({} of {} failed during {})",
            self.code,
            self.message,
            self.failed_count(),
            self.outcomes.len(),
            self.phase
        )
    }
}

impl std::error::Error for BatchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(AmapError::ConnectionFailed("test".to_string()).is_retryable());
        assert!(AmapError::RequestFailed("test".to_string()).is_retryable());
        assert!(AmapError::Timeout { timeout_secs: 30 }.is_retryable());
        assert!(
            AmapError::RateLimitExceeded {
                retry_after_secs: Some(60)
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!AmapError::MalformedPayload("test".to_string()).is_retryable());
        assert!(!AmapError::InvalidParams("test".to_string()).is_retryable());
        assert!(!AmapError::ConfigurationError("test".to_string()).is_retryable());
        assert!(!AmapError::UnknownRoute(RouteKey::Suggest).is_retryable());
        assert!(
            !AmapError::UnknownAttribute {
                entity: "GeoCode",
                attribute: "nope".to_string()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_status_error_display_prefers_message() {
        let err = StatusError {
            code: 10001,
            message: Some("INVALID_USER_KEY".to_string()),
            detail: Some("ignored".to_string()),
            envelope: None,
        };
        assert_eq!(err.to_string(), "AMAP-ERROR: 10001-INVALID_USER_KEY");
    }

    #[test]
    fn test_status_error_display_falls_back_to_detail() {
        let err = StatusError {
            code: 30001,
            message: Some(String::new()),
            detail: Some("bad origin".to_string()),
            envelope: None,
        };
        assert_eq!(err.to_string(), "AMAP-ERROR: 30001-bad origin");
    }

    #[test]
    fn test_batch_error_positions() {
        let err = BatchError::new(
            BatchPhase::Prepare,
            vec![
                None,
                Some(AmapError::InvalidParams("a".to_string())),
                None,
                Some(AmapError::InvalidParams("b".to_string())),
            ],
        );
        assert_eq!(err.failed_positions(), vec![1, 3]);
        assert_eq!(err.failed_count(), 2);
        assert_eq!(err.code, BATCH_ERROR_CODE);
        assert!(err.to_string().contains("ENGINE_RESPONSE_DATA_ERROR"));
        assert!(err.to_string().contains("2 of 4"));
    }

    #[test]
    fn test_domain_error_becomes_invalid_params() {
        let err: AmapError = DomainError::InvalidLocation("x".to_string()).into();
        assert!(matches!(err, AmapError::InvalidParams(_)));
    }

    #[test]
    fn test_status_code_accessor() {
        let err: AmapError = BatchError::new(BatchPhase::Status, vec![]).into();
        assert_eq!(err.status_code(), Some(30001));
        assert_eq!(AmapError::Timeout { timeout_secs: 1 }.status_code(), None);
    }
}
