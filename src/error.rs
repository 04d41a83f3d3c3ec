//! Error handling for the uploadkit library
//!
//! This module defines the error types used throughout the library.
//! Transport and timeout failures are recoverable up to the retry budget;
//! only exhaustion surfaces to the caller of [`crate::Uploader::upload`].

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, UploaderError>;

/// Error types that can occur when using the uploader
#[derive(Error, Debug)]
pub enum UploaderError {
    /// One or more selected files exceeded the configured size limit.
    /// Delivered through the event channel, never returned from an operation.
    #[error("some files exceed the maximum allowed size")]
    OversizedSelection,

    /// The transport call failed (connection, request, or server error)
    #[error("upload transport failed: {message}")]
    Transport { message: String },

    /// The response body could not be parsed as JSON
    #[error("failed to parse upload response: {0}")]
    ResponseParse(#[from] serde_json::Error),

    /// An upload attempt ran past the configured timeout
    #[error("upload timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// All retry attempts were consumed
    #[error("upload failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<UploaderError>,
    },

    /// Configuration error
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Invalid parameter
    #[error("invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploaderError {
    /// Create a new transport error
    pub fn transport(message: impl Into<String>) -> Self {
        UploaderError::Transport {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout(seconds: u64) -> Self {
        UploaderError::Timeout { seconds }
    }

    /// Create a new retries-exhausted error
    pub fn retries_exhausted(attempts: u32, last: UploaderError) -> Self {
        UploaderError::RetriesExhausted {
            attempts,
            last: Box::new(last),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        UploaderError::Config {
            message: message.into(),
        }
    }

    /// Create a new invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        UploaderError::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for UploaderError {
    fn from(err: reqwest::Error) -> Self {
        UploaderError::transport(err.to_string())
    }
}

impl Clone for UploaderError {
    fn clone(&self) -> Self {
        match self {
            UploaderError::OversizedSelection => UploaderError::OversizedSelection,
            UploaderError::Transport { message } => UploaderError::Transport {
                message: message.clone(),
            },
            UploaderError::ResponseParse(e) => UploaderError::transport(e.to_string()),
            UploaderError::Timeout { seconds } => UploaderError::Timeout { seconds: *seconds },
            UploaderError::RetriesExhausted { attempts, last } => UploaderError::RetriesExhausted {
                attempts: *attempts,
                last: last.clone(),
            },
            UploaderError::Config { message } => UploaderError::Config {
                message: message.clone(),
            },
            UploaderError::InvalidParameter { parameter, message } => {
                UploaderError::InvalidParameter {
                    parameter: parameter.clone(),
                    message: message.clone(),
                }
            }
            UploaderError::Io(e) => UploaderError::transport(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = UploaderError::transport("connection refused");
        assert!(matches!(err, UploaderError::Transport { .. }));

        let err = UploaderError::timeout(30);
        assert!(matches!(err, UploaderError::Timeout { seconds: 30 }));

        let err = UploaderError::retries_exhausted(4, UploaderError::timeout(30));
        assert!(matches!(
            err,
            UploaderError::RetriesExhausted { attempts: 4, .. }
        ));
    }

    #[test]
    fn test_error_display() {
        let err = UploaderError::transport("connection refused");
        assert_eq!(
            err.to_string(),
            "upload transport failed: connection refused"
        );

        let err = UploaderError::timeout(30);
        assert_eq!(err.to_string(), "upload timed out after 30s");

        let err = UploaderError::retries_exhausted(4, UploaderError::timeout(30));
        assert_eq!(
            err.to_string(),
            "upload failed after 4 attempts: upload timed out after 30s"
        );
    }

    #[test]
    fn test_error_clone_keeps_kind() {
        let err = UploaderError::retries_exhausted(2, UploaderError::transport("boom"));
        let cloned = err.clone();
        match cloned {
            UploaderError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 2);
                assert!(matches!(*last, UploaderError::Transport { .. }));
            }
            _ => panic!("expected RetriesExhausted"),
        }
    }
}
