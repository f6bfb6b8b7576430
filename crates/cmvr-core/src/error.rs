//! Error types for the CMVR core library
//!
//! The normalizer itself never fails: malformed report state degrades to
//! empty or absent output. These errors only surface at the edges, when a
//! submission document is parsed or a DTO is serialized.

use thiserror::Error;

/// Main error type for cmvr-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// The submission document does not have the expected outer shape
    #[error("Invalid submission: {message}")]
    InvalidSubmission {
        message: String,
        field: Option<String>,
    },

    /// The report state is empty, so there is nothing to normalize
    #[error("Report is empty: nothing to normalize")]
    EmptyReport,

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid submission error for a specific field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidSubmission {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidSubmission {
            message: "expected an object".to_string(),
            field: None,
        };
        assert_eq!(err.to_string(), "Invalid submission: expected an object");
    }

    #[test]
    fn test_invalid_field_keeps_field_name() {
        let err = Error::invalid_field("createdById", "must be a string");
        match err {
            Error::InvalidSubmission { field, .. } => assert_eq!(field.as_deref(), Some("createdById")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_json_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
