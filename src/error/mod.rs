//! # Error Module
//!
//! Error types for the event pipeline.
//!
//! ## Design Principles
//! - **Never panic** on input data - return errors instead
//! - **Include context** - record index, field name, event code, path
//! - **Separate fatal from recoverable** - only source failures (and
//!   decode failures under the strict policy) end a run

use crate::events::EventCode;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level pipeline error, returned from [`Dispatcher::run`](crate::core::dispatcher::Dispatcher::run)
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Record source failed: {0}")]
    Source(#[from] SourceError),

    #[error("Record {record} could not be decoded: {source}")]
    Decode {
        record: usize,
        #[source]
        source: DecodeError,
    },

    #[error("Record {record} triggered more than {limit} events; aborting the cascade")]
    CascadeLimit { record: usize, limit: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// A raw record could not be mapped to an event
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Unknown event code: {code}")]
    UnknownCode { code: String },

    #[error("Record has no event code: {record:?}")]
    MissingCode { record: String },

    #[error("Missing field '{field}'")]
    MissingField { field: String },

    #[error("Invalid value {value:?} for field '{field}': {reason}")]
    InvalidField {
        field: String,
        value: String,
        reason: String,
    },
}

impl DecodeError {
    /// Shorthand for a missing field
    pub fn missing(field: impl Into<String>) -> Self {
        DecodeError::MissingField {
            field: field.into(),
        }
    }

    /// Shorthand for a field that was present but unparsable
    pub fn invalid(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        DecodeError::InvalidField {
            field: field.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error came from an unregistered event code
    pub fn is_unknown_code(&self) -> bool {
        matches!(self, DecodeError::UnknownCode { .. })
    }
}

/// The record source could not produce the next record
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read record {record}: {source}")]
    Io {
        record: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Source failed: {0}")]
    Failed(String),
}

/// A listener failed while processing an event
///
/// Listener errors never end a run. The dispatcher reports them to
/// its observer and moves on to the next listener.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ListenerError {
    #[error("{0}")]
    Failed(String),

    #[error("Cannot handle {code}: {reason}")]
    Rejected { code: EventCode, reason: String },
}

impl ListenerError {
    /// Create a generic failure
    pub fn failed(message: impl Into<String>) -> Self {
        ListenerError::Failed(message.into())
    }
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_names_the_field() {
        let error = DecodeError::missing("sit");
        assert!(error.to_string().contains("'sit'"));

        let error = DecodeError::invalid("a", "x1", "not a number");
        let message = error.to_string();
        assert!(message.contains("'a'"));
        assert!(message.contains("\"x1\""));
        assert!(message.contains("not a number"));
    }

    #[test]
    fn unknown_code_is_a_decode_error() {
        let error = DecodeError::UnknownCode {
            code: "Event9".to_string(),
        };
        assert!(error.is_unknown_code());
        assert!(error.to_string().contains("Event9"));
        assert!(!DecodeError::missing("a").is_unknown_code());
    }

    #[test]
    fn pipeline_error_includes_record_index() {
        let error = PipelineError::Decode {
            record: 7,
            source: DecodeError::missing("b"),
        };
        let message = error.to_string();
        assert!(message.contains("Record 7"));
        assert!(message.contains("'b'"));
    }

    #[test]
    fn source_error_includes_path() {
        let error = SourceError::Open {
            path: PathBuf::from("/logs/data.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let error: PipelineError = error.into();
        assert!(error.to_string().contains("/logs/data.txt"));
    }

    #[test]
    fn rejected_listener_error_names_the_code() {
        let error = ListenerError::Rejected {
            code: EventCode::from_static("quote"),
            reason: "negative price".to_string(),
        };
        assert_eq!(error.to_string(), "Cannot handle quote: negative price");
    }
}
