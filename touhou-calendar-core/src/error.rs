//! Error types for calendar generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading day records or generating the calendar.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// A record is malformed: bad date, missing field, or a duplicate.
    #[error("Invalid record {record}: {reason}")]
    Validation { record: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("Failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CalendarError {
    pub fn validation(record: impl Into<String>, reason: impl Into<String>) -> Self {
        CalendarError::Validation {
            record: record.into(),
            reason: reason.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CalendarError::Validation { .. })
    }
}

/// Result type alias for calendar operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
