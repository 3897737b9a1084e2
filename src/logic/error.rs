//! Error handling

use thiserror::Error;

pub type TriageResult<T> = Result<T, TriageError>;

#[derive(Debug, Error)]
pub enum TriageError {
    /// Rule level present but not numeric. Fatal for the record, never defaulted.
    #[error("Invalid severity: rule level {value} is not numeric")]
    InvalidSeverity { value: String },

    /// Input line could not be turned into a record
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Invalid label '{0}' (expected TP or FP)")]
    InvalidLabel(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single input line that was skipped, kept for the audit trail
#[derive(Debug, Clone, serde::Serialize)]
pub struct RejectedLine {
    pub line: usize,
    pub reason: String,
    /// First 100 characters of the raw line
    pub excerpt: String,
}

impl RejectedLine {
    pub fn new(line: usize, reason: impl Into<String>, raw: &str) -> Self {
        Self {
            line,
            reason: reason.into(),
            excerpt: raw.chars().take(100).collect(),
        }
    }
}
