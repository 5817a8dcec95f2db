//! Error types for threadprep

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for threadprep
#[derive(Debug, Error)]
pub enum ThreadPrepError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Placeholder preparation failed
    #[error("Incorrect placeholder usage: {0}")]
    Placeholder(#[from] PlaceholderError),

    /// Comment not found
    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    /// Comment store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Unsupported schema version
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(u32),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ThreadPrepError>,
    },
}

impl ThreadPrepError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ThreadPrepError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Misuse of the placeholder syntax, reported instead of a prepared query.
///
/// The display text is the diagnostic message logged as incorrect usage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaceholderError {
    /// An implode directive (`%,d`) was bound to a scalar
    #[error("attempt to implode a non array value [{value}]")]
    ImplodeNonArray { value: String },

    /// A plain directive was bound to an array
    #[error("attempt to use an array value with a scalar placeholder (argument {position})")]
    ArrayForScalar { position: usize },

    /// A positional directive (`%3$d`) points past the argument list
    #[error("argument {position} is out of range, only {available} arguments were passed")]
    PositionOutOfRange { position: usize, available: usize },

    /// Implicit directives outnumber the arguments
    #[error("not enough arguments: placeholder {placeholder} has no matching argument")]
    MissingArgument { placeholder: usize },

    /// A single-placeholder query received a list of several arguments
    #[error("the query only expected one placeholder, but an array of multiple placeholders was sent")]
    SinglePlaceholderArray,
}

/// Result type alias for threadprep
pub type Result<T> = std::result::Result<T, ThreadPrepError>;
