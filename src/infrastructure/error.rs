//! Backend-level errors

use thiserror::Error;

/// Errors raised by codec backends.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("node {path} not found in {source_id}")]
    NotFound { path: String, source_id: String },

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid document: {context}")]
    Format {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl BackendError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn not_found(path: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self::NotFound {
            path: path.into(),
            source_id: source_id.into(),
        }
    }
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
