//! Application-level errors (wraps domain and backend errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::error::BackendError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("node not found: {path} in {source_id}")]
    NodeNotFound { path: String, source_id: String },

    #[error("link not found: {0}")]
    LinkNotFound(String),

    #[error("{0}")]
    Backend(BackendError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<BackendError> for ApplicationError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::NotFound { path, source_id } => {
                ApplicationError::NodeNotFound { path, source_id }
            }
            other => ApplicationError::Backend(other),
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
