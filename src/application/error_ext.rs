//! Error conversion helpers for backend calls
//!
//! Provides extension traits for reporting backend failures against what the
//! user asked for rather than what the backend was handed.

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::error::{BackendError, BackendResult};

/// Extension trait for converting `BackendResult` to `ApplicationResult`.
pub trait BackendResultExt<T> {
    /// Report a missing node with the requested path and source.
    ///
    /// # Example
    /// ```ignore
    /// backend.load_node_at_path(source, relative)
    ///     .for_request("CGNSTree/Base/Zone", source)?;
    /// ```
    fn for_request(self, path: &str, source: &str) -> ApplicationResult<T>;
}

impl<T> BackendResultExt<T> for BackendResult<T> {
    fn for_request(self, path: &str, source: &str) -> ApplicationResult<T> {
        self.map_err(|e| match e {
            BackendError::NotFound { .. } => ApplicationError::NodeNotFound {
                path: path.to_string(),
                source_id: source.to_string(),
            },
            other => other.into(),
        })
    }
}
