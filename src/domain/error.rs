//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the tree model's invariants.
/// Every variant that concerns a node carries its path at the time of failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unsupported zone kind \"{kind}\" at {path}")]
    UnsupportedKind { kind: String, path: String },

    #[error("ambiguous tree root at {path}: found {count} tree-root nodes")]
    AmbiguousRoot { path: String, count: usize },

    #[error("dangling node handle: {0}")]
    DanglingReference(String),

    #[error("cycle detected: cannot attach {child} below {parent}")]
    CycleDetected { parent: String, child: String },

    #[error("path not found: {0}")]
    PathNotFound(String),

    #[error("invalid node name \"{name}\": {reason}")]
    InvalidName { name: String, reason: String },

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("malformed subtree at {0}")]
    MalformedSubtree(String),

    #[error("nothing to merge")]
    EmptyMerge,
}

impl DomainError {
    /// Re-roots the path an error carries. Used when the failing subtree was
    /// built detached and really belongs below `parent`.
    pub fn under(self, parent: &str) -> Self {
        let rooted = |path: String| {
            if parent.is_empty() {
                path
            } else {
                format!("{}/{}", parent, path)
            }
        };
        match self {
            DomainError::UnsupportedKind { kind, path } => DomainError::UnsupportedKind {
                kind,
                path: rooted(path),
            },
            DomainError::AmbiguousRoot { path, count } => DomainError::AmbiguousRoot {
                path: rooted(path),
                count,
            },
            DomainError::MalformedSubtree(path) => DomainError::MalformedSubtree(rooted(path)),
            other => other,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
