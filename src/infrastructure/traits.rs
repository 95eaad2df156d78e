//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing the assembler
//! to be tested with mock implementations.

use std::io;
use std::path::Path;

use crate::domain::{Link, RawNode};
use crate::infrastructure::error::BackendResult;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.exists(parent) => {
                self.create_dir_all(parent)
            }
            _ => Ok(()),
        }
    }
}

/// Options handed to `CodecBackend::save_tree`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Human-readable output where the format supports it
    pub pretty: bool,
    /// Links to persist alongside the tree
    pub links: Vec<Link>,
}

/// Reads and writes raw node records. Implementations own the byte layout.
///
/// Backends may be called from several threads at once; each call must hand
/// back a record the caller owns exclusively.
pub trait CodecBackend: Send + Sync {
    /// Load a whole tree and the links stored with it.
    fn load_tree(&self, source: &str) -> BackendResult<(RawNode, Vec<Link>)>;

    /// Persist a tree.
    fn save_tree(&self, root: &RawNode, destination: &str, options: &SaveOptions) -> BackendResult<()>;

    /// Load the node at `path`, relative to the stored tree root.
    /// Fails with `BackendError::NotFound` when the path does not exist.
    fn load_node_at_path(&self, source: &str, path: &str) -> BackendResult<RawNode>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}
