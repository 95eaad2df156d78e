use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::{Link, RawNode};
use crate::infrastructure::backend::StoredTree;
use crate::infrastructure::error::{BackendError, BackendResult};
use crate::infrastructure::traits::{CodecBackend, FileSystem, SaveOptions};

/// Stores each tree as a JSON document `{ "tree": …, "links": [...] }`.
pub struct JsonBackend {
    fs: Arc<dyn FileSystem>,
}

impl JsonBackend {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn read(&self, source: &str) -> BackendResult<StoredTree> {
        let path = Path::new(source);
        if !self.fs.exists(path) || self.fs.is_dir(path) {
            return Err(BackendError::not_found("/", source));
        }
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| BackendError::io(format!("read {}", source), e))?;
        serde_json::from_str(&content).map_err(|e| BackendError::Format {
            context: format!("parse {}", source),
            source: e,
        })
    }
}

impl CodecBackend for JsonBackend {
    #[instrument(level = "debug", skip(self))]
    fn load_tree(&self, source: &str) -> BackendResult<(RawNode, Vec<Link>)> {
        let stored = self.read(source)?;
        debug!("loaded {} with {} links", source, stored.links.len());
        Ok((stored.tree, stored.links))
    }

    #[instrument(level = "debug", skip(self, root))]
    fn save_tree(&self, root: &RawNode, destination: &str, options: &SaveOptions) -> BackendResult<()> {
        let stored = StoredTree {
            tree: root.clone(),
            links: options.links.clone(),
        };
        let serialized = if options.pretty {
            serde_json::to_string_pretty(&stored)
        } else {
            serde_json::to_string(&stored)
        };
        let content = serialized.map_err(|e| BackendError::Format {
            context: format!("serialize {}", destination),
            source: e,
        })?;

        let path = Path::new(destination);
        self.fs
            .ensure_parent(path)
            .map_err(|e| BackendError::io(format!("create parent of {}", destination), e))?;
        self.fs
            .write(path, &content)
            .map_err(|e| BackendError::io(format!("write {}", destination), e))
    }

    #[instrument(level = "debug", skip(self))]
    fn load_node_at_path(&self, source: &str, path: &str) -> BackendResult<RawNode> {
        let stored = self.read(source)?;
        stored
            .tree
            .get_relative(path)
            .cloned()
            .ok_or_else(|| BackendError::not_found(path, source))
    }
}
