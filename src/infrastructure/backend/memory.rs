use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::domain::{Link, RawNode};
use crate::infrastructure::backend::StoredTree;
use crate::infrastructure::error::{BackendError, BackendResult};
use crate::infrastructure::traits::{CodecBackend, SaveOptions};

/// Keeps trees in memory, keyed by source name.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    trees: Mutex<HashMap<String, StoredTree>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, source: impl Into<String>, tree: RawNode, links: Vec<Link>) {
        self.trees
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(source.into(), StoredTree { tree, links });
    }

    pub fn get(&self, source: &str) -> Option<StoredTree> {
        self.trees
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source)
            .cloned()
    }

    pub fn sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = self
            .trees
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        sources.sort();
        sources
    }
}

impl CodecBackend for MemoryBackend {
    fn load_tree(&self, source: &str) -> BackendResult<(RawNode, Vec<Link>)> {
        self.get(source)
            .map(|stored| (stored.tree, stored.links))
            .ok_or_else(|| BackendError::not_found("/", source))
    }

    fn save_tree(&self, root: &RawNode, destination: &str, options: &SaveOptions) -> BackendResult<()> {
        self.insert(destination, root.clone(), options.links.clone());
        Ok(())
    }

    fn load_node_at_path(&self, source: &str, path: &str) -> BackendResult<RawNode> {
        let stored = self
            .get(source)
            .ok_or_else(|| BackendError::not_found(path, source))?;
        stored
            .tree
            .get_relative(path)
            .cloned()
            .ok_or_else(|| BackendError::not_found(path, source))
    }
}
