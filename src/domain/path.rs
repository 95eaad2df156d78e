//! Hierarchical path addressing.
//!
//! Paths are never stored. They are recomputed from the live tree, so a
//! rename or a move is reflected immediately.

use std::collections::BTreeMap;

use generational_arena::Index;
use itertools::Itertools;

use crate::domain::arena::NodeArena;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::value::Value;

pub const SEPARATOR: char = '/';

/// Names must be non-empty and must not contain the path separator.
pub fn validate_name(name: &str) -> DomainResult<()> {
    if name.is_empty() {
        return Err(DomainError::InvalidName {
            name: name.to_string(),
            reason: "empty".to_string(),
        });
    }
    if name.contains(SEPARATOR) {
        return Err(DomainError::InvalidName {
            name: name.to_string(),
            reason: format!("contains '{}'", SEPARATOR),
        });
    }
    Ok(())
}

/// Path components, ignoring leading, trailing and repeated separators.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|c| !c.is_empty()).collect()
}

/// Attributes compared when checking two trees for equal content.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeContent {
    pub type_tag: String,
    pub value: Option<Value>,
}

impl NodeArena {
    /// Path of `idx` from the top of its tree, top name included.
    pub fn path_of(&self, idx: Index) -> DomainResult<String> {
        let mut names = vec![self.name(idx)?];
        for ancestor in self.ancestors(idx)? {
            names.push(self.name(ancestor)?);
        }
        Ok(names.into_iter().rev().join("/"))
    }

    /// Path of `idx` starting at `root` (root name included).
    pub fn path_from(&self, root: Index, idx: Index) -> DomainResult<String> {
        let mut names = vec![self.name(idx)?];
        if idx != root {
            let ancestors = self.ancestors(idx)?;
            let Some(pos) = ancestors.iter().position(|&a| a == root) else {
                return Err(DomainError::PathNotFound(format!(
                    "{} is not below {}",
                    self.path_of(idx)?,
                    self.path_of(root)?
                )));
            };
            for &ancestor in &ancestors[..=pos] {
                names.push(self.name(ancestor)?);
            }
        }
        Ok(names.into_iter().rev().join("/"))
    }

    /// Resolves a path whose first component names `root` itself.
    pub fn get_at_path(&self, root: Index, path: &str) -> DomainResult<Option<Index>> {
        let root_name = self.name(root)?;
        let components = split_path(path);
        match components.split_first() {
            Some((first, rest)) if *first == root_name => self.walk(root, rest),
            _ => Ok(None),
        }
    }

    /// Resolves a path relative to `root` (root name excluded).
    pub fn get_relative(&self, root: Index, path: &str) -> DomainResult<Option<Index>> {
        self.walk(root, &split_path(path))
    }

    fn walk(&self, root: Index, components: &[&str]) -> DomainResult<Option<Index>> {
        let mut current = root;
        for component in components {
            match self.find_child_by_name(current, component)? {
                Some(child) => current = child,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// All paths of the subtree, in depth-first pre-order.
    pub fn paths(&self, root: Index) -> DomainResult<Vec<String>> {
        self.node(root)?;
        self.iter_preorder(root)
            .map(|(idx, _)| self.path_from(root, idx))
            .collect()
    }

    /// Path to content mapping of the subtree, independent of sibling order.
    pub fn path_content_map(&self, root: Index) -> DomainResult<BTreeMap<String, NodeContent>> {
        self.node(root)?;
        self.iter_preorder(root)
            .map(|(idx, node)| {
                let content = NodeContent {
                    type_tag: node.data.type_tag.clone(),
                    value: node.data.value.clone(),
                };
                Ok((self.path_from(root, idx)?, content))
            })
            .collect()
    }
}
