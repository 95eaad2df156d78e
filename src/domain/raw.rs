//! Generic four-field node records exchanged with codec backends.

use generational_arena::Index;
use serde::{Deserialize, Serialize};

use crate::domain::arena::{NodeArena, NodeData};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::path::{split_path, validate_name};
use crate::domain::value::Value;

/// Untyped node record: name, optional value, ordered children, type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawNode>,
    #[serde(default)]
    pub type_tag: String,
}

impl RawNode {
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            children: Vec::new(),
            type_tag: type_tag.into(),
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_child(mut self, child: RawNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn child(&self, name: &str) -> Option<&RawNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Follows a path relative to this record (this record's own name excluded).
    pub fn get_relative(&self, path: &str) -> Option<&RawNode> {
        split_path(path)
            .into_iter()
            .try_fold(self, |node, component| node.child(component))
    }
}

/// Deferred reference from a local path to a subtree stored elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub local_path: String,
    pub target_file: String,
    pub target_path: String,
}

impl Link {
    pub fn new(
        local_path: impl Into<String>,
        target_file: impl Into<String>,
        target_path: impl Into<String>,
    ) -> Self {
        Self {
            local_path: local_path.into(),
            target_file: target_file.into(),
            target_path: target_path.into(),
        }
    }
}

impl NodeArena {
    /// Builds generic (unclassified) nodes from a raw record. Every name is
    /// checked before the first node is inserted, so a bad record leaves the
    /// arena as it was.
    pub fn from_raw(&mut self, raw: RawNode, parent: Option<Index>) -> DomainResult<Index> {
        let at = match parent {
            Some(p) => self.path_of(p)?,
            None => String::new(),
        };
        check_names(&raw, &at)?;
        self.insert_raw(raw, parent)
    }

    fn insert_raw(&mut self, raw: RawNode, parent: Option<Index>) -> DomainResult<Index> {
        let RawNode {
            name,
            value,
            children,
            type_tag,
        } = raw;
        let mut data = NodeData::new(name).with_tag(type_tag);
        data.value = value;
        let idx = self.insert_node(data, parent)?;
        for child in children {
            self.insert_raw(child, Some(idx))?;
        }
        Ok(idx)
    }

    /// Generic form of a subtree; kinds and links are dropped.
    pub fn to_raw(&self, idx: Index) -> DomainResult<RawNode> {
        let node = self.node(idx)?;
        let children = node
            .children()
            .iter()
            .map(|&c| self.to_raw(c))
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(RawNode {
            name: node.data.name.clone(),
            value: node.data.value.clone(),
            children,
            type_tag: node.data.type_tag.clone(),
        })
    }
}

/// Rejects records whose names would break path addressing. `at` is the
/// path of the record's parent, empty for a top-level record.
fn check_names(raw: &RawNode, at: &str) -> DomainResult<()> {
    let joined = |name: &str| {
        if at.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", at, name)
        }
    };
    if let Err(e) = validate_name(&raw.name) {
        let reason = match e {
            DomainError::InvalidName { reason, .. } => reason,
            other => other.to_string(),
        };
        return Err(DomainError::MalformedSubtree(format!(
            "{}: {}",
            joined(&format!("{:?}", raw.name)),
            reason
        )));
    }
    let here = joined(&raw.name);
    raw.children.iter().try_for_each(|child| check_names(child, &here))
}
