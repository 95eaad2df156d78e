use std::collections::{HashMap, HashSet};
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::kind::EntityKind;
use crate::domain::raw::Link;
use crate::domain::value::Value;

/// Data payload of a tree node: the four CGNS fields minus the children,
/// plus what the classifier decided and any deferred links.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub name: String,
    /// Opaque payload; only presence and shape matter to the engine
    pub value: Option<Value>,
    /// CGNS type tag, empty for untagged nodes
    pub type_tag: String,
    pub kind: EntityKind,
    /// Unresolved links, only ever populated on tree roots
    pub links: Vec<Link>,
}

impl NodeData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            type_tag: String::new(),
            kind: EntityKind::Node,
            links: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_tag(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tag = type_tag.into();
        self
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.type_tag.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} [{}]", self.name, self.type_tag)
        }
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub data: NodeData,
    parent: Option<Index>,
    children: Vec<Index>,
}

impl TreeNode {
    /// Index of the parent node, None for detached nodes
    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    /// Indices of child nodes, in insertion order
    pub fn children(&self) -> &[Index] {
        &self.children
    }
}

/// Arena holding any number of node trees.
///
/// Uses a generational arena so that handles to removed nodes are detected
/// instead of silently aliasing a new node. Ownership flows strictly from
/// parent to child; the parent link is a plain index and never keeps a node
/// alive.
#[derive(Debug, Default)]
pub struct NodeArena {
    arena: Arena<TreeNode>,
}

fn dangling(idx: Index) -> DomainError {
    DomainError::DanglingReference(format!("{:?}", idx))
}

impl NodeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, idx: Index) -> bool {
        self.arena.contains(idx)
    }

    /// Creates a node, either standalone or as the last child of `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> DomainResult<Index> {
        if let Some(parent_idx) = parent {
            self.node(parent_idx)?;
        }
        let node_idx = self.arena.insert(TreeNode {
            data,
            parent: None,
            children: Vec::new(),
        });
        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
            if let Some(node) = self.arena.get_mut(node_idx) {
                node.parent = Some(parent_idx);
            }
        }
        Ok(node_idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    /// Like `get_node`, but a stale handle is an error.
    pub fn node(&self, idx: Index) -> DomainResult<&TreeNode> {
        self.arena.get(idx).ok_or_else(|| dangling(idx))
    }

    fn node_mut(&mut self, idx: Index) -> DomainResult<&mut TreeNode> {
        self.arena.get_mut(idx).ok_or_else(|| dangling(idx))
    }

    pub fn data(&self, idx: Index) -> DomainResult<&NodeData> {
        Ok(&self.node(idx)?.data)
    }

    pub fn data_mut(&mut self, idx: Index) -> DomainResult<&mut NodeData> {
        Ok(&mut self.node_mut(idx)?.data)
    }

    pub fn name(&self, idx: Index) -> DomainResult<&str> {
        Ok(self.node(idx)?.data.name.as_str())
    }

    pub fn kind(&self, idx: Index) -> DomainResult<&EntityKind> {
        Ok(&self.node(idx)?.data.kind)
    }

    /// A cleared back-reference is authoritative: detached nodes have no parent.
    pub fn parent(&self, idx: Index) -> DomainResult<Option<Index>> {
        Ok(self.node(idx)?.parent)
    }

    pub fn children(&self, idx: Index) -> DomainResult<&[Index]> {
        Ok(&self.node(idx)?.children)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn set_name(&mut self, idx: Index, name: &str) -> DomainResult<()> {
        crate::domain::path::validate_name(name)?;
        self.node_mut(idx)?.data.name = name.to_string();
        Ok(())
    }

    /// Ancestors of `idx`, nearest first.
    pub fn ancestors(&self, idx: Index) -> DomainResult<Vec<Index>> {
        let mut ancestors = Vec::new();
        let mut current = self.node(idx)?.parent;
        while let Some(parent_idx) = current {
            ancestors.push(parent_idx);
            current = self.node(parent_idx)?.parent;
        }
        Ok(ancestors)
    }

    pub fn root_of(&self, idx: Index) -> DomainResult<Index> {
        Ok(self.ancestors(idx)?.last().copied().unwrap_or(idx))
    }

    fn is_ancestor_or_self(&self, candidate: Index, idx: Index) -> DomainResult<bool> {
        Ok(candidate == idx || self.ancestors(idx)?.contains(&candidate))
    }

    /// Appends `child` to `parent`'s children, moving it out of its current
    /// parent first.
    pub fn attach_child(&mut self, parent: Index, child: Index) -> DomainResult<()> {
        self.attach_child_at(parent, usize::MAX, child)
    }

    /// Inserts `child` at `position` among `parent`'s children (clamped to the
    /// end). Both links are updated before returning; on error nothing changed.
    #[instrument(level = "trace", skip(self))]
    pub fn attach_child_at(&mut self, parent: Index, position: usize, child: Index) -> DomainResult<()> {
        self.node(parent)?;
        self.node(child)?;
        if self.is_ancestor_or_self(child, parent)? {
            return Err(DomainError::CycleDetected {
                parent: self.path_of(parent)?,
                child: self.path_of(child)?,
            });
        }

        self.detach(child)?;
        let parent_node = self.node_mut(parent)?;
        let position = position.min(parent_node.children.len());
        parent_node.children.insert(position, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detaches `child` from its parent, returning the former parent.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&mut self, child: Index) -> DomainResult<Option<Index>> {
        let old_parent = self.node(child)?.parent;
        if let Some(parent_idx) = old_parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.retain(|&c| c != child);
            }
            self.node_mut(child)?.parent = None;
        }
        Ok(old_parent)
    }

    /// Detaches and drops a whole subtree, returning the data of its root.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_subtree(&mut self, idx: Index) -> DomainResult<NodeData> {
        self.detach(idx)?;
        let doomed: Vec<Index> = self.iter_preorder(idx).map(|(i, _)| i).collect();
        let mut root_data = None;
        for node_idx in doomed {
            if let Some(node) = self.arena.remove(node_idx) {
                if node_idx == idx {
                    root_data = Some(node.data);
                }
            }
        }
        root_data.ok_or_else(|| dangling(idx))
    }

    pub fn find_child_by_name(&self, parent: Index, name: &str) -> DomainResult<Option<Index>> {
        let node = self.node(parent)?;
        Ok(node
            .children
            .iter()
            .copied()
            .find(|&c| self.arena.get(c).is_some_and(|n| n.data.name == name)))
    }

    /// Copies the subtree rooted at `idx` into a new, detached subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn deep_copy(&mut self, idx: Index) -> DomainResult<Index> {
        let snapshot = self.snapshot(idx)?;
        self.restore(snapshot)
    }

    /// Copies a subtree owned by another arena into this one.
    #[instrument(level = "debug", skip(self, other))]
    pub fn import(&mut self, other: &NodeArena, idx: Index) -> DomainResult<Index> {
        let snapshot = other.snapshot(idx)?;
        self.restore(snapshot)
    }

    /// Preorder list of node data with the position of each node's parent
    /// within the list.
    fn snapshot(&self, idx: Index) -> DomainResult<Vec<(NodeData, Option<usize>)>> {
        self.node(idx)?;
        let mut positions: HashMap<Index, usize> = HashMap::new();
        let mut snapshot = Vec::new();
        for (node_idx, node) in self.iter_preorder(idx) {
            let parent_pos = if node_idx == idx {
                None
            } else {
                node.parent.and_then(|p| positions.get(&p).copied())
            };
            positions.insert(node_idx, snapshot.len());
            snapshot.push((node.data.clone(), parent_pos));
        }
        Ok(snapshot)
    }

    fn restore(&mut self, snapshot: Vec<(NodeData, Option<usize>)>) -> DomainResult<Index> {
        let mut created: Vec<Index> = Vec::with_capacity(snapshot.len());
        for (data, parent_pos) in snapshot {
            let parent = parent_pos.and_then(|pos| created.get(pos).copied());
            let node_idx = self.arena.insert(TreeNode {
                data,
                parent,
                children: Vec::new(),
            });
            if let Some(parent_idx) = parent {
                if let Some(parent_node) = self.arena.get_mut(parent_idx) {
                    parent_node.children.push(node_idx);
                }
            }
            created.push(node_idx);
        }
        created
            .first()
            .copied()
            .ok_or_else(|| DomainError::MalformedSubtree("empty snapshot".to_string()))
    }

    /// True when the subtree is made only of live nodes whose parent links
    /// agree with their parents' children lists, each child listed once.
    pub fn only_contains_nodes(&self, idx: Index) -> bool {
        let Some(node) = self.arena.get(idx) else {
            return false;
        };
        let linked_from_parent = node.parent.map_or(true, |p| {
            self.arena
                .get(p)
                .is_some_and(|parent| parent.children.iter().filter(|&&c| c == idx).count() == 1)
        });
        linked_from_parent && self.children_well_formed(idx)
    }

    fn children_well_formed(&self, idx: Index) -> bool {
        let Some(node) = self.arena.get(idx) else {
            return false;
        };
        let mut seen = HashSet::new();
        node.children.iter().all(|&c| {
            seen.insert(c)
                && self.arena.get(c).is_some_and(|child| child.parent == Some(idx))
                && self.children_well_formed(c)
        })
    }

    pub fn iter_preorder(&self, root: Index) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, root)
    }

    pub fn iter_postorder(&self, root: Index) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, root)
    }
}

/// Depth-first, pre-order traversal of one subtree.
pub struct PreOrderIterator<'a> {
    arena: &'a NodeArena,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(arena: &'a NodeArena, root: Index) -> Self {
        let mut stack = Vec::new();
        if arena.contains(root) {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// Depth-first, post-order traversal: children before their parent.
pub struct PostOrderIterator<'a> {
    arena: &'a NodeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a NodeArena, root: Index) -> Self {
        let mut stack = Vec::new();
        if arena.contains(root) {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
