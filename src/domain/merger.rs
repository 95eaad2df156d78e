//! Structural merge of several subtrees into one hierarchy.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{NodeArena, NodeData};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::kind::{BASE_TAG, TREE_TAG};

/// Name of the container returned when merged inputs do not collapse into a
/// single top-level node.
pub const MERGE_ROOT_NAME: &str = "Merged";

/// Arbitrarily nested sequence of nodes. Nesting carries no structural
/// meaning; only each node's own ancestry decides where it lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Node(Index),
    Seq(Vec<Input>),
}

impl Input {
    pub fn nodes(nodes: impl IntoIterator<Item = Index>) -> Self {
        Input::Seq(nodes.into_iter().map(Input::Node).collect())
    }

    /// Nodes in first-seen order.
    pub fn flatten(&self) -> Vec<Index> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into(&self, out: &mut Vec<Index>) {
        match self {
            Input::Node(idx) => out.push(*idx),
            Input::Seq(items) => items.iter().for_each(|item| item.collect_into(out)),
        }
    }
}

impl From<Index> for Input {
    fn from(idx: Index) -> Self {
        Input::Node(idx)
    }
}

impl From<Vec<Index>> for Input {
    fn from(nodes: Vec<Index>) -> Self {
        Input::nodes(nodes)
    }
}

impl From<Vec<Input>> for Input {
    fn from(items: Vec<Input>) -> Self {
        Input::Seq(items)
    }
}

/// Which same-named siblings are combined into one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// Every same-named pair combines.
    #[default]
    CombineAll,
    /// Only trees, bases and nodes with one of `tags` combine; any other
    /// collision is settled by renaming.
    CombineContainers { tags: Vec<String> },
}

impl MergePolicy {
    fn combines(&self, data: &NodeData) -> bool {
        match self {
            MergePolicy::CombineAll => true,
            MergePolicy::CombineContainers { tags } => {
                data.kind.is_container()
                    || data.type_tag == TREE_TAG
                    || data.type_tag == BASE_TAG
                    || tags.iter().any(|t| *t == data.type_tag)
            }
        }
    }
}

/// Combines nodes level by level. When two nodes combine, the first one's
/// tag and value win and the later one's children are merged into it.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    policy: MergePolicy,
}

impl Merger {
    pub fn new(policy: MergePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &MergePolicy {
        &self.policy
    }

    /// Merges copies of `inputs` into one node. Inputs are left untouched.
    ///
    /// When the inputs do not collapse into a single top-level node, the
    /// distinct top-level nodes are returned as children of an untagged
    /// `Merged` container.
    #[instrument(level = "debug", skip(self, arena))]
    pub fn merge(&self, arena: &mut NodeArena, inputs: &Input) -> DomainResult<Index> {
        let nodes = Self::checked_inputs(arena, inputs)?;
        let scratch = arena.insert_node(NodeData::new(MERGE_ROOT_NAME), None)?;
        self.place_all(arena, scratch, &nodes)?;

        let tops = arena.children(scratch)?.to_vec();
        if let [single] = tops[..] {
            arena.detach(single)?;
            arena.remove_subtree(scratch)?;
            return Ok(single);
        }
        Ok(scratch)
    }

    /// Merges copies of `inputs` below `target`, returning the top-level nodes
    /// that received them.
    #[instrument(level = "debug", skip(self, arena))]
    pub fn merge_into(&self, arena: &mut NodeArena, target: Index, inputs: &Input) -> DomainResult<Vec<Index>> {
        arena.node(target)?;
        let nodes = Self::checked_inputs(arena, inputs)?;
        self.place_all(arena, target, &nodes)
    }

    /// Moves the detached subtree `incoming` below `parent`, combining it with
    /// a same-named sibling when the policy allows and renaming otherwise.
    /// Returns the node that now holds `incoming`'s content.
    pub fn absorb(&self, arena: &mut NodeArena, parent: Index, incoming: Index) -> DomainResult<Index> {
        let data = arena.data(incoming)?.clone();
        let existing = if self.policy.combines(&data) {
            arena.children(parent)?.iter().copied().find(|&c| {
                arena
                    .data(c)
                    .is_ok_and(|d| d.name == data.name && self.policy.combines(d))
            })
        } else {
            None
        };

        let children = arena.children(incoming)?.to_vec();
        for &child in &children {
            arena.detach(child)?;
        }

        let target = match existing {
            Some(existing) => {
                if arena.data(existing)?.type_tag != data.type_tag {
                    debug!(
                        "tag conflict at {}: keeping {:?}, ignoring {:?}",
                        arena.path_of(existing)?,
                        arena.data(existing)?.type_tag,
                        data.type_tag
                    );
                }
                let existing_data = arena.data_mut(existing)?;
                for link in data.links {
                    if !existing_data.links.contains(&link) {
                        existing_data.links.push(link);
                    }
                }
                existing
            }
            None => {
                arena.attach_child(parent, incoming)?;
                arena.ensure_unique_sibling_names(parent)?;
                incoming
            }
        };

        for child in children {
            self.absorb(arena, target, child)?;
        }
        if target != incoming {
            arena.remove_subtree(incoming)?;
        }
        Ok(target)
    }

    fn checked_inputs(arena: &NodeArena, inputs: &Input) -> DomainResult<Vec<Index>> {
        let nodes = inputs.flatten();
        if nodes.is_empty() {
            return Err(DomainError::EmptyMerge);
        }
        for &idx in &nodes {
            arena.node(idx)?;
            if !arena.only_contains_nodes(idx) {
                return Err(DomainError::MalformedSubtree(arena.path_of(idx)?));
            }
        }
        Ok(nodes)
    }

    fn place_all(&self, arena: &mut NodeArena, target: Index, nodes: &[Index]) -> DomainResult<Vec<Index>> {
        let mut placed = Vec::new();
        for &idx in nodes {
            let copy = Self::placed_copy(arena, idx)?;
            let kept = self.absorb(arena, target, copy)?;
            if !placed.contains(&kept) {
                placed.push(kept);
            }
        }
        Ok(placed)
    }

    /// Detached copy of `idx`, wrapped in attribute-only copies of its
    /// ancestors so that it lands at its own path.
    fn placed_copy(arena: &mut NodeArena, idx: Index) -> DomainResult<Index> {
        let ancestors = arena.ancestors(idx)?;
        let mut top = arena.deep_copy(idx)?;
        for ancestor in ancestors {
            let shell = arena.data(ancestor)?.clone();
            let shell_idx = arena.insert_node(shell, None)?;
            arena.attach_child(shell_idx, top)?;
            top = shell_idx;
        }
        Ok(top)
    }
}
