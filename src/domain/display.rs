use generational_arena::Index;
use termtree::Tree;

use crate::domain::arena::NodeArena;
use crate::domain::error::DomainResult;

/// Conversion of a subtree into a printable `termtree::Tree`.
pub trait ToTermTree {
    fn to_term_tree(&self, root: Index) -> DomainResult<Tree<String>>;
}

impl ToTermTree for NodeArena {
    fn to_term_tree(&self, root: Index) -> DomainResult<Tree<String>> {
        let node = self.node(root)?;
        let label = if node.data.kind.is_specialized() {
            format!("{} <{}>", node.data, node.data.kind)
        } else {
            node.data.to_string()
        };

        let leaves = node
            .children()
            .iter()
            .map(|&c| self.to_term_tree(c))
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Tree::new(label).with_leaves(leaves))
    }
}
