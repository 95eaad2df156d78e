//! Sibling name uniqueness.
//!
//! The first occurrence of a name keeps it; every later duplicate gets the
//! smallest free `.N` suffix, counting from `.0`. Names that are already
//! unique are never touched, so the operation is idempotent.

use std::collections::{HashMap, HashSet, VecDeque};

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::NodeArena;
use crate::domain::error::DomainResult;

/// A rename performed by the namer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub node: Index,
    pub from: String,
    pub to: String,
}

/// New names for a sibling sequence; `None` keeps the current name.
///
/// Generated names are checked against every name already in the sequence,
/// so a sibling literally named `X.0` pushes the duplicate of `X` to `X.1`.
pub fn unique_names(names: &[&str]) -> Vec<Option<String>> {
    let mut taken: HashSet<String> = names.iter().map(|n| n.to_string()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut next_suffix: HashMap<&str, usize> = HashMap::new();

    names
        .iter()
        .map(|&name| {
            if seen.insert(name) {
                return None;
            }
            let counter = next_suffix.entry(name).or_insert(0);
            loop {
                let candidate = format!("{}.{}", name, counter);
                *counter += 1;
                if taken.insert(candidate.clone()) {
                    return Some(candidate);
                }
            }
        })
        .collect()
}

/// Name without a trailing `.N` suffix.
pub fn base_name(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, suffix))
            if !stem.is_empty() && !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) =>
        {
            stem
        }
        _ => name,
    }
}

impl NodeArena {
    /// Renames duplicate children of `parent` in place, preserving order.
    #[instrument(level = "debug", skip(self))]
    pub fn ensure_unique_sibling_names(&mut self, parent: Index) -> DomainResult<Vec<Rename>> {
        let children = self.children(parent)?.to_vec();
        let names = children
            .iter()
            .map(|&c| self.name(c).map(str::to_string))
            .collect::<DomainResult<Vec<String>>>()?;
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();

        let mut renames = Vec::new();
        for ((child, old), new) in children.into_iter().zip(&names).zip(unique_names(&refs)) {
            if let Some(new) = new {
                debug!("rename {} -> {}", old, new);
                self.data_mut(child)?.name = new.clone();
                renames.push(Rename {
                    node: child,
                    from: old.clone(),
                    to: new,
                });
            }
        }
        Ok(renames)
    }

    /// Applies sibling uniqueness to every level of the subtree, breadth-first.
    /// Each parent is handled independently.
    #[instrument(level = "debug", skip(self))]
    pub fn ensure_unique_names_recursive(&mut self, root: Index) -> DomainResult<Vec<Rename>> {
        let mut renames = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(root);

        while let Some(parent) = queue.pop_front() {
            renames.extend(self.ensure_unique_sibling_names(parent)?);
            queue.extend(self.children(parent)?.iter().copied());
        }
        Ok(renames)
    }
}
