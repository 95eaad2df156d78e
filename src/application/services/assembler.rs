//! Assembles CGNS trees from loose nodes, bases, zones and whole trees.

use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, BackendResultExt};
use crate::config::Settings;
use crate::domain::kind::{BASE_TAG, TREE_TAG};
use crate::domain::{
    split_path, unique_names, Classifier, DomainError, EntityBuilder, EntityKind, Index, Input, Link,
    Merger, NodeArena, RawNode, SpecializationRegistry,
};
use crate::infrastructure::traits::{CodecBackend, SaveOptions};

/// Inputs to `Assembler::add`: positional inputs, plus inputs grouped under
/// a named base. Entries are processed in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct AddInputs {
    entries: Vec<(Option<String>, Input)>,
}

impl AddInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, input: impl Into<Input>) -> Self {
        self.entries.push((None, input.into()));
        self
    }

    /// Zones among `input` are placed in a base named `base_name`.
    pub fn with_group(mut self, base_name: impl Into<String>, input: impl Into<Input>) -> Self {
        self.entries.push((Some(base_name.into()), input.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, input)| input.flatten().is_empty())
    }

    fn flatten(&self) -> Vec<(Option<&str>, Index)> {
        self.entries
            .iter()
            .flat_map(|(group, input)| {
                input
                    .flatten()
                    .into_iter()
                    .map(move |idx| (group.as_deref(), idx))
            })
            .collect()
    }
}

impl From<Input> for AddInputs {
    fn from(input: Input) -> Self {
        Self::new().with(input)
    }
}

impl From<Index> for AddInputs {
    fn from(idx: Index) -> Self {
        Self::new().with(idx)
    }
}

impl From<Vec<Index>> for AddInputs {
    fn from(nodes: Vec<Index>) -> Self {
        Self::new().with(nodes)
    }
}

impl From<Vec<Input>> for AddInputs {
    fn from(items: Vec<Input>) -> Self {
        Self::new().with(items)
    }
}

/// A classified copy waiting to be routed into the result tree.
struct Pending {
    group: Option<String>,
    parent_base: Option<String>,
    node: Index,
}

/// Builds well-formed trees and moves them through a `CodecBackend`.
pub struct Assembler {
    backend: Arc<dyn CodecBackend>,
    registry: Arc<SpecializationRegistry>,
    settings: Arc<Settings>,
}

impl Assembler {
    pub fn new(
        backend: Arc<dyn CodecBackend>,
        registry: Arc<SpecializationRegistry>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            backend,
            registry,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn classifier(&self) -> Classifier<'_> {
        Classifier::new(&self.registry)
    }

    fn merger(&self) -> Merger {
        Merger::new(self.settings.merge_policy())
    }

    /// Reclassify the subtree below `root`.
    pub fn classify(&self, arena: &mut NodeArena, root: Index) -> ApplicationResult<Index> {
        Ok(self.classifier().classify(arena, root)?)
    }

    /// Assemble one tree from `inputs`.
    ///
    /// Whole trees contribute their children; bases go under the tree root;
    /// zones go into the base named by their group, else the base they came
    /// from, else the default base; anything else goes under the root, or into
    /// the group's base when grouped. Inputs are copied, never moved.
    #[instrument(level = "debug", skip(self, arena, inputs))]
    pub fn add(&self, arena: &mut NodeArena, inputs: impl Into<AddInputs>) -> ApplicationResult<Index> {
        let inputs = inputs.into();
        let entries = inputs.flatten();
        let classifier = self.classifier();
        for (_, idx) in &entries {
            check_input(arena, *idx)?;
            classifier.check(arena, *idx)?;
        }

        let mut pending: Vec<Pending> = Vec::with_capacity(entries.len());
        for (group, idx) in entries {
            let parent_base = parent_base_name(arena, idx)?;
            let copy = arena.deep_copy(idx)?;
            if let Err(e) = classifier.classify(arena, copy) {
                arena.remove_subtree(copy)?;
                for p in pending {
                    arena.remove_subtree(p.node)?;
                }
                return Err(e.into());
            }
            pending.push(Pending {
                group: group.map(str::to_string),
                parent_base,
                node: copy,
            });
        }

        let builder = self.settings.entity_builder();
        let merger = self.merger();
        let tree = builder.tree(arena)?;
        let mut bases: HashMap<String, Index> = HashMap::new();
        for p in pending {
            self.place(arena, &merger, &builder, tree, &mut bases, p)?;
        }

        let renames = arena.ensure_unique_names_recursive(tree)?;
        if !renames.is_empty() {
            debug!("renamed {} nodes", renames.len());
        }
        if self.settings.unique_zone_names {
            rename_zones_tree_wide(arena, tree)?;
        }
        self.classifier().classify(arena, tree)?;
        debug!("assembled tree of {} nodes", arena.iter_preorder(tree).count());
        Ok(tree)
    }

    fn place(
        &self,
        arena: &mut NodeArena,
        merger: &Merger,
        builder: &EntityBuilder,
        tree: Index,
        bases: &mut HashMap<String, Index>,
        pending: Pending,
    ) -> ApplicationResult<()> {
        let node = pending.node;
        let kind = arena.kind(node)?.clone();
        match kind {
            EntityKind::Tree => {
                let links = std::mem::take(&mut arena.data_mut(node)?.links);
                add_links(arena, tree, links)?;
                for child in arena.children(node)?.to_vec() {
                    arena.detach(child)?;
                    merger.absorb(arena, tree, child)?;
                }
                arena.remove_subtree(node)?;
            }
            EntityKind::Base => {
                let held = merger.absorb(arena, tree, node)?;
                if let Ok(name) = arena.name(held) {
                    bases.entry(name.to_string()).or_insert(held);
                }
            }
            k if k.is_zone_like() => {
                let base_name = pending
                    .group
                    .as_deref()
                    .or(pending.parent_base.as_deref())
                    .unwrap_or(&self.settings.default_base_name)
                    .to_string();
                let base = self.ensure_base(arena, builder, tree, bases, &base_name)?;
                merger.absorb(arena, base, node)?;
            }
            _ => {
                let target = match pending.group.as_deref() {
                    Some(name) => self.ensure_base(arena, builder, tree, bases, name)?,
                    None => tree,
                };
                merger.absorb(arena, target, node)?;
            }
        }
        Ok(())
    }

    fn ensure_base(
        &self,
        arena: &mut NodeArena,
        builder: &EntityBuilder,
        tree: Index,
        bases: &mut HashMap<String, Index>,
        name: &str,
    ) -> ApplicationResult<Index> {
        if let Some(&base) = bases.get(name) {
            if arena.contains(base) {
                return Ok(base);
            }
        }
        let existing = arena.children(tree)?.iter().copied().find(|&c| {
            arena
                .data(c)
                .is_ok_and(|d| d.name == name && (d.kind == EntityKind::Base || d.type_tag == BASE_TAG))
        });
        let base = match existing {
            Some(base) => base,
            None => {
                let base = builder.base(arena, name, Some(tree))?;
                arena.ensure_unique_sibling_names(tree)?;
                self.classifier().classify(arena, base)?;
                debug!("created base {}", name);
                base
            }
        };
        bases.insert(name.to_string(), base);
        Ok(base)
    }

    /// Zones of the tree assembled from `inputs`, in pre-order.
    pub fn get_zones(&self, arena: &mut NodeArena, inputs: impl Into<AddInputs>) -> ApplicationResult<Vec<Index>> {
        let tree = self.add(arena, inputs)?;
        Ok(collect_kind(arena, tree, EntityKind::is_zone_like))
    }

    /// Bases of the tree assembled from `inputs`, in pre-order.
    pub fn get_bases(&self, arena: &mut NodeArena, inputs: impl Into<AddInputs>) -> ApplicationResult<Vec<Index>> {
        let tree = self.add(arena, inputs)?;
        Ok(collect_kind(arena, tree, |k| *k == EntityKind::Base))
    }

    /// Load a stored tree and classify it. Stored records that are not a
    /// tree root are assembled into one.
    #[instrument(level = "debug", skip(self, arena))]
    pub fn load(&self, arena: &mut NodeArena, source: &str) -> ApplicationResult<Index> {
        let (raw, links) = self.backend.load_tree(source).for_request("/", source)?;
        let tree = self.adopt(arena, raw, links)?;
        info!("loaded {}", source);
        Ok(tree)
    }

    /// Load several sources in parallel and assemble them into one tree.
    #[instrument(level = "debug", skip(self, arena, sources))]
    pub fn load_many<S>(&self, arena: &mut NodeArena, sources: &[S]) -> ApplicationResult<Index>
    where
        S: AsRef<str> + Sync,
    {
        let records = sources
            .par_iter()
            .map(|s| {
                let source = s.as_ref();
                self.backend.load_tree(source).for_request("/", source)
            })
            .collect::<ApplicationResult<Vec<(RawNode, Vec<Link>)>>>()?;

        let mut trees = Vec::with_capacity(records.len());
        for (raw, links) in records {
            match self.adopt(arena, raw, links) {
                Ok(tree) => trees.push(tree),
                Err(e) => {
                    for tree in trees {
                        arena.remove_subtree(tree)?;
                    }
                    return Err(e);
                }
            }
        }

        let result = self.add(arena, trees.clone());
        for tree in trees {
            arena.remove_subtree(tree)?;
        }
        let result = result?;
        info!("loaded {} sources", sources.len());
        Ok(result)
    }

    fn adopt(&self, arena: &mut NodeArena, raw: RawNode, links: Vec<Link>) -> ApplicationResult<Index> {
        let loaded = arena.from_raw(raw, None)?;
        let checked = check_input(arena, loaded)
            .and_then(|_| self.classifier().classify(arena, loaded).map_err(ApplicationError::from));
        if let Err(e) = checked {
            arena.remove_subtree(loaded)?;
            return Err(e);
        }

        let tree = if *arena.kind(loaded)? == EntityKind::Tree {
            loaded
        } else {
            let assembled = self.add(arena, loaded);
            arena.remove_subtree(loaded)?;
            assembled?
        };
        add_links(arena, tree, links)?;
        Ok(tree)
    }

    /// Read one node from `source`. A leading tree-root component is accepted
    /// and ignored, so `CGNSTree/Base/Zone` and `Base/Zone` name the same node.
    #[instrument(level = "debug", skip(self, arena))]
    pub fn read_node(&self, arena: &mut NodeArena, source: &str, path: &str) -> ApplicationResult<Index> {
        let components = split_path(path);
        let relative = strip_tree_name(&self.settings.tree_name, &components);
        let raw = self
            .backend
            .load_node_at_path(source, &relative.join("/"))
            .for_request(path, source)?;

        let mut location = vec![self.settings.tree_name.as_str()];
        location.extend(relative.iter().take(relative.len().saturating_sub(1)));
        let location = location.join("/");
        let node = arena.from_raw(raw, None).map_err(|e| e.under(&location))?;
        if let Err(e) = self.classifier().classify(arena, node) {
            arena.remove_subtree(node)?;
            return Err(e.under(&location).into());
        }
        Ok(node)
    }

    /// Save `inputs`. A single ungrouped tree root is written as is; anything
    /// else is assembled first. Returns the tree that was written.
    #[instrument(level = "debug", skip(self, arena, inputs, options))]
    pub fn save(
        &self,
        arena: &mut NodeArena,
        inputs: impl Into<AddInputs>,
        destination: &str,
        options: &SaveOptions,
    ) -> ApplicationResult<Index> {
        let inputs = inputs.into();
        let single_tree = match inputs.flatten().as_slice() {
            [(None, idx)]
                if arena
                    .data(*idx)
                    .is_ok_and(|d| d.kind == EntityKind::Tree || d.type_tag == TREE_TAG) =>
            {
                Some(*idx)
            }
            _ => None,
        };
        let tree = match single_tree {
            Some(tree) => {
                check_input(arena, tree)?;
                tree
            }
            None => self.add(arena, inputs)?,
        };

        let mut options = options.clone();
        for link in &arena.data(tree)?.links {
            if !options.links.contains(link) {
                options.links.push(link.clone());
            }
        }
        let raw = arena.to_raw(tree)?;
        self.backend
            .save_tree(&raw, destination, &options)
            .for_request("/", destination)?;
        info!("saved {} to {}", arena.name(tree)?, destination);
        Ok(tree)
    }

    /// Replace the node a link on `tree` points at with the node loaded from
    /// the link's target, and drop the link.
    #[instrument(level = "debug", skip(self, arena))]
    pub fn resolve_link(&self, arena: &mut NodeArena, tree: Index, local_path: &str) -> ApplicationResult<Index> {
        let tree_name = arena.name(tree)?.to_string();
        let wanted = split_path(local_path);
        let wanted = strip_tree_name(&tree_name, &wanted);

        let position = arena
            .data(tree)?
            .links
            .iter()
            .position(|l| strip_tree_name(&tree_name, &split_path(&l.local_path)) == wanted)
            .ok_or_else(|| ApplicationError::LinkNotFound(local_path.to_string()))?;
        let link = arena.data(tree)?.links[position].clone();

        let Some((name, parent_components)) = wanted.split_last() else {
            return Err(ApplicationError::LinkNotFound(local_path.to_string()));
        };
        let parent_path = parent_components.join("/");
        let parent = arena
            .get_relative(tree, &parent_path)?
            .ok_or_else(|| ApplicationError::NodeNotFound {
                path: parent_path.clone(),
                source_id: tree_name.clone(),
            })?;

        let raw = self
            .backend
            .load_node_at_path(&link.target_file, &link.target_path)
            .for_request(&link.target_path, &link.target_file)?;
        let location = arena.path_of(parent)?;
        let node = arena.from_raw(raw, None).map_err(|e| e.under(&location))?;
        let prepared = arena
            .set_name(node, name)
            .and_then(|_| self.classifier().classify(arena, node).map(|_| ()));
        if let Err(e) = prepared {
            arena.remove_subtree(node)?;
            return Err(e.under(&location).into());
        }

        let position_in_parent = match arena.find_child_by_name(parent, name)? {
            Some(placeholder) => {
                let at = arena
                    .children(parent)?
                    .iter()
                    .position(|&c| c == placeholder)
                    .unwrap_or(usize::MAX);
                arena.remove_subtree(placeholder)?;
                at
            }
            None => usize::MAX,
        };
        arena.attach_child_at(parent, position_in_parent, node)?;
        arena.data_mut(tree)?.links.remove(position);
        debug!("resolved link {} -> {}:{}", local_path, link.target_file, link.target_path);
        Ok(node)
    }
}

/// Rejects inputs with more than one tree root, or a tree root below the
/// input's apex.
fn check_input(arena: &NodeArena, idx: Index) -> ApplicationResult<()> {
    arena.node(idx)?;
    if !arena.only_contains_nodes(idx) {
        return Err(DomainError::MalformedSubtree(arena.path_of(idx)?).into());
    }
    let roots: Vec<Index> = arena
        .iter_preorder(idx)
        .filter(|(_, n)| n.data.type_tag == TREE_TAG || n.data.kind == EntityKind::Tree)
        .map(|(i, _)| i)
        .collect();
    match roots.as_slice() {
        [] => Ok(()),
        [only] if *only == idx => Ok(()),
        [only] => Err(DomainError::AmbiguousRoot {
            path: arena.path_of(*only)?,
            count: 1,
        }
        .into()),
        [_, second, ..] => Err(DomainError::AmbiguousRoot {
            path: arena.path_of(*second)?,
            count: roots.len(),
        }
        .into()),
    }
}

fn parent_base_name(arena: &NodeArena, idx: Index) -> ApplicationResult<Option<String>> {
    let Some(parent) = arena.parent(idx)? else {
        return Ok(None);
    };
    let data = arena.data(parent)?;
    if data.kind == EntityKind::Base || data.type_tag == BASE_TAG {
        Ok(Some(data.name.clone()))
    } else {
        Ok(None)
    }
}

fn add_links(arena: &mut NodeArena, tree: Index, links: Vec<Link>) -> ApplicationResult<()> {
    let held = &mut arena.data_mut(tree)?.links;
    for link in links {
        if !held.contains(&link) {
            held.push(link);
        }
    }
    Ok(())
}

fn collect_kind(arena: &NodeArena, tree: Index, pred: impl Fn(&EntityKind) -> bool) -> Vec<Index> {
    arena
        .iter_preorder(tree)
        .filter(|(_, n)| pred(&n.data.kind))
        .map(|(i, _)| i)
        .collect()
}

fn strip_tree_name<'a>(tree_name: &str, components: &[&'a str]) -> Vec<&'a str> {
    match components.split_first() {
        Some((first, rest)) if *first == tree_name => rest.to_vec(),
        _ => components.to_vec(),
    }
}

/// Rename zones so every zone in the tree has a distinct name, first in
/// pre-order keeping its own.
fn rename_zones_tree_wide(arena: &mut NodeArena, tree: Index) -> ApplicationResult<()> {
    let zones = collect_kind(arena, tree, EntityKind::is_zone_like);
    let names: Vec<String> = zones
        .iter()
        .map(|&z| arena.name(z).map(str::to_string))
        .collect::<Result<_, _>>()?;
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let mut touched = Vec::new();
    for (&zone, new_name) in zones.iter().zip(unique_names(&refs)) {
        if let Some(new_name) = new_name {
            arena.set_name(zone, &new_name)?;
            if let Some(parent) = arena.parent(zone)? {
                touched.push(parent);
            }
        }
    }
    for parent in touched.into_iter().unique() {
        let clashes = arena.ensure_unique_sibling_names(parent)?;
        if !clashes.is_empty() {
            warn!("{} siblings renamed after zone renaming", clashes.len());
        }
    }
    Ok(())
}
