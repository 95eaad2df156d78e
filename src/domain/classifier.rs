//! Classification of generic nodes into specialized entity kinds.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::arena::NodeArena;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::kind::{EntityKind, BASE_TAG, TREE_TAG, ZONE_TAG};
use crate::domain::registry::SpecializationRegistry;

/// Maps generic nodes to entity kinds, bottom-up.
///
/// Kinds for the whole subtree are decided before any is written back, so a
/// failing classification leaves the arena untouched.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'r> {
    registry: &'r SpecializationRegistry,
}

impl<'r> Classifier<'r> {
    pub fn new(registry: &'r SpecializationRegistry) -> Self {
        Self { registry }
    }

    /// Classifies `root` and its whole subtree. Returns the (unchanged) handle
    /// of the root.
    #[instrument(level = "debug", skip(self, arena))]
    pub fn classify(&self, arena: &mut NodeArena, root: Index) -> DomainResult<Index> {
        arena.node(root)?;
        let mut decided: HashMap<Index, EntityKind> = HashMap::new();
        for (idx, node) in arena.iter_postorder(root) {
            if node.data.kind.is_specialized() {
                continue;
            }
            let kind = self.kind_of(arena, idx)?;
            if kind.is_specialized() {
                decided.insert(idx, kind);
            }
        }

        debug!("classified {} nodes", decided.len());
        for (idx, kind) in decided {
            arena.data_mut(idx)?.kind = kind;
        }
        Ok(root)
    }

    /// Applies the classification rules to the subtree without writing any
    /// kind. Errors name nodes by their path in `arena`, so checking a node
    /// in place reports where it really sits.
    pub fn check(&self, arena: &NodeArena, root: Index) -> DomainResult<()> {
        arena.node(root)?;
        arena
            .iter_postorder(root)
            .try_for_each(|(idx, _)| self.kind_of(arena, idx).map(|_| ()))
    }

    /// Kind a single node would get, looking at its tag, payload shape and
    /// metadata children. Already specialized nodes keep their kind.
    pub fn kind_of(&self, arena: &NodeArena, idx: Index) -> DomainResult<EntityKind> {
        let data = arena.data(idx)?;
        if data.kind.is_specialized() {
            return Ok(data.kind.clone());
        }
        match data.type_tag.as_str() {
            ZONE_TAG => self.zone_kind(arena, idx),
            BASE_TAG => Ok(EntityKind::Base),
            TREE_TAG => Ok(EntityKind::Tree),
            _ => Ok(EntityKind::Node),
        }
    }

    fn zone_kind(&self, arena: &NodeArena, idx: Index) -> DomainResult<EntityKind> {
        let Some(selector) = arena.zone_kind_selector(idx)? else {
            let is_curve = arena.is_structured(idx)? && arena.zone_dim(idx)? == Some(1);
            return Ok(if is_curve {
                EntityKind::Curve
            } else {
                EntityKind::Zone
            });
        };

        if let Some((handler, specialization)) = self.registry.lookup(&selector) {
            return match specialization.accepts(arena, idx) {
                Ok(()) => Ok(EntityKind::Registered {
                    kind: selector,
                    handler,
                }),
                Err(reason) => {
                    warn!(
                        "{} rejected {}: {}; keeping it a Zone",
                        selector,
                        arena.path_of(idx)?,
                        reason
                    );
                    Ok(EntityKind::Zone)
                }
            };
        }

        // built-in selectors
        match selector.as_str() {
            "Zone" => Ok(EntityKind::Zone),
            "Curve" => Ok(EntityKind::Curve),
            _ => Err(DomainError::UnsupportedKind {
                kind: selector,
                path: arena.path_of(idx)?,
            }),
        }
    }
}
