//! Registry of domain-specific zone specializations.
//!
//! Specializations are registered once at startup and addressed by a
//! `HandlerId`, which keeps classification a pure lookup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use generational_arena::Index;

use crate::domain::arena::NodeArena;
use crate::domain::kind::HandlerId;

/// A zone specialization selected by `.Component#Info/kind`.
pub trait Specialization: Send + Sync {
    /// Selector string this specialization answers to.
    fn kind(&self) -> &str;

    /// Checks whether `zone` can take this specialization.
    /// A rejection is not fatal: the node stays a plain zone.
    fn accepts(&self, arena: &NodeArena, zone: Index) -> Result<(), String>;
}

#[derive(Clone, Default)]
pub struct SpecializationRegistry {
    handlers: Vec<Arc<dyn Specialization>>,
    by_kind: HashMap<String, HandlerId>,
}

impl SpecializationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a specialization. A later registration for the same kind
    /// replaces the earlier one.
    pub fn register(&mut self, handler: Arc<dyn Specialization>) -> HandlerId {
        let id = HandlerId(self.handlers.len());
        self.by_kind.insert(handler.kind().to_string(), id);
        self.handlers.push(handler);
        id
    }

    pub fn lookup(&self, kind: &str) -> Option<(HandlerId, &dyn Specialization)> {
        let id = *self.by_kind.get(kind)?;
        self.handler(id).map(|h| (id, h))
    }

    pub fn handler(&self, id: HandlerId) -> Option<&dyn Specialization> {
        self.handlers.get(id.0).map(|h| h.as_ref())
    }

    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.by_kind.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl fmt::Debug for SpecializationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecializationRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
