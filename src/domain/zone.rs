//! Structural queries on zone-tagged nodes.

use generational_arena::Index;

use crate::domain::arena::NodeArena;
use crate::domain::error::DomainResult;
use crate::domain::kind::{COMPONENT_INFO_NAME, KIND_NAME, UNSTRUCTURED, ZONE_TYPE_NAME};

impl NodeArena {
    /// Explicit specialization selector stored in `.Component#Info/kind`.
    pub fn zone_kind_selector(&self, zone: Index) -> DomainResult<Option<String>> {
        let Some(info) = self.find_child_by_name(zone, COMPONENT_INFO_NAME)? else {
            return Ok(None);
        };
        let Some(kind) = self.find_child_by_name(info, KIND_NAME)? else {
            return Ok(None);
        };
        Ok(self
            .data(kind)?
            .value
            .as_ref()
            .and_then(|v| v.as_text())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }

    /// Structured unless a `ZoneType` child says otherwise.
    pub fn is_structured(&self, zone: Index) -> DomainResult<bool> {
        let Some(zone_type) = self.find_child_by_name(zone, ZONE_TYPE_NAME)? else {
            return Ok(true);
        };
        let text = self.data(zone_type)?.value.as_ref().and_then(|v| v.as_text());
        Ok(text.map_or(true, |t| t.trim() != UNSTRUCTURED))
    }

    /// Index dimension read from the zone size array: one row per direction.
    pub fn zone_dim(&self, zone: Index) -> DomainResult<Option<usize>> {
        let Some(value) = self.data(zone)?.value.as_ref() else {
            return Ok(None);
        };
        Ok(match value.shape() {
            [rows, 3] => Some(*rows),
            [3] => Some(1),
            _ => None,
        })
    }
}
