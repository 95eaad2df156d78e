//! Entity kinds and the type-tag vocabulary the classifier dispatches on.

use std::fmt;

pub const TREE_TAG: &str = "CGNSTree_t";
pub const BASE_TAG: &str = "CGNSBase_t";
pub const ZONE_TAG: &str = "Zone_t";
pub const ZONE_TYPE_TAG: &str = "ZoneType_t";
pub const LIBRARY_VERSION_TAG: &str = "CGNSLibraryVersion_t";
pub const DATA_ARRAY_TAG: &str = "DataArray_t";
pub const USER_DEFINED_TAG: &str = "UserDefinedData_t";
pub const GRID_COORDINATES_TAG: &str = "GridCoordinates_t";
pub const FLOW_SOLUTION_TAG: &str = "FlowSolution_t";

pub const LIBRARY_VERSION_NAME: &str = "CGNSLibraryVersion";
pub const ZONE_TYPE_NAME: &str = "ZoneType";
pub const STRUCTURED: &str = "Structured";
pub const UNSTRUCTURED: &str = "Unstructured";
pub const GRID_COORDINATES_NAME: &str = "GridCoordinates";
pub const FLOW_SOLUTION_NAME: &str = "FlowSolution";

/// Metadata child of a zone holding an explicit specialization selector.
pub const COMPONENT_INFO_NAME: &str = ".Component#Info";
pub const KIND_NAME: &str = "kind";

/// Handle of a specialization registered in a `SpecializationRegistry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub usize);

/// What a node has been classified as.
///
/// Every kind is still a plain node: specialization only adds behavior.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum EntityKind {
    #[default]
    Node,
    Tree,
    Base,
    Zone,
    Curve,
    Registered {
        kind: String,
        handler: HandlerId,
    },
}

impl EntityKind {
    pub fn is_specialized(&self) -> bool {
        !matches!(self, EntityKind::Node)
    }

    /// Zones and everything derived from them.
    pub fn is_zone_like(&self) -> bool {
        matches!(
            self,
            EntityKind::Zone | EntityKind::Curve | EntityKind::Registered { .. }
        )
    }

    pub fn is_container(&self) -> bool {
        matches!(self, EntityKind::Tree | EntityKind::Base)
    }

    pub fn label(&self) -> &str {
        match self {
            EntityKind::Node => "Node",
            EntityKind::Tree => "Tree",
            EntityKind::Base => "Base",
            EntityKind::Zone => "Zone",
            EntityKind::Curve => "Curve",
            EntityKind::Registered { kind, .. } => kind,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
