//! Constructors for the standard CGNS containers.
//!
//! Nodes are created as plain records; the classifier decides their kind.

use generational_arena::Index;

use crate::domain::arena::{NodeArena, NodeData};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::kind::{
    BASE_TAG, COMPONENT_INFO_NAME, DATA_ARRAY_TAG, FLOW_SOLUTION_NAME, FLOW_SOLUTION_TAG, GRID_COORDINATES_NAME,
    GRID_COORDINATES_TAG, KIND_NAME, LIBRARY_VERSION_NAME, LIBRARY_VERSION_TAG, STRUCTURED, TREE_TAG,
    USER_DEFINED_TAG, ZONE_TAG, ZONE_TYPE_NAME, ZONE_TYPE_TAG,
};
use crate::domain::path::validate_name;
use crate::domain::value::Value;

/// Builds trees, bases and zones with the children CGNS expects.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityBuilder {
    pub tree_name: String,
    pub library_version: f32,
    pub base_dimensions: Vec<i32>,
}

impl Default for EntityBuilder {
    fn default() -> Self {
        Self {
            tree_name: "CGNSTree".to_string(),
            library_version: 4.0,
            base_dimensions: vec![3, 3],
        }
    }
}

impl EntityBuilder {
    /// Detached tree root holding a `CGNSLibraryVersion` child.
    pub fn tree(&self, arena: &mut NodeArena) -> DomainResult<Index> {
        let tree = arena.insert_node(NodeData::new(&self.tree_name).with_tag(TREE_TAG), None)?;
        arena.insert_node(
            NodeData::new(LIBRARY_VERSION_NAME)
                .with_tag(LIBRARY_VERSION_TAG)
                .with_value(Value::r4(vec![self.library_version])),
            Some(tree),
        )?;
        Ok(tree)
    }

    pub fn base(&self, arena: &mut NodeArena, name: &str, parent: Option<Index>) -> DomainResult<Index> {
        validate_name(name)?;
        arena.insert_node(
            NodeData::new(name)
                .with_tag(BASE_TAG)
                .with_value(Value::i4(self.base_dimensions.clone())),
            parent,
        )
    }

    /// Structured zone with the given vertex count per index direction.
    pub fn zone(
        &self,
        arena: &mut NodeArena,
        name: &str,
        vertices: &[usize],
        parent: Option<Index>,
    ) -> DomainResult<Index> {
        validate_name(name)?;
        let zone = arena.insert_node(
            NodeData::new(name)
                .with_tag(ZONE_TAG)
                .with_value(Value::structured_zone_shape(vertices)),
            parent,
        )?;
        arena.insert_node(
            NodeData::new(ZONE_TYPE_NAME)
                .with_tag(ZONE_TYPE_TAG)
                .with_value(Value::text(STRUCTURED)),
            Some(zone),
        )?;
        Ok(zone)
    }

    /// Structured zone built from named arrays of one common shape, which
    /// gives the zone's vertex counts. Coordinates (`x`, `y`, `z` or their
    /// full `CoordinateX..Z` names) go under `GridCoordinates`, every other
    /// array under `FlowSolution`. Nothing is inserted when an array is
    /// rejected.
    pub fn zone_from_arrays(
        &self,
        arena: &mut NodeArena,
        name: &str,
        arrays: &[(&str, Value)],
        parent: Option<Index>,
    ) -> DomainResult<Index> {
        validate_name(name)?;
        let Some((first_name, first)) = arrays.first() else {
            return Err(DomainError::InvalidValue(format!("zone {} needs at least one array", name)));
        };
        let vertices = first.shape().to_vec();
        for (array_name, value) in arrays {
            validate_name(array_name)?;
            if value.shape() != vertices.as_slice() {
                return Err(DomainError::InvalidValue(format!(
                    "array {} has shape {:?}, {} has {:?}",
                    array_name,
                    value.shape(),
                    first_name,
                    vertices
                )));
            }
        }

        let zone = self.zone(arena, name, &vertices, parent)?;
        let has = |coordinate: bool| arrays.iter().any(|(n, _)| coordinate_name(n).is_some() == coordinate);
        let coordinates = match has(true) {
            true => Some(arena.insert_node(
                NodeData::new(GRID_COORDINATES_NAME).with_tag(GRID_COORDINATES_TAG),
                Some(zone),
            )?),
            false => None,
        };
        let fields = match has(false) {
            true => Some(arena.insert_node(
                NodeData::new(FLOW_SOLUTION_NAME).with_tag(FLOW_SOLUTION_TAG),
                Some(zone),
            )?),
            false => None,
        };

        for (array_name, value) in arrays {
            let (holder, child_name) = match coordinate_name(array_name) {
                Some(full) => (coordinates, full),
                None => (fields, *array_name),
            };
            if let Some(holder) = holder {
                arena.insert_node(
                    NodeData::new(child_name)
                        .with_tag(DATA_ARRAY_TAG)
                        .with_value(value.clone()),
                    Some(holder),
                )?;
            }
        }
        for holder in [coordinates, fields].into_iter().flatten() {
            arena.ensure_unique_sibling_names(holder)?;
        }
        Ok(zone)
    }

    /// Stores an explicit specialization selector on a zone, replacing any
    /// previous one.
    pub fn set_zone_kind(&self, arena: &mut NodeArena, zone: Index, kind: &str) -> DomainResult<Index> {
        let info = match arena.find_child_by_name(zone, COMPONENT_INFO_NAME)? {
            Some(info) => info,
            None => arena.insert_node(
                NodeData::new(COMPONENT_INFO_NAME).with_tag(USER_DEFINED_TAG),
                Some(zone),
            )?,
        };
        if let Some(previous) = arena.find_child_by_name(info, KIND_NAME)? {
            arena.remove_subtree(previous)?;
        }
        arena.insert_node(
            NodeData::new(KIND_NAME)
                .with_tag(DATA_ARRAY_TAG)
                .with_value(Value::text(kind)),
            Some(info),
        )
    }
}

/// Full CGNS name of a coordinate array, accepting the `x`/`y`/`z` shortcuts.
fn coordinate_name(name: &str) -> Option<&'static str> {
    match name {
        "x" | "X" | "CoordinateX" => Some("CoordinateX"),
        "y" | "Y" | "CoordinateY" => Some("CoordinateY"),
        "z" | "Z" | "CoordinateZ" => Some("CoordinateZ"),
        _ => None,
    }
}
