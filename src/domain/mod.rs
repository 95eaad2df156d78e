//! Domain layer: the node model and the tree algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod classifier;
pub mod display;
pub mod error;
pub mod kind;
pub mod merger;
pub mod namer;
pub mod path;
pub mod raw;
pub mod registry;
pub mod value;
mod zone;

pub use arena::{NodeArena, NodeData, PostOrderIterator, PreOrderIterator, TreeNode};
pub use builder::EntityBuilder;
pub use classifier::Classifier;
pub use display::ToTermTree;
pub use error::{DomainError, DomainResult};
pub use kind::{EntityKind, HandlerId};
pub use merger::{Input, MergePolicy, Merger};
pub use namer::{base_name, unique_names, Rename};
pub use path::{split_path, validate_name, NodeContent};
pub use raw::{Link, RawNode};
pub use registry::{Specialization, SpecializationRegistry};
pub use value::{ArrayData, Value};

pub use generational_arena::Index;
