//! Codec backends

mod json;
mod memory;

use serde::{Deserialize, Serialize};

use crate::domain::{Link, RawNode};

pub use json::JsonBackend;
pub use memory::MemoryBackend;

/// A stored tree together with its links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTree {
    pub tree: RawNode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}
