//! Labeled trees in the CGNS layout: classification, path lookup, sibling
//! naming, merging and assembly.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
