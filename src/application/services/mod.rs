//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (CodecBackend, FileSystem)
//! but are themselves concrete structs, not traits.

mod assembler;

pub use assembler::{AddInputs, Assembler};
