//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::Assembler;
use crate::config::Settings;
use crate::domain::SpecializationRegistry;
use crate::infrastructure::backend::JsonBackend;
use crate::infrastructure::traits::{CodecBackend, FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Storage backend for trees
    pub backend: Arc<dyn CodecBackend>,

    /// Registered specialized zone kinds
    pub registry: Arc<SpecializationRegistry>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let backend = Arc::new(JsonBackend::new(fs.clone()));
        Self::with_deps(settings, fs, backend, SpecializationRegistry::new())
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        backend: Arc<dyn CodecBackend>,
        registry: SpecializationRegistry,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
            backend,
            registry: Arc::new(registry),
        }
    }

    pub fn assembler(&self) -> Assembler {
        Assembler::new(self.backend.clone(), self.registry.clone(), self.settings.clone())
    }
}
