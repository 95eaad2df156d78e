//! Shared test setup: logging and stub zone handlers.

use std::env;
use std::sync::{Arc, Once};

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{Index, NodeArena, Specialization, SpecializationRegistry};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "debug");
        }
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Zone handler that accepts or rejects every zone.
#[derive(Debug, Clone)]
pub struct StubHandler {
    kind: String,
    accept: bool,
}

impl StubHandler {
    pub fn accepting(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            accept: true,
        }
    }

    pub fn rejecting(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            accept: false,
        }
    }
}

impl Specialization for StubHandler {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn accepts(&self, _arena: &NodeArena, _zone: Index) -> Result<(), String> {
        if self.accept {
            Ok(())
        } else {
            Err(format!("{} handler rejects every zone", self.kind))
        }
    }
}

/// Registry holding `handlers`, in order.
pub fn registry_with(handlers: Vec<StubHandler>) -> SpecializationRegistry {
    let mut registry = SpecializationRegistry::new();
    for handler in handlers {
        registry.register(Arc::new(handler));
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn given_two_handlers_when_building_registry_then_both_kinds_listed() {
        let registry = registry_with(vec![StubHandler::accepting("Airfoil"), StubHandler::rejecting("Blade")]);
        assert_eq!(registry.kinds(), vec!["Airfoil", "Blade"]);
    }
}
