//! Engine construction.
//!
//! An [`Engine`] bundles the per-backend image driver with availability
//! and version probing. [`EngineFactory`] is pure construction: no I/O
//! happens until a probe or build is issued.

use std::sync::Arc;

use kiln_core::{CommandRunner, ProcessRunner, Result};

use crate::backend::{BackendConfig, EngineKind};
use crate::image::ImageManager;

/// A configured container engine.
#[derive(Clone)]
pub struct Engine {
    /// Image operations for this engine.
    pub images: ImageManager,
}

impl Engine {
    /// Wire an engine from a backend config and a command runner.
    pub fn new(config: BackendConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            images: ImageManager::new(config, runner),
        }
    }

    /// Which backend this engine drives.
    pub fn kind(&self) -> EngineKind {
        self.images.config().kind
    }

    /// Engine version string.
    pub async fn version(&self) -> Result<String> {
        self.images.version().await
    }

    /// Whether the engine binary can be spawned.
    pub async fn is_available(&self) -> bool {
        self.images.is_available().await
    }
}

/// Constructs backend-specific engines.
pub struct EngineFactory;

impl EngineFactory {
    /// Docker engine using the given binary name.
    pub fn create_docker(binary: impl Into<String>) -> Engine {
        Engine::new(BackendConfig::docker(binary), Arc::new(ProcessRunner))
    }

    /// Podman engine using the given binary name.
    pub fn create_podman(binary: impl Into<String>) -> Engine {
        Engine::new(BackendConfig::podman(binary), Arc::new(ProcessRunner))
    }

    /// Probe for a usable engine: docker first, then podman, each under
    /// its default binary name. Returns `None` when neither binary can be
    /// spawned.
    pub async fn detect() -> Option<Engine> {
        for engine in [
            Self::create_docker(EngineKind::Docker.default_binary()),
            Self::create_podman(EngineKind::Podman.default_binary()),
        ] {
            if engine.is_available().await {
                return Some(engine);
            }
        }
        None
    }
}
