//! Kiln Engine - container-image build orchestration.
//!
//! Converts a logical build request into the exact invocation of an
//! underlying container engine binary (`docker` or `podman`), reconciling
//! two build protocols behind one API:
//!
//! - Path mode: Dockerfile and context directory referenced by
//!   filesystem path (`build -f <dockerfile> -t <tag> <context>`).
//! - Stream mode: a synthesized tar archive delivered over stdin
//!   (`build -t <tag> -`).
//!
//! The engine-assigned image identifier is parsed from build output and
//! returned to the caller.

pub mod backend;
pub mod factory;
pub mod image;
pub mod materialize;

// Re-export common types
pub use backend::{parse_image_id, BackendConfig, EngineKind, IdMarker};
pub use factory::{Engine, EngineFactory};
pub use image::{EngineInvocation, ImageManager};
pub use materialize::{materialize, MaterializedBuildContext};

/// Kiln Engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
