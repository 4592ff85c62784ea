//! Kiln Core - Foundational Types and Abstractions
//!
//! This crate provides the types shared across the kiln build stack:
//! the error taxonomy, the build-request value object, and the
//! command-execution collaborator contract.

pub mod context;
pub mod error;
pub mod exec;

// Re-export commonly used types
pub use context::{BuildContext, DockerfileSource};
pub use error::{KilnError, Result};
pub use exec::{CommandOutput, CommandRunner, ProcessRunner};

/// Kiln version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
