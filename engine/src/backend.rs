//! Per-backend configuration records.
//!
//! Backend variation (binary name, Dockerfile filename convention, how the
//! image id appears in build output) is captured in a small
//! [`BackendConfig`] record selected by [`EngineKind`]. One shared build
//! algorithm is parameterized by the record; there are no per-backend code
//! paths.

/// Supported container engine backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    Docker,
    Podman,
}

impl EngineKind {
    /// Default binary name for this backend.
    pub fn default_binary(self) -> &'static str {
        match self {
            EngineKind::Docker => "docker",
            EngineKind::Podman => "podman",
        }
    }
}

/// How a backend reports the built image id on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdMarker {
    /// The id follows a fixed prefix, e.g. `Successfully built <id>`.
    Prefix(&'static str),
    /// The id is printed as a bare hex line (podman prints it last).
    BareId,
}

/// Configuration record for one backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Which backend this record describes.
    pub kind: EngineKind,
    /// Engine binary to invoke.
    pub binary: String,
    /// Filename convention for Dockerfiles synthesized from inline text.
    pub dockerfile_name: &'static str,
    /// How the built image id appears in stdout.
    pub id_marker: IdMarker,
}

impl BackendConfig {
    /// Docker configuration with the given binary name.
    pub fn docker(binary: impl Into<String>) -> Self {
        Self {
            kind: EngineKind::Docker,
            binary: binary.into(),
            dockerfile_name: "Dockerfile",
            id_marker: IdMarker::Prefix("Successfully built"),
        }
    }

    /// Podman configuration with the given binary name.
    pub fn podman(binary: impl Into<String>) -> Self {
        Self {
            kind: EngineKind::Podman,
            binary: binary.into(),
            dockerfile_name: "Containerfile",
            id_marker: IdMarker::BareId,
        }
    }
}

/// Extract the built image id from engine stdout, per the backend's marker.
///
/// Scans bottom-up: the success line is the last thing a build prints.
pub fn parse_image_id(config: &BackendConfig, stdout: &str) -> Option<String> {
    match config.id_marker {
        IdMarker::Prefix(prefix) => stdout
            .lines()
            .rev()
            .filter_map(|line| line.trim().strip_prefix(prefix))
            .find_map(|rest| rest.split_whitespace().next())
            .map(str::to_string),
        IdMarker::BareId => stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| is_image_id(line))
            .map(str::to_string),
    }
}

/// Whether `candidate` looks like an engine-assigned image id:
/// an even-length hex string of 12 to 64 characters.
fn is_image_id(candidate: &str) -> bool {
    (12..=64).contains(&candidate.len())
        && candidate.len() % 2 == 0
        && hex::decode(candidate).is_ok()
}
