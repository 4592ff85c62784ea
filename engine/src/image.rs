//! Image management: invocation construction, engine calls, output parsing.
//!
//! One shared [`ImageManager`] drives every backend; all variation flows
//! through the [`BackendConfig`] record it holds. Each call derives its
//! own materialized context and invocation, so the manager carries no
//! mutable state and concurrent builds are independent.

use std::sync::Arc;

use kiln_core::{BuildContext, CommandRunner, KilnError, Result};

use crate::backend::{parse_image_id, BackendConfig};
use crate::materialize::{materialize, MaterializedBuildContext};

/// The exact engine call derived from one build request: argv plus an
/// optional stdin payload.
///
/// Exactly one of the flag form (`-f <dockerfile> ... <context_dir>`) or
/// the stdin form (`-t <tag> -` with tar bytes) is produced, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInvocation {
    /// Full argv, binary first.
    pub argv: Vec<String>,
    /// Stdin payload for stream-mode builds.
    pub input: Option<Vec<u8>>,
}

/// Per-backend image driver.
#[derive(Clone)]
pub struct ImageManager {
    config: BackendConfig,
    runner: Arc<dyn CommandRunner>,
}

impl ImageManager {
    pub fn new(config: BackendConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// The backend configuration this manager drives.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Build an image and return its engine-assigned identifier.
    ///
    /// # Errors
    ///
    /// - [`KilnError::NotFound`] if a referenced Dockerfile or context
    ///   directory is missing.
    /// - [`KilnError::SpawnFailed`] if the engine binary cannot be spawned.
    /// - [`KilnError::BuildFailed`] on nonzero exit, carrying stderr.
    /// - [`KilnError::ParseFailed`] if the build succeeded but no image id
    ///   was recoverable from stdout.
    pub async fn build(&self, context: &BuildContext, tag: &str) -> Result<String> {
        let materialized = materialize(context, self.config.dockerfile_name)?;
        let invocation = self.invocation(&materialized, tag);

        tracing::debug!(
            backend = ?self.config.kind,
            argv = ?invocation.argv,
            stream = invocation.input.is_some(),
            "Invoking engine build"
        );

        let output = self
            .runner
            .run(&invocation.argv, invocation.input.as_deref())
            .await?;

        if !output.success() {
            return Err(KilnError::BuildFailed {
                stderr: output.stderr_text(),
            });
        }

        let stdout = output.stdout_text();
        let image_id = parse_image_id(&self.config, &stdout)
            .ok_or_else(|| KilnError::ParseFailed(stdout.trim().to_string()))?;

        tracing::info!(
            backend = ?self.config.kind,
            image = %image_id,
            tag = %tag,
            "Image built"
        );
        Ok(image_id)
    }

    /// Derive the engine call for a materialized plan. Pure; no I/O.
    pub fn invocation(
        &self,
        materialized: &MaterializedBuildContext,
        tag: &str,
    ) -> EngineInvocation {
        let binary = self.config.binary.clone();
        match materialized {
            MaterializedBuildContext::PathBuild {
                dockerfile_path,
                context_dir,
            } => EngineInvocation {
                argv: vec![
                    binary,
                    "build".to_string(),
                    "-f".to_string(),
                    dockerfile_path.display().to_string(),
                    "-t".to_string(),
                    tag.to_string(),
                    context_dir.display().to_string(),
                ],
                input: None,
            },
            MaterializedBuildContext::StreamBuild { tar_bytes } => EngineInvocation {
                argv: vec![
                    binary,
                    "build".to_string(),
                    "-t".to_string(),
                    tag.to_string(),
                    "-".to_string(),
                ],
                input: Some(tar_bytes.clone()),
            },
        }
    }

    /// Remove an image by id.
    pub async fn remove(&self, image_id: &str, force: bool) -> Result<()> {
        let mut argv = vec![self.config.binary.clone(), "rmi".to_string()];
        if force {
            argv.push("-f".to_string());
        }
        argv.push(image_id.to_string());

        let output = self.runner.run(&argv, None).await?;
        if !output.success() {
            tracing::warn!(
                backend = ?self.config.kind,
                image = %image_id,
                "Image removal failed"
            );
            return Err(KilnError::RemoveFailed {
                image: image_id.to_string(),
                stderr: output.stderr_text(),
            });
        }
        Ok(())
    }

    /// Report the engine version (first line of `<engine> version`).
    ///
    /// The exit code is ignored: docker reports a client version even when
    /// its daemon is unreachable.
    pub async fn version(&self) -> Result<String> {
        let output = self.runner.run(&self.probe_argv(), None).await?;
        let stdout = output.stdout_text();
        let line = stdout.lines().next().unwrap_or("").trim().to_string();
        if line.is_empty() {
            return Err(KilnError::Other(format!(
                "{} reported no version",
                self.config.binary
            )));
        }
        Ok(line)
    }

    /// Whether the engine binary can be spawned at all.
    ///
    /// A spawned binary that exits nonzero is still available; only a
    /// failed spawn counts as absent.
    pub async fn is_available(&self) -> bool {
        !matches!(
            self.runner.run(&self.probe_argv(), None).await,
            Err(KilnError::SpawnFailed { .. })
        )
    }

    fn probe_argv(&self) -> Vec<String> {
        vec![self.config.binary.clone(), "version".to_string()]
    }
}
