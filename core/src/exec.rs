//! Command execution for external engine binaries.
//!
//! Shared output type and the collaborator contract used by the image
//! manager to invoke `docker`/`podman`, plus the default host
//! implementation backed by `tokio::process`.

use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{KilnError, Result};

/// Output from an executed engine command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Process exit code.
    pub exit_code: i32,
    /// Captured stdout bytes.
    pub stdout: Vec<u8>,
    /// Captured stderr bytes.
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Whether the process exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout decoded as UTF-8, lossily.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Stderr decoded as UTF-8, lossily.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Contract for running an external engine binary.
///
/// `argv[0]` is the binary, the rest are its arguments; `input` is an
/// optional byte stream submitted on stdin. A binary that cannot be
/// spawned at all reports [`KilnError::SpawnFailed`]; a binary that runs
/// and exits nonzero is a normal [`CommandOutput`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `argv` to completion, capturing stdout and stderr.
    async fn run(&self, argv: &[String], input: Option<&[u8]>) -> Result<CommandOutput>;
}

/// Default [`CommandRunner`] spawning processes on the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, argv: &[String], input: Option<&[u8]>) -> Result<CommandOutput> {
        let (binary, args) = argv
            .split_first()
            .ok_or_else(|| KilnError::Other("Empty argv".to_string()))?;

        let mut command = tokio::process::Command::new(binary);
        command
            .args(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(binary = %binary, args = ?args, "Spawning engine process");

        let mut child = command.spawn().map_err(|e| KilnError::SpawnFailed {
            binary: binary.clone(),
            message: e.to_string(),
        })?;

        // Feed stdin concurrently with draining output; a large payload
        // written serially before the wait can deadlock on a full pipe.
        let stdin = child.stdin.take();
        let feed = async move {
            if let (Some(mut pipe), Some(data)) = (stdin, input) {
                pipe.write_all(data).await?;
                pipe.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        // A broken pipe means the engine exited before consuming the whole
        // stream; its exit status carries the real failure.
        if let Err(e) = fed {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_output_serialization_roundtrip() {
        let output = CommandOutput {
            exit_code: 0,
            stdout: b"Successfully built 1234567890ab\n".to_vec(),
            stderr: vec![],
        };
        let json = serde_json::to_string(&output).unwrap();
        let parsed: CommandOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.exit_code, 0);
        assert_eq!(parsed.stdout, b"Successfully built 1234567890ab\n");
        assert!(parsed.stderr.is_empty());
    }

    #[test]
    fn test_command_output_success() {
        let ok = CommandOutput {
            exit_code: 0,
            stdout: vec![],
            stderr: vec![],
        };
        let failed = CommandOutput {
            exit_code: 1,
            stdout: vec![],
            stderr: b"no such file\n".to_vec(),
        };
        assert!(ok.success());
        assert!(!failed.success());
    }

    #[test]
    fn test_command_output_text_helpers() {
        let output = CommandOutput {
            exit_code: 125,
            stdout: b"out\n".to_vec(),
            stderr: b"err\n".to_vec(),
        };
        assert_eq!(output.stdout_text(), "out\n");
        assert_eq!(output.stderr_text(), "err\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_runner_captures_stdout() {
        let argv = vec![
            "sh".to_string(),
            "-c".to_string(),
            "printf hello".to_string(),
        ];
        let output = ProcessRunner.run(&argv, None).await.unwrap();
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, b"hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_runner_feeds_stdin() {
        let argv = vec!["cat".to_string()];
        let payload = b"streamed build context".to_vec();
        let output = ProcessRunner.run(&argv, Some(&payload)).await.unwrap();
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, payload);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_runner_nonzero_exit_is_not_an_error() {
        let argv = vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo bad >&2; exit 3".to_string(),
        ];
        let output = ProcessRunner.run(&argv, None).await.unwrap();
        assert_eq!(output.exit_code, 3);
        assert!(output.stderr_text().contains("bad"));
    }

    #[tokio::test]
    async fn test_process_runner_spawn_failure() {
        let argv = vec!["kiln-test-no-such-binary".to_string()];
        let result = ProcessRunner.run(&argv, None).await;
        assert!(matches!(result, Err(KilnError::SpawnFailed { .. })));
    }

    #[tokio::test]
    async fn test_process_runner_rejects_empty_argv() {
        let result = ProcessRunner.run(&[], None).await;
        assert!(matches!(result, Err(KilnError::Other(_))));
    }
}
