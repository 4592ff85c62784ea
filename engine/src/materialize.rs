//! Build-context materialization.
//!
//! Resolves a [`BuildContext`] into one of two concrete plans: a path
//! build referencing a Dockerfile and context directory on disk, or a
//! stream build carrying a self-contained in-memory tar archive for the
//! engine's build-from-stdin mode.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use kiln_core::{BuildContext, DockerfileSource, KilnError, Result};

/// A build request resolved to a concrete invocation plan.
///
/// Built fresh per build call and discarded once the engine call
/// completes. Files written to satisfy a path build stay on disk; the
/// context directory is owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterializedBuildContext {
    /// Dockerfile and context referenced by filesystem path.
    PathBuild {
        dockerfile_path: PathBuf,
        context_dir: PathBuf,
    },
    /// Self-contained tar archive streamed over stdin.
    StreamBuild { tar_bytes: Vec<u8> },
}

/// Resolve a build request into a concrete plan.
///
/// `dockerfile_name` is the active backend's filename convention, used
/// when inline text must be synthesized into a real file or tar entry.
/// Filesystem writes happen only when a context directory is
/// determinable.
pub fn materialize(
    context: &BuildContext,
    dockerfile_name: &str,
) -> Result<MaterializedBuildContext> {
    match &context.dockerfile {
        DockerfileSource::Path(dockerfile_path) => {
            if !dockerfile_path.is_file() {
                return Err(KilnError::NotFound {
                    path: dockerfile_path.clone(),
                });
            }
            let context_dir = match &context.context_path {
                Some(dir) => existing_dir(dir)?,
                None => parent_dir(dockerfile_path),
            };
            write_aux_files(&context_dir, &context.files)?;
            Ok(MaterializedBuildContext::PathBuild {
                dockerfile_path: dockerfile_path.clone(),
                context_dir,
            })
        }
        DockerfileSource::Inline(text) => match &context.context_path {
            Some(dir) => {
                let context_dir = existing_dir(dir)?;
                let dockerfile_path = context_dir.join(dockerfile_name);
                std::fs::write(&dockerfile_path, text)?;
                write_aux_files(&context_dir, &context.files)?;
                Ok(MaterializedBuildContext::PathBuild {
                    dockerfile_path,
                    context_dir,
                })
            }
            None => Ok(MaterializedBuildContext::StreamBuild {
                tar_bytes: build_tar(dockerfile_name, text, &context.files)?,
            }),
        },
    }
}

/// Context directory of a Dockerfile path.
///
/// A bare filename has an empty parent; treat it as the current directory.
fn parent_dir(dockerfile_path: &Path) -> PathBuf {
    match dockerfile_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn existing_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(KilnError::NotFound {
            path: dir.to_path_buf(),
        });
    }
    Ok(dir.to_path_buf())
}

/// Write auxiliary files under the context directory.
///
/// Plain create-or-overwrite binary writes; names may contain relative
/// subpaths, whose parent directories are created.
fn write_aux_files(dir: &Path, files: &HashMap<String, Vec<u8>>) -> Result<()> {
    for (name, content) in files {
        let target = dir.join(name);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, content)?;
    }
    Ok(())
}

/// Build an uncompressed in-memory tar archive holding the synthesized
/// Dockerfile plus every auxiliary file.
fn build_tar(
    dockerfile_name: &str,
    text: &str,
    files: &HashMap<String, Vec<u8>>,
) -> Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());
    append_entry(&mut builder, dockerfile_name, text.as_bytes())?;

    // Sorted for deterministic archives
    let mut names: Vec<&String> = files.keys().collect();
    names.sort();
    for name in names {
        append_entry(&mut builder, name, &files[name])?;
    }

    Ok(builder.into_inner()?)
}

fn append_entry(builder: &mut tar::Builder<Vec<u8>>, name: &str, content: &[u8]) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, name, content)?;
    Ok(())
}
