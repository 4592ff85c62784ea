//! Build request types.
//!
//! A [`BuildContext`] describes one logical image build: where the
//! Dockerfile comes from, which directory (if any) serves as the build
//! context, and auxiliary files to place alongside the Dockerfile.

use std::collections::HashMap;
use std::path::PathBuf;

/// Source of the Dockerfile for a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockerfileSource {
    /// Inline Dockerfile text, synthesized into the context at build time.
    Inline(String),
    /// Path to an existing Dockerfile on disk.
    Path(PathBuf),
}

/// A logical build request.
///
/// Which [`DockerfileSource`] form is active determines how the request
/// is resolved:
///
/// - `Path` without a context path: the Dockerfile's parent directory
///   becomes the build context.
/// - `Inline` with a context path: the text is written into the context
///   directory under the backend's filename convention before the build.
/// - `Inline` without a context path: the build is streamed to the engine
///   as an in-memory tar archive; nothing touches the filesystem.
///
/// Empty inline text is accepted and forwarded as-is; Dockerfile syntax
/// validation belongs to the engine binary.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Dockerfile source (inline text or on-disk path).
    pub dockerfile: DockerfileSource,
    /// Build context directory, if any.
    pub context_path: Option<PathBuf>,
    /// Auxiliary files (relative name -> bytes) placed alongside the Dockerfile.
    pub files: HashMap<String, Vec<u8>>,
}

impl BuildContext {
    /// Create a build request from inline Dockerfile text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            dockerfile: DockerfileSource::Inline(text.into()),
            context_path: None,
            files: HashMap::new(),
        }
    }

    /// Create a build request from an on-disk Dockerfile path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            dockerfile: DockerfileSource::Path(path.into()),
            context_path: None,
            files: HashMap::new(),
        }
    }

    /// Use `dir` as the build context directory.
    pub fn with_context_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.context_path = Some(dir.into());
        self
    }

    /// Add an auxiliary file to place alongside the Dockerfile.
    ///
    /// `name` is relative to the context directory (or tar root) and may
    /// contain subdirectories.
    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(name.into(), content.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_defaults() {
        let context = BuildContext::from_text("FROM alpine");
        assert_eq!(
            context.dockerfile,
            DockerfileSource::Inline("FROM alpine".to_string())
        );
        assert!(context.context_path.is_none());
        assert!(context.files.is_empty());
    }

    #[test]
    fn test_from_path_defaults() {
        let context = BuildContext::from_path("/tmp/x/Dockerfile");
        assert_eq!(
            context.dockerfile,
            DockerfileSource::Path(PathBuf::from("/tmp/x/Dockerfile"))
        );
        assert!(context.context_path.is_none());
    }

    #[test]
    fn test_with_context_dir() {
        let context = BuildContext::from_text("FROM alpine").with_context_dir("/tmp/ctx");
        assert_eq!(context.context_path, Some(PathBuf::from("/tmp/ctx")));
    }

    #[test]
    fn test_with_file() {
        let context = BuildContext::from_text("FROM alpine")
            .with_file("extra.txt", b"content".to_vec())
            .with_file("sub/nested.bin", vec![0u8, 1, 2]);
        assert_eq!(context.files.get("extra.txt"), Some(&b"content".to_vec()));
        assert_eq!(context.files.get("sub/nested.bin"), Some(&vec![0u8, 1, 2]));
    }

    #[test]
    fn test_empty_inline_text_is_accepted() {
        let context = BuildContext::from_text("");
        assert_eq!(context.dockerfile, DockerfileSource::Inline(String::new()));
    }
}
