//! Access to template sources.
//!
//! The engine never touches the filesystem directly. Callers hand it a
//! [`SourceReader`]; [`DirectorySource`] reads from a generator directory and
//! [`MemorySource`] serves in-memory content for tests and embedding.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::paths::normalize_relative;

/// Error reading a template source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source path '{0}' must be relative and stay inside the generator")]
    NotRelative(String),

    #[error("source '{0}' not found")]
    NotFound(String),

    #[error("failed to read source '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Reads template source text by the rendered `source` path.
pub trait SourceReader {
    fn read_source(&self, path: &str) -> Result<String, SourceError>;
}

impl<T: SourceReader + ?Sized> SourceReader for &T {
    fn read_source(&self, path: &str) -> Result<String, SourceError> {
        (**self).read_source(path)
    }
}

/// Reads sources from files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl SourceReader for DirectorySource {
    fn read_source(&self, path: &str) -> Result<String, SourceError> {
        let relative =
            normalize_relative(path).ok_or_else(|| SourceError::NotRelative(path.to_string()))?;
        let full = self.root.join(relative);
        tracing::debug!(path = %full.display(), "Reading template source");
        std::fs::read_to_string(&full).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => SourceError::NotFound(path.to_string()),
            _ => SourceError::Io {
                path: path.to_string(),
                source,
            },
        })
    }
}

/// In-memory sources keyed by normalized relative path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemorySource::insert`].
    pub fn with_file(mut self, path: &str, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add a file. Paths that do not normalize to a relative path are ignored.
    pub fn insert(&mut self, path: &str, content: impl Into<String>) {
        match normalize_relative(path) {
            Some(key) => {
                self.files.insert(key, content.into());
            }
            None => tracing::warn!(path, "Ignoring in-memory source with invalid path"),
        }
    }
}

impl SourceReader for MemorySource {
    fn read_source(&self, path: &str) -> Result<String, SourceError> {
        let key =
            normalize_relative(path).ok_or_else(|| SourceError::NotRelative(path.to_string()))?;
        self.files
            .get(&key)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(path.to_string()))
    }
}

impl<P: AsRef<str>, C: Into<String>> FromIterator<(P, C)> for MemorySource {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (path, content) in iter {
            source.insert(path.as_ref(), content);
        }
        source
    }
}
