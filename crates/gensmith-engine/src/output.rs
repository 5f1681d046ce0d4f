//! Writing rendered files under an output root.
//!
//! The writer checks the whole batch before touching the filesystem. Unsafe
//! target paths, two units writing the same target, a target nested under
//! another target or under an existing file, and (under
//! [`OverwritePolicy::Fail`]) existing files all reject the batch with nothing
//! written.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::generator::RenderedFile;
use crate::iteration::UnitLocation;
use crate::paths::normalize_relative;

/// What to do when a target file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    #[default]
    Fail,
    Skip,
    Overwrite,
}

impl fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fail => "fail",
            Self::Skip => "skip",
            Self::Overwrite => "overwrite",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown overwrite policy '{0}' (expected fail, skip or overwrite)")]
pub struct ParsePolicyError(String);

impl FromStr for OverwritePolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "skip" => Ok(Self::Skip),
            "overwrite" => Ok(Self::Overwrite),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Error while writing rendered files.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("{location}: target '{}' must be relative and stay inside the output directory", path.display())]
    UnsafePath { location: UnitLocation, path: PathBuf },

    #[error("target '{}' is produced by both {first} and {second}", path.display())]
    DuplicateTarget {
        path: PathBuf,
        first: UnitLocation,
        second: UnitLocation,
    },

    #[error("target '{}' of {second} is nested under target '{}' of {first}", path.display(), parent.display())]
    NestedTarget {
        path: PathBuf,
        parent: PathBuf,
        first: UnitLocation,
        second: UnitLocation,
    },

    #[error("'{}' already exists (use --overwrite skip or --overwrite overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("'{}' is an existing directory and cannot be overwritten", .0.display())]
    TargetIsDirectory(PathBuf),

    #[error("cannot write '{}': '{}' exists and is not a directory", path.display(), blocker.display())]
    BlockedByFile { path: PathBuf, blocker: PathBuf },

    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Files handled by one [`OutputWriter::write_all`] call, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Writes rendered files below `root`.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
    policy: OverwritePolicy,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>, policy: OverwritePolicy) -> Self {
        Self {
            root: root.into(),
            policy,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full destination paths for `files`, after the batch checks.
    pub fn plan(&self, files: &[RenderedFile]) -> Result<Vec<PathBuf>, WriteError> {
        let mut seen: HashMap<PathBuf, UnitLocation> = HashMap::new();
        let mut relatives = Vec::with_capacity(files.len());

        for file in files {
            let relative = file
                .path
                .to_str()
                .and_then(normalize_relative)
                .ok_or_else(|| WriteError::UnsafePath {
                    location: file.location,
                    path: file.path.clone(),
                })?;
            if let Some(first) = seen.insert(relative.clone(), file.location) {
                return Err(WriteError::DuplicateTarget {
                    path: relative,
                    first,
                    second: file.location,
                });
            }
            relatives.push((relative, file.location));
        }

        let mut planned = Vec::with_capacity(files.len());
        for (relative, location) in relatives {
            for ancestor in parent_dirs(&relative) {
                if let Some(first) = seen.get(ancestor) {
                    return Err(WriteError::NestedTarget {
                        path: relative.clone(),
                        parent: ancestor.to_path_buf(),
                        first: *first,
                        second: location,
                    });
                }
                let on_disk = self.root.join(ancestor);
                if on_disk.exists() && !on_disk.is_dir() {
                    return Err(WriteError::BlockedByFile {
                        path: self.root.join(&relative),
                        blocker: on_disk,
                    });
                }
            }

            let full = self.root.join(relative);
            match self.policy {
                OverwritePolicy::Fail if full.exists() => {
                    return Err(WriteError::AlreadyExists(full));
                }
                OverwritePolicy::Overwrite if full.is_dir() => {
                    return Err(WriteError::TargetIsDirectory(full));
                }
                _ => {}
            }
            planned.push(full);
        }

        Ok(planned)
    }

    /// Check the batch, then write every file in order.
    pub fn write_all(&self, files: &[RenderedFile]) -> Result<WriteSummary, WriteError> {
        let planned = self.plan(files)?;
        let mut summary = WriteSummary::default();

        for (file, full_path) in files.iter().zip(planned) {
            if self.policy == OverwritePolicy::Skip && full_path.exists() {
                tracing::debug!(path = %full_path.display(), "Skipping existing file");
                summary.skipped.push(full_path);
                continue;
            }
            if let Some(parent) = full_path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(|e| WriteError::Io {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
                }
            }
            std::fs::write(&full_path, &file.content).map_err(|e| WriteError::Io {
                path: full_path.clone(),
                source: e,
            })?;
            summary.written.push(full_path);
        }

        tracing::info!(
            root = %self.root.display(),
            written = summary.written.len(),
            skipped = summary.skipped.len(),
            "Wrote generated files"
        );
        Ok(summary)
    }
}

/// Proper ancestors of a normalized relative path, nearest first.
fn parent_dirs(relative: &Path) -> impl Iterator<Item = &Path> {
    relative
        .ancestors()
        .skip(1)
        .filter(|p| !p.as_os_str().is_empty())
}
