//! Generator directory loading and discovery.
//!
//! A generator root is a directory holding exactly one
//! `generator-<name>.yaml` (or `.yml`) spec next to its template files.
//! Discovery scans each search path and its immediate subdirectories.

use std::path::{Path, PathBuf};

use crate::source::DirectorySource;
use crate::spec::GeneratorSpec;

const SPEC_PREFIX: &str = "generator-";
const SPEC_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Error while loading a generator.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("no generator-<name>.yaml found in '{}'", .0.display())]
    NoSpec(PathBuf),

    #[error("multiple generator specs found in '{}': {}", dir.display(), list(candidates))]
    AmbiguousSpec {
        dir: PathBuf,
        candidates: Vec<PathBuf>,
    },

    #[error("failed to read generator spec '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse generator spec '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to parse generator spec: {0}")]
    Parse(#[from] serde_yaml::Error),
}

fn list(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A loaded generator: its spec plus the directory its sources live in.
#[derive(Debug, Clone)]
pub struct GeneratorDir {
    /// Name taken from the spec file name (`generator-<name>.yaml`).
    pub name: String,
    pub root: PathBuf,
    pub spec_path: PathBuf,
    pub spec: GeneratorSpec,
}

impl GeneratorDir {
    /// Reader for the template files of this generator.
    pub fn source_reader(&self) -> DirectorySource {
        DirectorySource::new(&self.root)
    }
}

/// Parse a generator spec from a YAML string.
pub fn parse_spec(yaml: &str) -> Result<GeneratorSpec, LoadError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Parse a generator spec YAML file.
pub fn parse_spec_file(path: &Path) -> Result<GeneratorSpec, LoadError> {
    let yaml = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_yaml::from_str(&yaml).map_err(|e| LoadError::Yaml {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the generator rooted at `dir`.
pub fn load_generator(dir: &Path) -> Result<GeneratorDir, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::NotADirectory(dir.to_path_buf()));
    }

    let mut candidates = spec_files(dir).map_err(|e| LoadError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let (name, spec_path) = match candidates.len() {
        0 => return Err(LoadError::NoSpec(dir.to_path_buf())),
        1 => candidates.remove(0),
        _ => {
            return Err(LoadError::AmbiguousSpec {
                dir: dir.to_path_buf(),
                candidates: candidates.into_iter().map(|(_, path)| path).collect(),
            })
        }
    };

    let spec = parse_spec_file(&spec_path)?;
    tracing::debug!(
        generator = %name,
        templates = spec.templates.len(),
        variables = spec.variables.len(),
        "Loaded generator"
    );

    Ok(GeneratorDir {
        name,
        root: dir.to_path_buf(),
        spec_path,
        spec,
    })
}

/// Discover all generator roots under the given search paths, sorted.
pub fn discover_generators(search_paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for base in search_paths {
        if !base.is_dir() {
            tracing::debug!(?base, "Generator search path does not exist, skipping");
            continue;
        }

        if is_generator_root(base) {
            found.push(base.clone());
            continue;
        }

        let entries = match std::fs::read_dir(base) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(?base, error = %e, "Cannot read generator search path");
                continue;
            }
        };

        for entry in entries.filter_map(Result::ok) {
            let subdir = entry.path();
            if subdir.is_dir() && is_generator_root(&subdir) {
                found.push(subdir);
            }
        }
    }

    found.sort();
    found.dedup();
    found
}

/// Find the generator named `name` under the search paths.
pub fn find_generator(search_paths: &[PathBuf], name: &str) -> Option<PathBuf> {
    discover_generators(search_paths).into_iter().find(|dir| {
        spec_files(dir)
            .map(|files| files.iter().any(|(n, _)| n == name))
            .unwrap_or(false)
    })
}

fn is_generator_root(dir: &Path) -> bool {
    spec_files(dir).map(|f| !f.is_empty()).unwrap_or(false)
}

/// `(name, path)` of every spec file directly inside `dir`, sorted by path.
fn spec_files(dir: &Path) -> std::io::Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = spec_name(&path) {
            files.push((name, path));
        }
    }
    files.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(files)
}

fn spec_name(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?;
    if !SPEC_EXTENSIONS.contains(&extension) {
        return None;
    }
    let name = path.file_stem()?.to_str()?.strip_prefix(SPEC_PREFIX)?;
    (!name.is_empty()).then(|| name.to_string())
}
