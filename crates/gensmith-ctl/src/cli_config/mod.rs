//! CLI configuration: where to find generators and how to write output.

pub(crate) mod loader;

pub(crate) use loader::{expand_path, load_cli_config};

use std::path::PathBuf;

use gensmith_engine::OverwritePolicy;
use serde::Deserialize;

/// Contents of `.gensmith.toml`.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct CliConfig {
    /// Directories scanned for generators, in order. `~/` is expanded.
    #[serde(default)]
    pub generator_paths: Vec<String>,

    /// Output directory when `--output` is not given.
    pub default_output_dir: Option<String>,

    /// Policy when `--overwrite` is not given.
    #[serde(default)]
    pub overwrite: OverwritePolicy,
}

impl CliConfig {
    /// Expanded generator search paths.
    pub(crate) fn search_paths(&self) -> Vec<PathBuf> {
        self.generator_paths
            .iter()
            .map(|p| expand_path(p))
            .collect()
    }
}
