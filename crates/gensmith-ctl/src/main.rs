//! `gensmith`: run code generators from the command line.
//!
//! Loads a generator directory, resolves values from a RenderSpec file and
//! `--var` arguments, renders through `gensmith-engine`, and writes the result.

mod cli_config;
mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gensmith_engine::OverwritePolicy;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVES: &str = "gensmith=info,gensmith_engine=warn";
const VERBOSE_LOG_DIRECTIVES: &str = "gensmith=debug,gensmith_engine=debug";

#[derive(Debug, Parser)]
#[command(name = "gensmith", version, about, styles = output::clap_styles())]
pub(crate) struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Run a generator with values from the command line
    Generate {
        /// Generator directory or name found on the configured generator paths
        generator: String,

        /// RenderSpec or plain values YAML file supplying variable values
        #[arg(long)]
        values: Option<PathBuf>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Run the generator named in a RenderSpec file
    Render {
        /// RenderSpec YAML file
        render_spec: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Show the variables and templates of a generator
    Info {
        /// Generator directory or name
        generator: String,
    },

    /// Check a generator spec for errors without rendering
    Validate {
        /// Generator directory or name
        generator: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List generators found on the configured generator paths
    List,
}

/// Options shared by the commands that render and write files.
#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    /// Variable value as key=value (repeatable, overrides file values)
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// What to do with files that already exist: fail, skip or overwrite
    #[arg(long)]
    pub overwrite: Option<OverwritePolicy>,

    /// Render and list files without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Abort generation after this many seconds
    #[arg(long, value_name = "SECONDS", env = "GENSMITH_TIMEOUT")]
    pub timeout: Option<u64>,
}

fn init_tracing(verbose: bool) {
    let directives = if verbose {
        VERBOSE_LOG_DIRECTIVES
    } else {
        DEFAULT_LOG_DIRECTIVES
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli_config::load_cli_config();
    if let Err(e) = commands::dispatch(cli.command, &config) {
        output::error(&e);
        if let Some(hint) = e.hint() {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
