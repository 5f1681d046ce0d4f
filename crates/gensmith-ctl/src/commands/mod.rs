//! Command handlers for the gensmith CLI.

pub(crate) mod generate;
pub(crate) mod info;
pub(crate) mod list;
pub(crate) mod validate;

use std::path::Path;

use gensmith_engine::loader::{find_generator, load_generator};
use gensmith_engine::GeneratorDir;

use crate::cli_config::CliConfig;
use crate::error::{CtlError, CtlResult};
use crate::Commands;

pub(crate) fn dispatch(command: Commands, config: &CliConfig) -> CtlResult<()> {
    match command {
        Commands::Generate {
            generator,
            values,
            run,
        } => generate::handle_generate(config, &generator, values.as_deref(), &run),
        Commands::Render { render_spec, run } => {
            generate::handle_render(config, &render_spec, &run)
        }
        Commands::Info { generator } => info::handle_info(config, &generator),
        Commands::Validate { generator, json } => {
            validate::handle_validate(config, &generator, json)
        }
        Commands::List => list::handle_list(config),
    }
}

/// Load a generator given as a directory path or a name on the search paths.
///
/// Relative directory paths are tried against `base` first when it is given.
pub(crate) fn resolve_generator(
    config: &CliConfig,
    generator: &str,
    base: Option<&Path>,
) -> CtlResult<GeneratorDir> {
    let candidates = [base.map(|b| b.join(generator)), Some(generator.into())];
    if let Some(dir) = candidates.into_iter().flatten().find(|p| p.is_dir()) {
        return Ok(load_generator(&dir)?);
    }

    match find_generator(&config.search_paths(), generator) {
        Some(dir) => {
            tracing::debug!(generator, dir = %dir.display(), "Resolved generator by name");
            Ok(load_generator(&dir)?)
        }
        None => Err(CtlError::GeneratorNotFound(generator.to_string())),
    }
}
