use gensmith_engine::loader::{discover_generators, load_generator};

use crate::cli_config::CliConfig;
use crate::error::CtlResult;
use crate::output;

pub(crate) fn handle_list(config: &CliConfig) -> CtlResult<()> {
    let search_paths = config.search_paths();
    if search_paths.is_empty() {
        output::warning("No generator paths configured.");
        output::hint("Add generator-paths = [\"./generators\"] to .gensmith.toml.");
        return Ok(());
    }

    let dirs = discover_generators(&search_paths);
    if dirs.is_empty() {
        output::warning("No generators found.");
        return Ok(());
    }

    output::header("Available generators:");
    output::blank();
    for dir in &dirs {
        match load_generator(dir) {
            Ok(generator) => {
                let required = generator
                    .spec
                    .variables
                    .values()
                    .filter(|v| v.is_required())
                    .count();
                output::item(format!(
                    "{} ({} template(s), {} required variable(s))",
                    generator.name,
                    generator.spec.templates.len(),
                    required
                ));
                output::dim(format!("    {}", dir.display()));
            }
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "Skipping unloadable generator");
                output::item(format!("{} (invalid: {e})", dir.display()));
            }
        }
    }
    output::blank();

    Ok(())
}
