use crate::cli_config::CliConfig;
use crate::error::CtlResult;
use crate::output;

use super::resolve_generator;

pub(crate) fn handle_info(config: &CliConfig, generator: &str) -> CtlResult<()> {
    let generator = resolve_generator(config, generator, None)?;
    let spec = &generator.spec;

    output::header(format!("Generator: {}", generator.name));
    output::label("Root", generator.root.display());
    output::label("Spec", generator.spec_path.display());

    if !spec.variables.is_empty() {
        output::blank();
        output::header("Variables:");
        for (name, variable) in &spec.variables {
            let required = if variable.is_required() {
                " (required)"
            } else {
                ""
            };
            let default = variable
                .effective_default()
                .map(|d| format!(" [default: {d}]"))
                .unwrap_or_default();
            let pattern = if variable.pattern.is_empty() {
                String::new()
            } else {
                format!(" [pattern: {}]", variable.pattern)
            };
            output::plain(format!("  --var {name}=...{required}{default}{pattern}"));
            if !variable.description.is_empty() {
                output::dim(format!("      {}", variable.description));
            }
        }
    }

    if !spec.templates.is_empty() {
        output::blank();
        output::header("Templates:");
        for template in &spec.templates {
            output::plain(format!("  {} -> {}", template.source, template.target));
            if !template.condition.trim().is_empty() {
                output::dim(format!("      when: {}", template.condition));
            }
            if !template.with_items.is_empty() {
                output::dim(format!("      for each of {} item(s)", template.with_items.len()));
            }
        }
    }

    Ok(())
}
