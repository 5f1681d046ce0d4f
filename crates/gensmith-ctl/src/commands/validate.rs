use gensmith_engine::validate::validate;

use super::resolve_generator;
use crate::cli_config::CliConfig;
use crate::error::{CtlError, CtlResult};
use crate::output;

pub(crate) fn handle_validate(config: &CliConfig, generator: &str, json: bool) -> CtlResult<()> {
    let generator = resolve_generator(config, generator, None)?;
    let report = validate(&generator.spec);

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => output::plain(text),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize validation report"),
        }
    } else {
        output::header(format!(
            "Generator '{}': {} template(s), {} variable(s)",
            generator.name, report.template_count, report.variable_count
        ));
        for finding in &report.findings {
            output::finding(finding);
        }
        if report.valid {
            output::success("Spec is valid.");
        }
    }

    let errors = report.errors().count();
    if errors > 0 {
        return Err(CtlError::Invalid(errors));
    }
    Ok(())
}
