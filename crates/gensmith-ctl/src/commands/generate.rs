//! `generate` and `render`: run a generator and write its files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use gensmith_engine::render_spec::{load_render_spec, load_values, parse_var_args};
use gensmith_engine::{
    GenerateError, GenerateOptions, Generator, GeneratorDir, OutputWriter, RenderedFile,
    SuppliedValues,
};

use super::resolve_generator;
use crate::cli_config::{expand_path, CliConfig};
use crate::error::CtlResult;
use crate::output;
use crate::RunArgs;

pub(crate) fn handle_generate(
    config: &CliConfig,
    generator: &str,
    values_file: Option<&Path>,
    args: &RunArgs,
) -> CtlResult<()> {
    let generator = resolve_generator(config, generator, None)?;

    let mut supplied = match values_file {
        Some(path) => load_values(path)?,
        None => SuppliedValues::new(),
    };
    supplied.extend(parse_var_args(args.vars.as_slice())?);

    let out_dir = args
        .output
        .clone()
        .or_else(|| config.default_output_dir.as_deref().map(expand_path))
        .unwrap_or_else(|| PathBuf::from("."));

    run_generator(config, &generator, &supplied, &out_dir, args)
}

pub(crate) fn handle_render(
    config: &CliConfig,
    render_spec: &Path,
    args: &RunArgs,
) -> CtlResult<()> {
    let spec = load_render_spec(render_spec)?;
    let base = render_spec.parent().unwrap_or_else(|| Path::new("."));
    let generator = resolve_generator(config, &spec.generator, Some(base))?;

    let mut supplied = spec.supplied_values()?;
    supplied.extend(parse_var_args(args.vars.as_slice())?);

    let out_dir = args
        .output
        .clone()
        .or_else(|| spec.output.as_deref().map(|o| base.join(o)))
        .or_else(|| config.default_output_dir.as_deref().map(expand_path))
        .unwrap_or_else(|| PathBuf::from("."));

    run_generator(config, &generator, &supplied, &out_dir, args)
}

fn run_generator(
    config: &CliConfig,
    generator: &GeneratorDir,
    supplied: &SuppliedValues,
    out_dir: &Path,
    args: &RunArgs,
) -> CtlResult<()> {
    let engine = Generator::new(&generator.spec);
    let bindings = engine.resolve(supplied).map_err(GenerateError::from)?;
    let options = GenerateOptions {
        timeout: args.timeout.map(Duration::from_secs),
    };
    let files = engine.generate_with_options(&bindings, &generator.source_reader(), options)?;

    tracing::debug!(
        generator = %generator.name,
        files = files.len(),
        "Rendered generator"
    );

    let policy = args.overwrite.unwrap_or(config.overwrite);
    let writer = OutputWriter::new(out_dir, policy);

    if args.dry_run {
        let planned = writer.plan(&files)?;
        print_dry_run(&generator.name, &files, &planned);
        return Ok(());
    }

    let summary = writer.write_all(&files)?;
    for path in &summary.written {
        output::file_created(path);
    }
    for path in &summary.skipped {
        output::file_skipped(path);
    }

    output::blank();
    output::success(format!(
        "Generated {} file(s) from generator '{}'.",
        summary.written.len(),
        generator.name
    ));
    Ok(())
}

fn print_dry_run(name: &str, files: &[RenderedFile], planned: &[PathBuf]) {
    output::header(format!("Dry run: generator '{name}'"));
    for (file, path) in files.iter().zip(planned) {
        output::item(format!(
            "{} ({} bytes, from {})",
            path.display(),
            file.content.len(),
            file.source
        ));
    }
    output::blank();
    output::dim(format!("{} file(s) would be written.", files.len()));
}
