//! Generation orchestrator.
//!
//! Drives the pipeline for one run: for every template in declaration order,
//! expand its render units, gate each one on its condition, render the target
//! and source paths, read the source, render the body and emit a
//! [`RenderedFile`]. Any failure aborts the run and no files are returned.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::bindings::Bindings;
use crate::condition;
use crate::evaluate::{EvalError, Evaluator};
use crate::iteration::{self, RenderUnit, UnitLocation};
use crate::source::{SourceError, SourceReader};
use crate::spec::GeneratorSpec;
use crate::variables::{resolve_variables, ResolveError, SuppliedValues};

const SNIPPET_LEN: usize = 60;

/// A rendered file ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Rendered target path, relative to the output root.
    pub path: PathBuf,
    pub content: String,
    /// Rendered source path the body came from.
    pub source: String,
    pub location: UnitLocation,
}

/// Template field being evaluated when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Condition,
    Source,
    Target,
    Body,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Condition => "condition",
            Self::Source => "source",
            Self::Target => "target",
            Self::Body => "body",
        };
        f.write_str(name)
    }
}

/// Closed set of failure categories a run can end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingRequiredVariable,
    ValidationFailed,
    UndefinedVariable,
    TemplateSyntaxError,
    ConditionEvaluationError,
    SourceFileUnavailable,
    RenderFailed,
    Timeout,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Error that aborted a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Variables(#[from] ResolveError),

    #[error("{location}: condition '{}' could not be evaluated: {source}", snippet(.expression))]
    Condition {
        location: UnitLocation,
        expression: String,
        source: EvalError,
    },

    #[error("{location}: {field} '{}' failed: {source}", snippet(.expression))]
    Render {
        location: UnitLocation,
        field: Field,
        expression: String,
        source: EvalError,
    },

    #[error("{location}: body of '{path}' failed: {source}")]
    Body {
        location: UnitLocation,
        path: String,
        source: EvalError,
    },

    #[error("{location}: {source}")]
    SourceFileUnavailable {
        location: UnitLocation,
        path: String,
        source: SourceError,
    },

    #[error("{location}: generation exceeded the {}ms timeout", .timeout.as_millis())]
    TimedOut {
        location: UnitLocation,
        timeout: Duration,
    },
}

impl GenerateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Variables(ResolveError::MissingRequiredVariable(_)) => {
                ErrorKind::MissingRequiredVariable
            }
            Self::Variables(
                ResolveError::ValidationFailed { .. } | ResolveError::InvalidPattern { .. },
            ) => ErrorKind::ValidationFailed,
            Self::Condition { .. } => ErrorKind::ConditionEvaluationError,
            Self::Render { source, .. } | Self::Body { source, .. } => eval_kind(source),
            Self::SourceFileUnavailable { .. } => ErrorKind::SourceFileUnavailable,
            Self::TimedOut { .. } => ErrorKind::Timeout,
        }
    }

    /// Location of the failing render unit. `None` for variable errors.
    pub fn location(&self) -> Option<UnitLocation> {
        match self {
            Self::Variables(_) => None,
            Self::Condition { location, .. }
            | Self::Render { location, .. }
            | Self::Body { location, .. }
            | Self::SourceFileUnavailable { location, .. }
            | Self::TimedOut { location, .. } => Some(*location),
        }
    }
}

fn eval_kind(error: &EvalError) -> ErrorKind {
    match error {
        EvalError::TemplateSyntax { .. } => ErrorKind::TemplateSyntaxError,
        EvalError::UndefinedVariable { .. } => ErrorKind::UndefinedVariable,
        EvalError::Render { .. } => ErrorKind::RenderFailed,
    }
}

fn snippet(expression: &str) -> String {
    let flat = expression.replace('\n', " ");
    if flat.chars().count() <= SNIPPET_LEN {
        return flat;
    }
    let head: String = flat.chars().take(SNIPPET_LEN).collect();
    format!("{head}...")
}

/// Options for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Upper bound for the whole run, checked before each source read.
    pub timeout: Option<Duration>,
}

/// Renders the templates of one spec.
#[derive(Debug, Clone)]
pub struct Generator<'a> {
    spec: &'a GeneratorSpec,
    evaluator: Evaluator,
}

impl<'a> Generator<'a> {
    pub fn new(spec: &'a GeneratorSpec) -> Self {
        Self {
            spec,
            evaluator: Evaluator::new(),
        }
    }

    pub fn spec(&self) -> &'a GeneratorSpec {
        self.spec
    }

    /// Resolve supplied values against the declared variables.
    pub fn resolve(&self, supplied: &SuppliedValues) -> Result<Bindings, ResolveError> {
        resolve_variables(self.spec, supplied)
    }

    /// Render every template against `bindings`.
    pub fn generate(
        &self,
        bindings: &Bindings,
        reader: &dyn SourceReader,
    ) -> Result<Vec<RenderedFile>, GenerateError> {
        self.generate_with_options(bindings, reader, GenerateOptions::default())
    }

    pub fn generate_with_options(
        &self,
        bindings: &Bindings,
        reader: &dyn SourceReader,
        options: GenerateOptions,
    ) -> Result<Vec<RenderedFile>, GenerateError> {
        let deadline = options
            .timeout
            .and_then(|timeout| Instant::now().checked_add(timeout).map(|at| (at, timeout)));
        let mut files = Vec::new();

        for (index, template) in self.spec.templates.iter().enumerate() {
            for unit in iteration::expand(index, template, bindings) {
                if let Some(file) = self.render_unit(&unit, reader, deadline)? {
                    files.push(file);
                }
            }
        }

        tracing::debug!(
            templates = self.spec.templates.len(),
            files = files.len(),
            "Generation complete"
        );
        Ok(files)
    }

    fn render_unit(
        &self,
        unit: &RenderUnit<'_>,
        reader: &dyn SourceReader,
        deadline: Option<(Instant, Duration)>,
    ) -> Result<Option<RenderedFile>, GenerateError> {
        let template = unit.template;
        let location = unit.location;

        let included = condition::evaluate(&self.evaluator, &template.condition, &unit.bindings)
            .map_err(|source| GenerateError::Condition {
                location,
                expression: template.condition.clone(),
                source,
            })?;
        if !included {
            tracing::debug!(%location, "Skipping render unit, condition is false");
            return Ok(None);
        }

        let target = self.render_field(unit, Field::Target, &template.target)?;
        let source_path = self.render_field(unit, Field::Source, &template.source)?;

        if let Some((at, timeout)) = deadline {
            if Instant::now() >= at {
                return Err(GenerateError::TimedOut { location, timeout });
            }
        }

        let body = reader.read_source(&source_path).map_err(|source| {
            GenerateError::SourceFileUnavailable {
                location,
                path: source_path.clone(),
                source,
            }
        })?;
        let content = self
            .evaluator
            .render(&body, &unit.bindings)
            .map_err(|source| GenerateError::Body {
                location,
                path: source_path.clone(),
                source,
            })?;

        tracing::debug!(%location, source = %source_path, target = %target, "Rendered file");
        Ok(Some(RenderedFile {
            path: PathBuf::from(target),
            content,
            source: source_path,
            location,
        }))
    }

    fn render_field(
        &self,
        unit: &RenderUnit<'_>,
        field: Field,
        expression: &str,
    ) -> Result<String, GenerateError> {
        self.evaluator
            .render(expression, &unit.bindings)
            .map_err(|source| GenerateError::Render {
                location: unit.location,
                field,
                expression: expression.to_string(),
                source,
            })
    }
}

/// Resolve `supplied` against `spec` and render every template in one call.
pub fn run(
    spec: &GeneratorSpec,
    supplied: &SuppliedValues,
    reader: &dyn SourceReader,
) -> Result<Vec<RenderedFile>, GenerateError> {
    let generator = Generator::new(spec);
    let bindings = generator.resolve(supplied)?;
    generator.generate(&bindings, reader)
}
