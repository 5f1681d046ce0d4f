use gensmith_engine::{GenerateError, LoadError, RenderSpecError, WriteError};

/// Errors surfaced by CLI commands.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CtlError {
    #[error("failed to load generator: {0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    RenderSpec(#[from] RenderSpecError),

    #[error("generation failed [{kind}]: {0}", kind = .0.kind())]
    Generate(#[from] GenerateError),

    #[error("{0}")]
    Write(#[from] WriteError),

    #[error("generator '{0}' not found")]
    GeneratorNotFound(String),

    #[error("generator spec has {0} error(s)")]
    Invalid(usize),
}

impl CtlError {
    /// Follow-up suggestion printed under the error, if any.
    pub(crate) fn hint(&self) -> Option<String> {
        match self {
            Self::GeneratorNotFound(_) => Some(
                "Pass a directory path, or add its parent to generator-paths in .gensmith.toml."
                    .to_string(),
            ),
            Self::Generate(e) if e.kind() == gensmith_engine::ErrorKind::MissingRequiredVariable => {
                Some("Use 'gensmith info <GENERATOR>' to see required variables.".to_string())
            }
            _ => None,
        }
    }
}

pub(crate) type CtlResult<T> = Result<T, CtlError>;
