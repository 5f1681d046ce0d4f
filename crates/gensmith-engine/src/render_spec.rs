//! RenderSpec documents and `key=value` value arguments.
//!
//! A RenderSpec names a generator and supplies the values for one run:
//!
//! ```yaml
//! generator: service
//! output: ./out
//! values:
//!   name: billing
//!   port: 8080
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::spec::scalar_to_string;
use crate::variables::SuppliedValues;

/// Error while loading a RenderSpec or parsing value arguments.
#[derive(Debug, thiserror::Error)]
pub enum RenderSpecError {
    #[error("failed to read render spec '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse render spec '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to parse render spec: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("value for '{0}' must be a string, number or boolean")]
    NonScalarValue(String),

    #[error("invalid value argument '{0}': expected key=value")]
    InvalidVarArg(String),
}

/// Which generator to run and with which values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RenderSpec {
    /// Generator name (resolved through search paths) or directory path.
    pub generator: String,

    /// Output directory. Relative paths are relative to the RenderSpec file.
    #[serde(default)]
    pub output: Option<String>,

    #[serde(default)]
    pub values: IndexMap<String, serde_yaml::Value>,
}

impl RenderSpec {
    /// The values as strings, ready for variable resolution.
    pub fn supplied_values(&self) -> Result<SuppliedValues, RenderSpecError> {
        stringify_values(&self.values)
    }
}

fn stringify_values(
    values: &IndexMap<String, serde_yaml::Value>,
) -> Result<SuppliedValues, RenderSpecError> {
    values
        .iter()
        .map(|(name, value)| {
            scalar_to_string(value)
                .map(|v| (name.clone(), v))
                .ok_or_else(|| RenderSpecError::NonScalarValue(name.clone()))
        })
        .collect()
}

pub fn parse_render_spec(yaml: &str) -> Result<RenderSpec, RenderSpecError> {
    Ok(serde_yaml::from_str(yaml)?)
}

pub fn load_render_spec(path: &Path) -> Result<RenderSpec, RenderSpecError> {
    let yaml = std::fs::read_to_string(path).map_err(|e| RenderSpecError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_yaml::from_str(&yaml).map_err(|e| RenderSpecError::Yaml {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a plain YAML mapping of variable values.
pub fn load_values(path: &Path) -> Result<SuppliedValues, RenderSpecError> {
    let yaml = std::fs::read_to_string(path).map_err(|e| RenderSpecError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let values: Option<IndexMap<String, serde_yaml::Value>> = serde_yaml::from_str(&yaml)
        .map_err(|e| RenderSpecError::Yaml {
            path: path.to_path_buf(),
            source: e,
        })?;
    stringify_values(&values.unwrap_or_default())
}

/// Parse `key=value` arguments. The value may itself contain `=`.
pub fn parse_var_args<S: AsRef<str>>(args: &[S]) -> Result<SuppliedValues, RenderSpecError> {
    let mut values = SuppliedValues::new();
    for arg in args {
        let arg = arg.as_ref();
        let (key, value) = arg
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
            .ok_or_else(|| RenderSpecError::InvalidVarArg(arg.to_string()))?;
        values.insert(key.trim().to_string(), value.to_string());
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render_spec() {
        let spec = parse_render_spec(
            r#"
generator: service
output: ./out
values:
  name: billing
  port: 8080
  debug: false
"#,
        )
        .unwrap();
        assert_eq!(spec.generator, "service");
        assert_eq!(spec.output.as_deref(), Some("./out"));

        let values = spec.supplied_values().unwrap();
        assert_eq!(values["name"], "billing");
        assert_eq!(values["port"], "8080");
        assert_eq!(values["debug"], "false");
    }

    #[test]
    fn test_values_are_optional() {
        let spec = parse_render_spec("generator: ./gen\n").unwrap();
        assert!(spec.output.is_none());
        assert!(spec.supplied_values().unwrap().is_empty());
    }

    #[test]
    fn test_non_scalar_value_rejected() {
        let spec = parse_render_spec("generator: g\nvalues:\n  list: [1, 2]\n").unwrap();
        assert!(matches!(
            spec.supplied_values(),
            Err(RenderSpecError::NonScalarValue(ref n)) if n == "list"
        ));
    }

    #[test]
    fn test_missing_generator_is_parse_error() {
        assert!(matches!(
            parse_render_spec("values: {}\n"),
            Err(RenderSpecError::Parse(_))
        ));
    }

    #[test]
    fn test_load_render_spec_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.yaml");
        std::fs::write(&path, "generator: g\nvalues:\n  a: b\n").unwrap();
        assert_eq!(load_render_spec(&path).unwrap().generator, "g");
        assert!(matches!(
            load_render_spec(&dir.path().join("missing.yaml")),
            Err(RenderSpecError::Io { .. })
        ));
    }

    #[test]
    fn test_load_values_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.yaml");
        std::fs::write(&path, "name: billing\nreplicas: 3\n").unwrap();
        let values = load_values(&path).unwrap();
        assert_eq!(values["name"], "billing");
        assert_eq!(values["replicas"], "3");

        std::fs::write(&path, "").unwrap();
        assert!(load_values(&path).unwrap().is_empty());

        std::fs::write(&path, "nested: { a: 1 }\n").unwrap();
        assert!(matches!(
            load_values(&path),
            Err(RenderSpecError::NonScalarValue(_))
        ));
    }

    #[test]
    fn test_parse_var_args() {
        let values = parse_var_args(&["name=x", "expr=a=b", "empty="]).unwrap();
        assert_eq!(values["name"], "x");
        assert_eq!(values["expr"], "a=b");
        assert_eq!(values["empty"], "");
    }

    #[test]
    fn test_parse_var_args_rejects_malformed() {
        assert!(matches!(
            parse_var_args(&["novalue"]),
            Err(RenderSpecError::InvalidVarArg(_))
        ));
        assert!(matches!(
            parse_var_args(&["=x"]),
            Err(RenderSpecError::InvalidVarArg(_))
        ));
    }
}
