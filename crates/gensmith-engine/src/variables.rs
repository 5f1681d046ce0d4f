//! Variable resolution: merges declared defaults with supplied values and
//! validates the result.
//!
//! Only declared variables enter the binding table. Supplied values for
//! undeclared names are ignored.

use std::collections::HashMap;

use indexmap::IndexMap;
use regex::Regex;

use crate::bindings::Bindings;
use crate::spec::GeneratorSpec;

/// Externally supplied variable values, keyed by name.
pub type SuppliedValues = HashMap<String, String>;

/// Error during variable resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("missing required variable '{0}'")]
    MissingRequiredVariable(String),

    #[error("variable '{name}' value '{value}' does not match pattern '{pattern}'")]
    ValidationFailed {
        name: String,
        value: String,
        pattern: String,
    },

    #[error("variable '{name}' has an invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        name: String,
        pattern: String,
        source: regex::Error,
    },
}

/// Resolve every declared variable of `spec` into a binding table.
///
/// A supplied value wins over the default. A variable with neither fails with
/// [`ResolveError::MissingRequiredVariable`]. Once all values are known, each
/// one is matched against its pattern as a whole string.
pub fn resolve_variables(
    spec: &GeneratorSpec,
    supplied: &SuppliedValues,
) -> Result<Bindings, ResolveError> {
    for name in supplied.keys() {
        if !spec.variables.contains_key(name) {
            tracing::debug!(variable = %name, "Ignoring value for undeclared variable");
        }
    }

    let mut resolved = IndexMap::with_capacity(spec.variables.len());
    for (name, decl) in &spec.variables {
        let value = match supplied.get(name) {
            Some(value) => value.clone(),
            None => decl
                .effective_default()
                .map(str::to_string)
                .ok_or_else(|| ResolveError::MissingRequiredVariable(name.clone()))?,
        };
        resolved.insert(name.clone(), value);
    }

    for (name, value) in &resolved {
        let pattern = &spec.variables[name].pattern;
        check_pattern(name, value, pattern)?;
    }

    Ok(Bindings::new(resolved))
}

/// Compile a validation pattern with full-string match semantics.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

fn check_pattern(name: &str, value: &str, pattern: &str) -> Result<(), ResolveError> {
    if pattern.is_empty() {
        return Ok(());
    }
    let regex = compile_pattern(pattern).map_err(|source| ResolveError::InvalidPattern {
        name: name.to_string(),
        pattern: pattern.to_string(),
        source,
    })?;
    if regex.is_match(value) {
        Ok(())
    } else {
        Err(ResolveError::ValidationFailed {
            name: name.to_string(),
            value: value.to_string(),
            pattern: pattern.to_string(),
        })
    }
}
