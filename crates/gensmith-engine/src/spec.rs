//! Generator spec data model, parsed from `generator-<name>.yaml`.
//!
//! Every string field of a [`TemplateSpec`] is itself a template expression.
//! Variables are keyed by their YAML mapping key; the declaration body carries
//! no name of its own.

use std::fmt;

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Which templates belong to a generator and which variables it needs.
///
/// The values of the variables come from a [`RenderSpec`](crate::RenderSpec)
/// or the command line, never from the generator spec itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSpec {
    /// Templates to render, in declaration order.
    #[serde(default)]
    pub templates: Vec<TemplateSpec>,

    /// Declared variables, keyed by name, in declaration order.
    #[serde(default, deserialize_with = "deserialize_variables")]
    pub variables: IndexMap<String, VariableSpec>,
}

/// A template to render once, or once per entry of `with_items`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateSpec {
    /// Path of the template file, relative to the generator root.
    pub source: String,

    /// Path of the generated file, relative to the output root.
    pub target: String,

    /// Rendered and gated; an empty condition always renders.
    #[serde(default)]
    pub condition: String,

    /// Items to iterate over, each bound to `item`.
    #[serde(default)]
    pub with_items: Vec<Item>,
}

/// A variable the generator makes available to its templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSpec {
    /// Human readable description. Has no effect on rendering.
    #[serde(default)]
    pub description: String,

    /// Regular expression the whole value must match.
    #[serde(default)]
    pub pattern: String,

    /// Default value. Absent or empty marks the variable as required.
    #[serde(default, deserialize_with = "deserialize_optional_scalar")]
    pub default: Option<String>,
}

impl VariableSpec {
    /// The default that applies when no value is supplied, if any.
    pub fn effective_default(&self) -> Option<&str> {
        self.default.as_deref().filter(|d| !d.is_empty())
    }

    /// Whether a value must be supplied for this variable.
    pub fn is_required(&self) -> bool {
        self.effective_default().is_none()
    }
}

/// One entry of `with_items`, kept in its native shape.
///
/// Structured items stay structured in the template context, so
/// `{{ item.name }}` works for mappings. Mapping keys that are not strings
/// (`{1: one}`) are stringified.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Item {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    Structured(serde_json::Value),
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Structured(v) => write!(f, "{v}"),
        }
    }
}

impl<'de> Deserialize<'de> for Item {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let item = match serde_yaml::Value::deserialize(deserializer)? {
            serde_yaml::Value::String(s) => Self::Text(s),
            serde_yaml::Value::Bool(b) => Self::Flag(b),
            serde_yaml::Value::Number(n) => match yaml_number_to_json(&n) {
                Some(n) => Self::Number(n),
                None => Self::Text(n.to_string()),
            },
            other => Self::Structured(yaml_to_json(other)),
        };
        Ok(item)
    }
}

fn yaml_number_to_json(n: &serde_yaml::Number) -> Option<serde_json::Number> {
    if let Some(i) = n.as_i64() {
        Some(i.into())
    } else if let Some(u) = n.as_u64() {
        Some(u.into())
    } else {
        n.as_f64().and_then(serde_json::Number::from_f64)
    }
}

/// Convert a YAML value into the JSON shape the template context uses.
fn yaml_to_json(value: serde_yaml::Value) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        serde_yaml::Value::Null => Json::Null,
        serde_yaml::Value::Bool(b) => Json::Bool(b),
        serde_yaml::Value::Number(n) => match yaml_number_to_json(&n) {
            Some(n) => Json::Number(n),
            None => Json::String(n.to_string()),
        },
        serde_yaml::Value::String(s) => Json::String(s),
        serde_yaml::Value::Sequence(seq) => {
            Json::Array(seq.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => Json::Object(
            mapping
                .into_iter()
                .map(|(key, value)| (mapping_key(key), yaml_to_json(value)))
                .collect(),
        ),
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn mapping_key(key: serde_yaml::Value) -> String {
    match scalar_to_string(&key) {
        Some(key) => key,
        None => yaml_to_json(key).to_string(),
    }
}

impl From<&str> for Item {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Item {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Stringify a YAML scalar. Returns `None` for null, sequences and mappings.
pub(crate) fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
    }
}

fn deserialize_optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(value) => scalar_to_string(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom("default must be a string, number or boolean")),
    }
}

/// Accepts either a mapping `{name: spec}` or a list of single-key mappings
/// `[{name: spec}]`. Both yield the same ordered table.
fn deserialize_variables<'de, D>(
    deserializer: D,
) -> Result<IndexMap<String, VariableSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Declarations {
        Mapping(IndexMap<String, Option<VariableSpec>>),
        List(Vec<IndexMap<String, Option<VariableSpec>>>),
    }

    let declarations = match Option::<Declarations>::deserialize(deserializer)? {
        None => return Ok(IndexMap::new()),
        Some(declarations) => declarations,
    };

    match declarations {
        Declarations::Mapping(variables) => Ok(variables
            .into_iter()
            .map(|(name, variable)| (name, variable.unwrap_or_default()))
            .collect()),
        Declarations::List(entries) => {
            let mut variables = IndexMap::with_capacity(entries.len());
            for entry in entries {
                if entry.len() != 1 {
                    return Err(D::Error::custom(format!(
                        "each variables list entry must declare exactly one variable, found {}",
                        entry.len()
                    )));
                }
                for (name, variable) in entry {
                    if variables.contains_key(&name) {
                        return Err(D::Error::custom(format!(
                            "variable '{name}' is declared more than once"
                        )));
                    }
                    variables.insert(name, variable.unwrap_or_default());
                }
            }
            Ok(variables)
        }
    }
}
