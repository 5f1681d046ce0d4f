//! Static generator spec validation.
//!
//! Checks a [`GeneratorSpec`] for problems that would make every run fail, or
//! that are likely mistakes, without supplying values or reading sources. All
//! checks are pure functions over the generator spec.

use std::collections::HashMap;

use serde::Serialize;

use crate::bindings::ITEM_BINDING;
use crate::evaluate::Evaluator;
use crate::spec::GeneratorSpec;
use crate::variables::compile_pattern;

/// Severity level for a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single validation finding.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationFinding {
    /// Machine-readable code (e.g., `INVALID_PATTERN`).
    pub code: String,
    pub severity: Severity,
    pub message: String,
    /// Index of the template involved, if any.
    pub template_index: Option<usize>,
    /// Variable involved, if any.
    pub variable: Option<String>,
}

/// Complete validation report for a generator spec.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Whether the generator spec is valid (no errors).
    pub valid: bool,
    pub findings: Vec<ValidationFinding>,
    pub template_count: usize,
    pub variable_count: usize,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }
}

/// Validate a generator spec and return a detailed report.
pub fn validate(spec: &GeneratorSpec) -> ValidationReport {
    let mut findings = Vec::new();

    check_patterns(spec, &mut findings);
    check_reserved_names(spec, &mut findings);
    check_template_fields(spec, &mut findings);
    check_duplicate_targets(spec, &mut findings);

    let valid = !findings.iter().any(|f| f.severity == Severity::Error);

    ValidationReport {
        valid,
        findings,
        template_count: spec.templates.len(),
        variable_count: spec.variables.len(),
    }
}

fn check_patterns(spec: &GeneratorSpec, findings: &mut Vec<ValidationFinding>) {
    for (name, variable) in &spec.variables {
        if variable.pattern.is_empty() {
            continue;
        }
        let regex = match compile_pattern(&variable.pattern) {
            Ok(regex) => regex,
            Err(e) => {
                findings.push(ValidationFinding {
                    code: "INVALID_PATTERN".into(),
                    severity: Severity::Error,
                    message: format!(
                        "Variable '{name}' pattern '{}' does not compile: {e}",
                        variable.pattern
                    ),
                    template_index: None,
                    variable: Some(name.clone()),
                });
                continue;
            }
        };
        if let Some(default) = variable.effective_default() {
            if !regex.is_match(default) {
                findings.push(ValidationFinding {
                    code: "DEFAULT_PATTERN_MISMATCH".into(),
                    severity: Severity::Error,
                    message: format!(
                        "Variable '{name}' default '{default}' does not match pattern '{}'",
                        variable.pattern
                    ),
                    template_index: None,
                    variable: Some(name.clone()),
                });
            }
        }
    }
}

fn check_reserved_names(spec: &GeneratorSpec, findings: &mut Vec<ValidationFinding>) {
    if !spec.variables.contains_key(ITEM_BINDING) {
        return;
    }
    for (index, template) in spec.templates.iter().enumerate() {
        if !template.with_items.is_empty() {
            findings.push(ValidationFinding {
                code: "RESERVED_VARIABLE_NAME".into(),
                severity: Severity::Warning,
                message: format!(
                    "Variable '{ITEM_BINDING}' is shadowed by the current item in templates[{index}]"
                ),
                template_index: Some(index),
                variable: Some(ITEM_BINDING.to_string()),
            });
        }
    }
}

fn check_template_fields(spec: &GeneratorSpec, findings: &mut Vec<ValidationFinding>) {
    let evaluator = Evaluator::new();

    for (index, template) in spec.templates.iter().enumerate() {
        if template.source.trim().is_empty() {
            findings.push(ValidationFinding {
                code: "EMPTY_SOURCE".into(),
                severity: Severity::Error,
                message: format!("templates[{index}] has an empty source"),
                template_index: Some(index),
                variable: None,
            });
        }
        if template.target.trim().is_empty() {
            findings.push(ValidationFinding {
                code: "EMPTY_TARGET".into(),
                severity: Severity::Error,
                message: format!("templates[{index}] has an empty target"),
                template_index: Some(index),
                variable: None,
            });
        }

        let fields = [
            ("source", &template.source),
            ("target", &template.target),
            ("condition", &template.condition),
        ];
        for (field, expression) in fields {
            if let Err(e) = evaluator.check_syntax(expression) {
                findings.push(ValidationFinding {
                    code: "TEMPLATE_SYNTAX".into(),
                    severity: Severity::Error,
                    message: format!("templates[{index}] {field}: {e}"),
                    template_index: Some(index),
                    variable: None,
                });
            }
        }
    }
}

fn check_duplicate_targets(spec: &GeneratorSpec, findings: &mut Vec<ValidationFinding>) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, template) in spec.templates.iter().enumerate() {
        let unconditional = template.condition.trim().is_empty();
        if !template.with_items.is_empty() || !unconditional || template.target.is_empty() {
            continue;
        }
        if let Some(first) = seen.insert(template.target.as_str(), index) {
            findings.push(ValidationFinding {
                code: "DUPLICATE_TARGET".into(),
                severity: Severity::Warning,
                message: format!(
                    "templates[{first}] and templates[{index}] both write '{}'",
                    template.target
                ),
                template_index: Some(index),
                variable: None,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> GeneratorSpec {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn codes(report: &ValidationReport) -> Vec<&str> {
        report.findings.iter().map(|f| f.code.as_str()).collect()
    }

    #[test]
    fn test_valid_spec() {
        let spec = parse(
            r#"
templates:
  - source: main.tmpl
    target: "src/{{ name | snake_case }}.rs"
    condition: "{{ enabled }}"
variables:
  name: { pattern: "[a-z]+" }
  enabled: { default: "true" }
"#,
        );
        let report = validate(&spec);
        assert!(report.valid);
        assert!(report.findings.is_empty());
        assert_eq!(report.template_count, 1);
        assert_eq!(report.variable_count, 2);
    }

    #[test]
    fn test_invalid_pattern() {
        let spec = parse("variables:\n  name: { pattern: \"([a-z\" }\n");
        let report = validate(&spec);
        assert!(!report.valid);
        assert_eq!(codes(&report), vec!["INVALID_PATTERN"]);
        assert_eq!(report.findings[0].variable.as_deref(), Some("name"));
    }

    #[test]
    fn test_default_pattern_mismatch() {
        let spec = parse("variables:\n  port: { pattern: \"\\\\d+\", default: http }\n");
        let report = validate(&spec);
        assert!(!report.valid);
        assert_eq!(codes(&report), vec!["DEFAULT_PATTERN_MISMATCH"]);
    }

    #[test]
    fn test_reserved_item_variable_is_warning() {
        let spec = parse(
            r#"
templates:
  - { source: a, target: "{{ item }}", with_items: [x] }
  - { source: b, target: b }
variables:
  item: { default: z }
"#,
        );
        let report = validate(&spec);
        assert!(report.valid);
        assert_eq!(codes(&report), vec!["RESERVED_VARIABLE_NAME"]);
        assert_eq!(report.findings[0].template_index, Some(0));
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_empty_fields_and_syntax() {
        let spec = parse(
            r#"
templates:
  - { source: "", target: "" }
  - { source: "{% if %}", target: "ok", condition: "{{ x" }
"#,
        );
        let report = validate(&spec);
        assert!(!report.valid);
        assert_eq!(
            codes(&report),
            vec!["EMPTY_SOURCE", "EMPTY_TARGET", "TEMPLATE_SYNTAX", "TEMPLATE_SYNTAX"]
        );
        assert_eq!(report.errors().count(), 4);
    }

    #[test]
    fn test_duplicate_literal_targets() {
        let spec = parse(
            r#"
templates:
  - { source: a, target: out.txt }
  - { source: b, target: out.txt }
  - { source: c, target: out.txt, condition: "{{ flag }}" }
  - { source: d, target: out.txt, with_items: [1] }
"#,
        );
        let report = validate(&spec);
        assert!(report.valid);
        assert_eq!(codes(&report), vec!["DUPLICATE_TARGET"]);
        assert_eq!(report.findings[0].template_index, Some(1));
    }

    #[test]
    fn test_report_serializes() {
        let spec = parse("templates:\n  - { source: \"\", target: t }\n");
        let json = serde_json::to_value(validate(&spec)).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["findings"][0]["severity"], "error");
    }
}
