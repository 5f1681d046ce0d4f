//! Template evaluation for every spec field and file body.
//!
//! Conditions, source paths, target paths and file bodies all go through
//! [`Evaluator::render`], so they share one expression language, one binding
//! table and one set of filters. Tera is the expansion primitive; the case
//! filters registered in [`filters`] are available everywhere.

mod filters;

use tera::Tera;

use crate::bindings::Bindings;

const INLINE_TEMPLATE: &str = "__inline__";
const TEMPLATE_MARKERS: [&str; 3] = ["{{", "{%", "{#"];

/// Error while evaluating a template expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("template syntax error: {message}")]
    TemplateSyntax { message: String },

    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String },

    #[error("render failed: {message}")]
    Render { message: String },
}

/// Renders template expressions against a binding table.
///
/// Rendering never mutates the evaluator, so one instance can be shared by
/// every render unit of a run.
#[derive(Debug, Clone)]
pub struct Evaluator {
    tera: Tera,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        let mut tera = Tera::default();
        filters::register(&mut tera);
        Self { tera }
    }

    /// Render `expression` against `bindings`.
    ///
    /// Text without template markers is returned unchanged.
    pub fn render(&self, expression: &str, bindings: &Bindings) -> Result<String, EvalError> {
        if !has_markers(expression) {
            return Ok(expression.to_string());
        }
        let inline = self.compile(expression)?;
        inline
            .render(INLINE_TEMPLATE, &bindings.to_context())
            .map_err(|e| classify_render_error(&e))
    }

    /// Parse `expression` without rendering it.
    pub fn check_syntax(&self, expression: &str) -> Result<(), EvalError> {
        if has_markers(expression) {
            self.compile(expression)?;
        }
        Ok(())
    }

    fn compile(&self, expression: &str) -> Result<Tera, EvalError> {
        // Clone so registered filters are available to the inline template.
        let mut inline = self.tera.clone();
        inline
            .add_raw_template(INLINE_TEMPLATE, expression)
            .map_err(|e| EvalError::TemplateSyntax {
                message: error_chain(&e),
            })?;
        Ok(inline)
    }
}

fn has_markers(expression: &str) -> bool {
    TEMPLATE_MARKERS.iter().any(|m| expression.contains(m))
}

fn classify_render_error(error: &tera::Error) -> EvalError {
    let message = error_chain(error);
    match undefined_variable_name(&message) {
        Some(name) => EvalError::UndefinedVariable { name },
        None => EvalError::Render { message },
    }
}

/// Join an error and all of its causes. Tera keeps the useful detail in the
/// innermost cause.
fn error_chain(error: &tera::Error) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

/// Extract `name` from Tera's "Variable `name` not found in context" message.
fn undefined_variable_name(message: &str) -> Option<String> {
    let (_, rest) = message.split_once("Variable `")?;
    let (name, tail) = rest.split_once('`')?;
    tail.trim_start()
        .starts_with("not found in context")
        .then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Item;

    fn bindings(pairs: &[(&str, &str)]) -> Bindings {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_interpolates_variables() {
        let evaluator = Evaluator::new();
        let out = evaluator
            .render("out/{{ name }}.txt", &bindings(&[("name", "x")]))
            .unwrap();
        assert_eq!(out, "out/x.txt");
    }

    #[test]
    fn test_text_without_markers_is_unchanged() {
        let evaluator = Evaluator::new();
        for text in ["", "plain/path.txt", "a } b { c", "100% {not} a template"] {
            assert_eq!(evaluator.render(text, &Bindings::default()).unwrap(), text);
        }
    }

    #[test]
    fn test_conditionals_and_loops() {
        let evaluator = Evaluator::new();
        let vars = bindings(&[("kind", "lib"), ("features", "a,b")]);
        let out = evaluator
            .render(
                "{% if kind == \"lib\" %}lib{% else %}bin{% endif %}:{% for f in features | split(pat=\",\") %}[{{ f }}]{% endfor %}",
                &vars,
            )
            .unwrap();
        assert_eq!(out, "lib:[a][b]");
    }

    #[test]
    fn test_case_filters_available_inline() {
        let evaluator = Evaluator::new();
        let out = evaluator
            .render(
                "{{ name | snake_case }}/{{ name | pascal_case }}",
                &bindings(&[("name", "billing-service")]),
            )
            .unwrap();
        assert_eq!(out, "billing_service/BillingService");
    }

    #[test]
    fn test_structured_item_fields() {
        let evaluator = Evaluator::new();
        let item = Item::Structured(serde_json::json!({"name": "api", "port": 8080}));
        let vars = bindings(&[]).with_item(item);
        let out = evaluator
            .render("{{ item.name }}:{{ item.port + 1 }}", &vars)
            .unwrap();
        assert_eq!(out, "api:8081");
    }

    #[test]
    fn test_undefined_variable() {
        let evaluator = Evaluator::new();
        let err = evaluator
            .render("{{ missing }}", &Bindings::default())
            .unwrap_err();
        assert_eq!(
            err,
            EvalError::UndefinedVariable {
                name: "missing".into()
            }
        );
    }

    #[test]
    fn test_syntax_error() {
        let evaluator = Evaluator::new();
        let err = evaluator
            .render("{{ name ", &bindings(&[("name", "x")]))
            .unwrap_err();
        assert!(matches!(err, EvalError::TemplateSyntax { .. }));
        assert!(evaluator.check_syntax("{% if %}").is_err());
        assert!(evaluator.check_syntax("{{ name }}").is_ok());
        assert!(evaluator.check_syntax("no markers").is_ok());
    }

    #[test]
    fn test_filter_failure_is_render_error() {
        let evaluator = Evaluator::new();
        let vars = bindings(&[]).with_item(Item::Number(3.into()));
        let err = evaluator
            .render("{{ item | snake_case }}", &vars)
            .unwrap_err();
        assert!(matches!(err, EvalError::Render { ref message } if message.contains("snake_case")));
    }

    #[test]
    fn test_render_is_referentially_transparent() {
        let evaluator = Evaluator::new();
        let vars = bindings(&[("a", "1"), ("b", "2")]);
        let first = evaluator.render("{{ a }}-{{ b }}", &vars).unwrap();
        let second = evaluator.render("{{ a }}-{{ b }}", &vars).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_undefined_variable_name_parsing() {
        assert_eq!(
            undefined_variable_name(
                "Failed to render '__inline__': Variable `item.name` not found in context while rendering '__inline__'"
            ),
            Some("item.name".to_string())
        );
        assert_eq!(undefined_variable_name("Filter `x` not found"), None);
    }
}
