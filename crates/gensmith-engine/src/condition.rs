//! Condition gating for templates.
//!
//! A condition is rendered like any other field, then the rendered text is
//! interpreted as a boolean. An empty condition always renders.

use crate::bindings::Bindings;
use crate::evaluate::{EvalError, Evaluator};

const TRUTHY: [&str; 4] = ["true", "yes", "on", "1"];

/// Interpret rendered condition text.
///
/// Empty or whitespace-only text is true. Otherwise the trimmed text must be
/// one of `true`, `yes`, `on` or `1`, compared case-insensitively; anything
/// else is false.
pub fn is_truthy(rendered: &str) -> bool {
    let text = rendered.trim();
    text.is_empty() || TRUTHY.iter().any(|t| text.eq_ignore_ascii_case(t))
}

/// Render `expression` and decide whether its template should be produced.
pub fn evaluate(
    evaluator: &Evaluator,
    expression: &str,
    bindings: &Bindings,
) -> Result<bool, EvalError> {
    if expression.trim().is_empty() {
        return Ok(true);
    }
    let rendered = evaluator.render(expression, bindings)?;
    Ok(is_truthy(&rendered))
}
