//! Shallow lexical sanity checks run before compilation.
//!
//! A failing result blocks compilation. A passing result does not guarantee
//! that the expression parses.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const EMPTY_EXPRESSION: &str = "Expression cannot be empty";
pub const UNBALANCED_PARENTHESES: &str = "Unbalanced parentheses";
pub const UNDEFINED_VALUES: &str = "Expression contains undefined values";
pub const MIXED_EQUALITY: &str = "Mixed use of == and === operators";
pub const DIVISION_BY_ZERO: &str = "Potential division by zero";

static UNDEFINED_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bundefined\b").expect("valid regex"));

// Leftmost-first alternation picks the strict forms before the loose ones.
static EQUALITY_OPERATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"===|!==|==|!=").expect("valid regex"));

// Any spelling of a literal zero (`0`, `00`, `0.0`, `0.`) that is not the
// start of a larger number.
static LITERAL_ZERO_DIVISOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\s*0+(?:\.0*)?(?:[^.\d]|$)").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Runs every check and accumulates findings, except that a blank
/// expression returns immediately.
pub fn validate(expression: &str) -> ValidationResult {
    if expression.trim().is_empty() {
        return ValidationResult::from_findings(vec![EMPTY_EXPRESSION.to_string()], Vec::new());
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let opening = expression.matches('(').count();
    let closing = expression.matches(')').count();
    if opening != closing {
        errors.push(UNBALANCED_PARENTHESES.to_string());
    }

    if UNDEFINED_TOKEN.is_match(expression) {
        errors.push(UNDEFINED_VALUES.to_string());
    }

    let (strict, loose): (Vec<_>, Vec<_>) = EQUALITY_OPERATOR
        .find_iter(expression)
        .map(|m| m.as_str())
        .partition(|op| op.len() == 3);
    if !strict.is_empty() && !loose.is_empty() {
        warnings.push(MIXED_EQUALITY.to_string());
    }

    if LITERAL_ZERO_DIVISOR.is_match(expression) {
        warnings.push(DIVISION_BY_ZERO.to_string());
    }

    tracing::trace!(
        errors = errors.len(),
        warnings = warnings.len(),
        "validated expression"
    );
    ValidationResult::from_findings(errors, warnings)
}
