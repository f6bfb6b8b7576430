//! Coercion primitives for free-text form input
//!
//! None of these helpers fail. Anything they cannot interpret becomes the
//! empty string, `false`, or `None`.

use crate::types::ComplianceState;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();

const TRUTHY: &[&str] = &["true", "yes", "y", "1", "complied", "checked"];
const FALSY: &[&str] = &["false", "no", "n", "0", "not complied", "notcomplied", "unchecked"];

const COMPLIED: &[&str] = &["complied", "compliant", "yes", "y", "true", "1", "checked"];
const NOT_COMPLIED: &[&str] = &[
    "not complied",
    "notcomplied",
    "non compliant",
    "noncompliant",
    "not compliant",
    "no",
    "n",
    "false",
    "0",
];

fn number_regex() -> &'static Regex {
    NUMBER_REGEX.get_or_init(|| {
        Regex::new(r"[-+]?(?:\d[\d,]*(?:\.\d+)?|\.\d+)").expect("number pattern is valid")
    })
}

/// Trimmed string form of any value; `""` for null
pub fn sanitize_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        other => other.to_string(),
    }
}

/// Integral floats print without a fraction, so `1.0` reads as `"1"`
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => {
            (f as i128).to_string()
        }
        _ => n.to_string(),
    }
}

/// Same as [`sanitize_string`] for a possibly missing value
pub fn sanitize_opt(value: Option<&Value>) -> String {
    value.map(sanitize_string).unwrap_or_default()
}

/// Extract the first signed decimal number from a string-like value
///
/// Thousands separators inside the matched digits are ignored, so
/// `"PHP 1,250.50"` yields `1250.5`.
pub fn parse_first_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => {
            let matched = number_regex().find(s)?;
            let digits: String = matched.as_str().chars().filter(|c| *c != ',').collect();
            digits.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

/// Lower-cased, trimmed text of a string value
fn normalized_text(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.trim().to_lowercase())
}

/// Treat booleans as-is and match strings against the truthy vocabulary
pub fn coerce_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(_) => normalized_text(value)
            .map(|s| TRUTHY.contains(&s.as_str()))
            .unwrap_or(false),
        Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

/// Like [`coerce_boolean`] on a possibly missing value
pub fn coerce_boolean_opt(value: Option<&Value>) -> bool {
    value.map(coerce_boolean).unwrap_or(false)
}

/// Distinguish "explicitly false" from "unset"
pub fn coerce_boolean_or_undefined(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(_) => {
            let text = normalized_text(value)?;
            if TRUTHY.contains(&text.as_str()) {
                Some(true)
            } else if FALSY.contains(&text.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => Some(true),
            Some(f) if f == 0.0 => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Map booleans and compliance-style wording onto a [`ComplianceState`]
pub fn interpret_compliance_state(value: &Value) -> Option<ComplianceState> {
    match value {
        Value::Bool(true) => Some(ComplianceState::Complied),
        Value::Bool(false) => Some(ComplianceState::NotComplied),
        Value::String(s) => {
            let collapsed = s
                .to_lowercase()
                .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            if COMPLIED.contains(&collapsed.as_str()) {
                Some(ComplianceState::Complied)
            } else if NOT_COMPLIED.contains(&collapsed.as_str()) {
                Some(ComplianceState::NotComplied)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Decide whether a value counts as present
pub fn has_meaningful_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Number(n) => n.as_f64().map(|f| !f.is_nan()).unwrap_or(true),
        Value::Bool(_) => true,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// JavaScript-style falsiness, used for the top-level report guard
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0 || f.is_nan()).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
