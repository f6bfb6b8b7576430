//! Validator trait, traversal context and shared rule helpers

use crate::validation::error::{ValidationError, ValidationErrors, ValidationResult, Violation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// How much checking to do beyond the JSON Schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Schema plus business rules
    Strict,
    /// Schema only
    Basic,
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "basic" => Ok(Self::Basic),
            other => Err(format!("unknown validation mode '{}'", other)),
        }
    }
}

/// Where we are in the document while walking it
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// JSON pointer of the current value
    pub path: String,
    pub mode: ValidationMode,
}

impl ValidationContext {
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            path: String::new(),
            mode,
        }
    }

    /// Descend into an object member
    pub fn child(&self, key: impl AsRef<str>) -> Self {
        let escaped = key.as_ref().replace('~', "~0").replace('/', "~1");
        Self {
            path: format!("{}/{}", self.path, escaped),
            mode: self.mode,
        }
    }

    /// Descend into an array element
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}/{}", self.path, index),
            mode: self.mode,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.mode == ValidationMode::Strict
    }
}

/// Common shape of document validators
pub trait SchemaValidator {
    type Input: ?Sized;

    /// Every problem found under `context`, in document order
    fn collect_with_context(&self, input: &Self::Input, context: &ValidationContext)
        -> ValidationErrors;

    /// Strict validation, stopping at the first problem
    fn validate(&self, input: &Self::Input) -> ValidationResult<()> {
        self.validate_with_context(input, &ValidationContext::new(ValidationMode::Strict))
    }

    /// Schema-only validation
    fn validate_basic(&self, input: &Self::Input) -> ValidationResult<()> {
        self.validate_with_context(input, &ValidationContext::new(ValidationMode::Basic))
    }

    fn validate_with_context(
        &self,
        input: &Self::Input,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        match self.collect_with_context(input, context).errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Every problem found in the given mode
    fn collect_errors(&self, input: &Self::Input, mode: ValidationMode) -> ValidationErrors {
        self.collect_with_context(input, &ValidationContext::new(mode))
    }
}

/// Small rule checks shared by the report rules
pub struct ValidationHelpers;

impl ValidationHelpers {
    /// Integer value must lie in `min..=max`
    pub fn validate_range(
        value: i64,
        min: i64,
        max: i64,
        rule: &str,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        if (min..=max).contains(&value) {
            return Ok(());
        }
        Err(ValidationError::rule(
            &context.path,
            format!("{} is outside {}..={}", value, min, max),
            Violation::new(
                rule,
                format!("a value between {} and {}", min, max),
                value.to_string(),
            ),
        ))
    }

    /// Array must have at least one element
    pub fn validate_non_empty_array(
        items: &[Value],
        rule: &str,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        if !items.is_empty() {
            return Ok(());
        }
        Err(ValidationError::rule(
            &context.path,
            "table must not be empty",
            Violation::new(rule, "at least one row", "empty array"),
        ))
    }

    /// Object must carry at least one non-empty string or any number
    pub fn validate_has_content(
        entry: &Value,
        rule: &str,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        let has_content = entry.as_object().is_some_and(|fields| {
            fields.values().any(|v| match v {
                Value::String(s) => !s.trim().is_empty(),
                Value::Number(_) => true,
                _ => false,
            })
        });
        if has_content {
            return Ok(());
        }
        Err(ValidationError::rule(
            &context.path,
            "entry has no populated field",
            Violation::new(rule, "at least one non-empty field", entry.to_string()),
        ))
    }

    /// String must be one of the accepted spellings (case-insensitive)
    pub fn validate_enum_value(
        value: &str,
        allowed: &[&str],
        rule: &str,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        let normalized = value.trim().to_lowercase();
        if allowed.iter().any(|a| *a == normalized) {
            return Ok(());
        }
        Err(ValidationError::rule(
            &context.path,
            format!("unrecognised value '{}'", value),
            Violation::new(rule, format!("one of: {}", allowed.join(", ")), value),
        ))
    }
}
