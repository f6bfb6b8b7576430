//! Structural comparison of expected and produced DTOs

use crate::{GoldenError, Result};
use colored::*;
use regex::Regex;
use serde_json::Value;
use similar::{ChangeTag, TextDiff};
use std::collections::BTreeSet;

/// Mask written over volatile strings before comparing
pub const MASK: &str = "***MASKED***";

#[derive(Debug, Clone)]
pub struct DiffOptions {
    pub colored: bool,

    /// Unchanged lines kept around each change when `full_diff` is off
    pub context_lines: usize,

    /// Sort keys, trim strings and round floats before comparing
    pub normalize: bool,

    pub float_tolerance: f64,

    pub full_diff: bool,

    /// 0 = unlimited
    pub max_diff_lines: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            colored: true,
            context_lines: 3,
            normalize: true,
            float_tolerance: 1e-6,
            full_diff: false,
            max_diff_lines: 200,
        }
    }
}

#[derive(Debug)]
pub struct DiffResult {
    pub matches: bool,
    pub diff_output: String,
    pub summary: DiffSummary,
}

#[derive(Debug, Default)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    /// Dot paths that differ, e.g. `ecc[0].eccNumber`
    pub differing_paths: Vec<String>,
}

impl DiffSummary {
    /// One-line description for failure messages
    pub fn describe(&self) -> String {
        let shown: Vec<_> = self.differing_paths.iter().take(5).cloned().collect();
        let more = self.differing_paths.len().saturating_sub(shown.len());
        let mut text = format!("+{} -{} lines; differs at {}", self.added, self.removed, shown.join(", "));
        if more > 0 {
            text.push_str(&format!(" (and {} more)", more));
        }
        text
    }
}

/// Compares JSON values with float tolerance and volatile-field masking
pub struct DiffEngine {
    options: DiffOptions,
    volatile_patterns: Vec<(Vec<String>, Regex)>,
}

impl DiffEngine {
    pub fn new(options: DiffOptions) -> Self {
        Self {
            options,
            volatile_patterns: Vec::new(),
        }
    }

    /// Mask the string at `path` whenever it matches `pattern`
    pub fn add_volatile_pattern(&mut self, path: &str, pattern: &str) -> Result<()> {
        let regex = Regex::new(pattern)
            .map_err(|e| GoldenError::CorpusError(format!("Invalid regex pattern '{}': {}", pattern, e)))?;
        let parts = path.split('.').filter(|s| !s.is_empty()).map(String::from).collect();
        self.volatile_patterns.push((parts, regex));
        Ok(())
    }

    pub fn compare(&self, expected: &Value, actual: &Value) -> DiffResult {
        let prepare = |value: &Value| {
            let mut value = if self.options.normalize {
                crate::snapshot::normalize_json(value)
            } else {
                value.clone()
            };
            self.mask_volatile_fields(&mut value);
            value
        };
        let expected = prepare(expected);
        let actual = prepare(actual);

        if self.values_match(&expected, &actual) {
            return DiffResult {
                matches: true,
                diff_output: String::new(),
                summary: DiffSummary::default(),
            };
        }

        let expected_text = serde_json::to_string_pretty(&expected).unwrap_or_default();
        let actual_text = serde_json::to_string_pretty(&actual).unwrap_or_default();

        let mut summary = DiffSummary::default();
        self.collect_diff_paths(&expected, &actual, "", &mut summary.differing_paths);
        for change in TextDiff::from_lines(&expected_text, &actual_text).iter_all_changes() {
            match change.tag() {
                ChangeTag::Delete => summary.removed += 1,
                ChangeTag::Insert => summary.added += 1,
                ChangeTag::Equal => {}
            }
        }

        DiffResult {
            matches: false,
            diff_output: self.render(&expected_text, &actual_text),
            summary,
        }
    }

    fn values_match(&self, expected: &Value, actual: &Value) -> bool {
        match (expected, actual) {
            (Value::Object(exp), Value::Object(act)) => {
                exp.len() == act.len()
                    && exp
                        .iter()
                        .all(|(key, e)| act.get(key).is_some_and(|a| self.values_match(e, a)))
            }
            (Value::Array(exp), Value::Array(act)) => {
                exp.len() == act.len()
                    && exp.iter().zip(act).all(|(e, a)| self.values_match(e, a))
            }
            (Value::Number(exp), Value::Number(act)) => match (exp.as_f64(), act.as_f64()) {
                (Some(e), Some(a)) => (e - a).abs() <= self.options.float_tolerance,
                _ => exp == act,
            },
            (exp, act) => exp == act,
        }
    }

    /// Line diff of the pretty-printed documents
    fn render(&self, expected: &str, actual: &str) -> String {
        let diff = TextDiff::from_lines(expected, actual);
        let header = "--- expected\n+++ actual\n";
        let mut output = if self.options.colored {
            header.bold().to_string()
        } else {
            header.to_string()
        };

        let mut emitted = 0;
        for group in diff.grouped_ops(self.options.context_lines) {
            for op in group {
                for change in diff.iter_changes(&op) {
                    if self.options.max_diff_lines > 0 && emitted >= self.options.max_diff_lines {
                        output.push_str("... (diff truncated) ...\n");
                        return output;
                    }
                    let line = match change.tag() {
                        ChangeTag::Delete if self.options.colored => format!("-{}", change).red().to_string(),
                        ChangeTag::Insert if self.options.colored => format!("+{}", change).green().to_string(),
                        ChangeTag::Delete => format!("-{}", change),
                        ChangeTag::Insert => format!("+{}", change),
                        ChangeTag::Equal => format!(" {}", change),
                    };
                    output.push_str(&line);
                    emitted += 1;
                }
            }
            if !self.options.full_diff {
                output.push_str("...\n");
            }
        }

        output
    }

    fn collect_diff_paths(&self, expected: &Value, actual: &Value, path: &str, paths: &mut Vec<String>) {
        let join = |key: &str| {
            if path.is_empty() {
                key.to_string()
            } else {
                format!("{}.{}", path, key)
            }
        };

        match (expected, actual) {
            (Value::Object(exp), Value::Object(act)) => {
                let keys: BTreeSet<&String> = exp.keys().chain(act.keys()).collect();
                for key in keys {
                    match (exp.get(key), act.get(key)) {
                        (Some(e), Some(a)) if !self.values_match(e, a) => {
                            self.collect_diff_paths(e, a, &join(key), paths)
                        }
                        (Some(_), None) => paths.push(format!("{} (missing in actual)", join(key))),
                        (None, Some(_)) => paths.push(format!("{} (extra in actual)", join(key))),
                        _ => {}
                    }
                }
            }
            (Value::Array(exp), Value::Array(act)) => {
                for (i, (e, a)) in exp.iter().zip(act).enumerate() {
                    if !self.values_match(e, a) {
                        self.collect_diff_paths(e, a, &format!("{}[{}]", path, i), paths);
                    }
                }
                if exp.len() != act.len() {
                    paths.push(format!("{} (length {} vs {})", path, exp.len(), act.len()));
                }
            }
            _ => paths.push(if path.is_empty() { "(root)".to_string() } else { path.to_string() }),
        }
    }

    fn mask_volatile_fields(&self, value: &mut Value) {
        for (parts, pattern) in &self.volatile_patterns {
            mask_path(value, parts, pattern);
        }
    }
}

fn mask_path(value: &mut Value, parts: &[String], pattern: &Regex) {
    let Some((first, rest)) = parts.split_first() else {
        return;
    };

    match value {
        Value::Object(map) => match map.get_mut(first.as_str()) {
            Some(Value::String(s)) if rest.is_empty() => {
                if pattern.is_match(s) {
                    *s = MASK.to_string();
                }
            }
            Some(next) if !rest.is_empty() => mask_path(next, rest, pattern),
            _ => {}
        },
        Value::Array(items) => items.iter_mut().for_each(|item| mask_path(item, parts, pattern)),
        _ => {}
    }
}
