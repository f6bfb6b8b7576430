//! Submission envelope
//!
//! A submission bundles the three inputs of the normalizer into one
//! document, which is what the CLI and the golden fixtures read.

use crate::error::{Error, Result};
use crate::normalizer::transform_to_backend_dto;
use crate::types::BackendReportDto;
use serde_json::{Map, Value};
use std::path::Path;

/// The three normalizer inputs
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSubmission {
    pub current_report: Value,
    pub general_info: Value,
    pub created_by_id: String,
}

fn take_either(map: &mut Map<String, Value>, camel: &str, snake: &str) -> Option<Value> {
    map.remove(camel).or_else(|| map.remove(snake))
}

impl ReportSubmission {
    pub fn new(current_report: Value, general_info: Value, created_by_id: impl Into<String>) -> Self {
        Self {
            current_report,
            general_info,
            created_by_id: created_by_id.into(),
        }
    }

    /// Read an envelope from a JSON value
    ///
    /// `generalInfo` defaults to `{}` and `createdById` to `""`. Both
    /// camelCase and snake_case keys are accepted.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(Error::InvalidSubmission {
                message: "submission must be a JSON object".to_string(),
                field: None,
            });
        };

        let current_report = take_either(&mut map, "currentReport", "current_report")
            .ok_or_else(|| Error::invalid_field("currentReport", "missing report state"))?;
        let general_info = take_either(&mut map, "generalInfo", "general_info")
            .filter(|v| !v.is_null())
            .unwrap_or_else(|| Value::Object(Map::new()));
        if !general_info.is_object() {
            return Err(Error::invalid_field("generalInfo", "expected an object"));
        }

        let created_by_id = match take_either(&mut map, "createdById", "created_by_id") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(id)) => id,
            Some(Value::Number(id)) => id.to_string(),
            Some(_) => {
                return Err(Error::invalid_field(
                    "createdById",
                    "expected a string or number",
                ))
            }
        };

        Ok(Self::new(current_report, general_info, created_by_id))
    }

    /// Parse an envelope from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Read an envelope from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            message: format!("failed to read {}: {}", path.display(), source),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Replace the creator id, e.g. from a command-line override
    pub fn with_created_by(mut self, created_by_id: impl Into<String>) -> Self {
        self.created_by_id = created_by_id.into();
        self
    }

    /// Run the normalizer over this submission
    ///
    /// An empty report surfaces as [`Error::EmptyReport`] instead of `None`.
    pub fn normalize(&self) -> Result<BackendReportDto> {
        transform_to_backend_dto(&self.current_report, &self.general_info, &self.created_by_id)
            .ok_or(Error::EmptyReport)
    }
}
