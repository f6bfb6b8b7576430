//! Validation of assembled backend reports
//!
//! Two modes are supported:
//!
//! - **Basic**: JSON Schema validation only
//! - **Strict**: Schema plus the report business rules

pub mod base;
pub mod error;
pub mod report;

pub use base::{SchemaValidator, ValidationContext, ValidationHelpers, ValidationMode};
pub use error::{ValidationError, ValidationErrors, ValidationResult, Violation};
pub use report::{ReportValidator, BACKEND_REPORT_SCHEMA};

use serde_json::Value;
use std::sync::OnceLock;

/// Validator compiled once per process
pub fn report_validator() -> Result<&'static ReportValidator, ValidationError> {
    static VALIDATOR: OnceLock<Result<ReportValidator, ValidationError>> = OnceLock::new();
    VALIDATOR
        .get_or_init(ReportValidator::new)
        .as_ref()
        .map_err(Clone::clone)
}

/// Validate one report in the given mode, collecting every error
pub fn validate_report(dto: &Value, mode: ValidationMode) -> Result<(), ValidationErrors> {
    report_validator()?.collect_errors(dto, mode).into_result()
}
