//! Backend report validation: the embedded JSON Schema plus strict rules
//!
//! Copyright (c) 2025 CMVR Team
//! Licensed under the Apache-2.0 license

use crate::validation::base::{SchemaValidator, ValidationContext, ValidationHelpers};
use crate::validation::error::{ValidationError, ValidationErrors, Violation};
use serde_json::Value;

/// Draft 2020-12 schema of the backend report DTO
pub const BACKEND_REPORT_SCHEMA: &str = include_str!("../../schemas/backend-report.schema.json");

/// Permit lists whose entries must carry at least one populated field
const PERMIT_LISTS: &[&str] = &["ecc", "isag", "epep", "rcf", "mtf", "fmrdf"];

/// Spellings accepted for a quarter name
const QUARTER_NAMES: &[&str] = &[
    "1st quarter", "2nd quarter", "3rd quarter", "4th quarter",
    "first quarter", "second quarter", "third quarter", "fourth quarter",
    "1st", "2nd", "3rd", "4th",
    "first", "second", "third", "fourth",
    "q1", "q2", "q3", "q4",
];

const WASTE_AREAS: &[&str] = &["quarry", "plant", "port"];

/// Validator for assembled backend reports
pub struct ReportValidator {
    schema: Value,
    compiled: jsonschema::Validator,
}

impl std::fmt::Debug for ReportValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportValidator")
            .field("title", &self.schema.get("title"))
            .finish_non_exhaustive()
    }
}

impl ReportValidator {
    /// Compile the embedded schema
    pub fn new() -> Result<Self, ValidationError> {
        let schema: Value = serde_json::from_str(BACKEND_REPORT_SCHEMA)
            .map_err(|e| ValidationError::new("", format!("embedded schema is not JSON: {}", e)))?;
        let compiled = jsonschema::validator_for(&schema)
            .map_err(|e| ValidationError::new("", format!("invalid schema: {}", e)))?;
        Ok(Self { schema, compiled })
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    fn schema_errors(&self, dto: &Value, ctx: &ValidationContext) -> Vec<ValidationError> {
        self.compiled
            .iter_errors(dto)
            .map(|e| {
                let pointer = format!("{}{}", ctx.path, e.instance_path);
                ValidationError::rule(
                    pointer.clone(),
                    e.to_string(),
                    Violation::new("schema", e.to_string(), format!("value at '{}'", pointer)),
                )
            })
            .collect()
    }

    fn rule_errors(&self, dto: &Value, ctx: &ValidationContext) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for list in PERMIT_LISTS {
            let list_ctx = ctx.child(list);
            let entries = dto.get(*list).and_then(Value::as_array);
            for (i, entry) in entries.into_iter().flatten().enumerate() {
                let entry_ctx = list_ctx.child_index(i);
                if let Err(e) =
                    ValidationHelpers::validate_has_content(entry, "permit_entry_non_empty", &entry_ctx)
                {
                    errors.push(e);
                }
            }
        }

        if let Some(year) = dto.get("year").and_then(Value::as_i64) {
            if let Err(e) = ValidationHelpers::validate_range(year, 1900, 2100, "year_range", &ctx.child("year")) {
                errors.push(e);
            }
        }

        check_quarter(dto, ctx, &mut errors);

        let cmr_ctx = ctx.child("complianceMonitoringReport");
        let cmr = dto.get("complianceMonitoringReport");

        for key in ["recommendationFromPrevQuarter", "recommendationForNextQuarter"] {
            if let Some(recommendations) = cmr.and_then(|c| c.get(key)) {
                check_quarter(recommendations, &cmr_ctx.child(key), &mut errors);
                if let Some(year) = recommendations.get("year").and_then(Value::as_i64) {
                    let year_ctx = cmr_ctx.child(key).child("year");
                    if let Err(e) = ValidationHelpers::validate_range(year, 1900, 2100, "year_range", &year_ctx) {
                        errors.push(e);
                    }
                }
            }
        }

        let waste_key = "complianceWithGoodPracticeInSolidAndHazardousWasteManagement";
        if let Some(waste) = cmr.and_then(|c| c.get(waste_key)) {
            let waste_ctx = cmr_ctx.child(waste_key);
            for area in WASTE_AREAS {
                if let Some(rows) = waste.get(*area).and_then(Value::as_array) {
                    if let Err(e) = ValidationHelpers::validate_non_empty_array(
                        rows,
                        "section_table_non_empty",
                        &waste_ctx.child(area),
                    ) {
                        errors.push(e);
                    }
                }
            }
        }

        errors
    }
}

fn check_quarter(holder: &Value, ctx: &ValidationContext, errors: &mut Vec<ValidationError>) {
    let Some(quarter) = holder.get("quarter").and_then(Value::as_str) else {
        return;
    };
    if quarter.trim().is_empty() {
        return;
    }
    if let Err(e) =
        ValidationHelpers::validate_enum_value(quarter, QUARTER_NAMES, "quarter_name", &ctx.child("quarter"))
    {
        errors.push(e);
    }
}

impl SchemaValidator for ReportValidator {
    type Input = Value;

    fn collect_with_context(&self, dto: &Value, ctx: &ValidationContext) -> ValidationErrors {
        let mut errors = self.schema_errors(dto, ctx);
        if ctx.is_strict() {
            errors.extend(self.rule_errors(dto, ctx));
        }
        ValidationErrors::from(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::base::ValidationMode;
    use serde_json::json;

    fn minimal_report() -> Value {
        json!({
            "createdById": "user-1",
            "companyName": "Acme",
            "location": "",
            "quarter": "1st Quarter",
            "year": 2024,
            "dateOfComplianceMonitoringAndValidation": "",
            "monitoringPeriodCovered": "",
            "dateOfCmrSubmission": "",
            "ecc": [{"permitHolderName": "Acme", "eccNumber": "ECC-1", "dateOfIssuance": ""}],
            "isag": [], "epep": [], "rcf": [], "mtf": [], "fmrdf": [],
            "projectName": "", "projectNameInEcc": "", "projectStatus": "",
            "projectLocation": "", "projectArea": "",
            "proponent": {"name": "", "contactPerson": "", "mailingAddress": "", "telephoneNo": "", "emailAddress": ""},
            "mmt": {"contactPerson": "", "mailingAddress": "", "telephoneNo": "", "emailAddress": ""},
            "complianceMonitoringReport": {"complaintsVerificationAndManagement": []},
            "attachments": []
        })
    }

    #[test]
    fn test_embedded_schema_compiles() {
        let validator = ReportValidator::new().unwrap();
        assert_eq!(validator.schema()["title"], "BackendReportDto");
    }

    #[test]
    fn test_minimal_report_is_valid() {
        let validator = ReportValidator::new().unwrap();
        assert!(validator.validate(&minimal_report()).is_ok());
    }

    #[test]
    fn test_missing_field_reported_by_schema() {
        let validator = ReportValidator::new().unwrap();
        let mut report = minimal_report();
        report.as_object_mut().unwrap().remove("ecc");
        let err = validator.validate_basic(&report).unwrap_err();
        assert_eq!(err.rule_name(), Some("schema"));
        assert!(err.message.contains("ecc"));
    }

    #[test]
    fn test_wrong_type_has_pointer() {
        let validator = ReportValidator::new().unwrap();
        let mut report = minimal_report();
        report["ecc"][0]["eccNumber"] = json!(12);
        let err = validator.validate_basic(&report).unwrap_err();
        assert_eq!(err.path, "/ecc/0/eccNumber");
    }

    #[test]
    fn test_strict_rules_only_in_strict_mode() {
        let validator = ReportValidator::new().unwrap();
        let mut report = minimal_report();
        report["year"] = json!(1850);
        report["quarter"] = json!("Quarter Five");
        report["ecc"][0] = json!({"permitHolderName": "", "eccNumber": "", "dateOfIssuance": ""});

        assert!(validator.validate_basic(&report).is_ok());

        let errors = validator.collect_errors(&report, ValidationMode::Strict);
        let rules: Vec<_> = errors.iter().filter_map(|e| e.rule_name()).collect();
        assert_eq!(rules, vec!["permit_entry_non_empty", "year_range", "quarter_name"]);
        assert_eq!(errors.errors[0].path, "/ecc/0");
    }

    #[test]
    fn test_waste_table_must_not_be_empty() {
        let validator = ReportValidator::new().unwrap();
        let mut report = minimal_report();
        report["complianceMonitoringReport"]
            ["complianceWithGoodPracticeInSolidAndHazardousWasteManagement"] =
            json!({"quarry": [], "plant": "N/A"});

        let err = validator.validate(&report).unwrap_err();
        assert_eq!(err.rule_name(), Some("section_table_non_empty"));
        assert_eq!(
            err.path,
            "/complianceMonitoringReport/complianceWithGoodPracticeInSolidAndHazardousWasteManagement/quarry"
        );
    }

    #[test]
    fn test_unknown_sentinel_rejected() {
        let validator = ReportValidator::new().unwrap();
        let mut report = minimal_report();
        report["complianceMonitoringReport"]
            ["complianceWithGoodPracticeInSolidAndHazardousWasteManagement"] =
            json!({"port": "Maybe"});
        assert!(validator.validate_basic(&report).is_err());
    }
}
