//! Scenario tests for backend report validation

use cmvr_schemas::{validate_report, ValidationMode, BACKEND_REPORT_SCHEMA};
use serde_json::{json, Value};

fn report() -> Value {
    json!({
        "createdById": "user-9",
        "companyName": "Acme",
        "location": "Brgy. Malinao, Rizal",
        "quarter": "Q2",
        "dateOfComplianceMonitoringAndValidation": "2024-03-12",
        "monitoringPeriodCovered": "April to June 2024",
        "dateOfCmrSubmission": "2024-07-15",
        "ecc": [],
        "isag": [],
        "epep": [],
        "rcf": [{"permitHolderName": "", "savingsAccountNumber": "", "amountDeposited": 5000000.0, "dateUpdated": ""}],
        "mtf": [],
        "fmrdf": [],
        "projectName": "Malinao Limestone Quarry",
        "projectNameInEcc": "",
        "projectStatus": "",
        "projectLocation": "",
        "projectArea": "",
        "proponent": {"name": "Acme Mining Corp.", "contactPerson": "", "mailingAddress": "", "telephoneNo": "", "emailAddress": ""},
        "mmt": {"contactPerson": "", "mailingAddress": "", "telephoneNo": "", "emailAddress": ""},
        "complianceMonitoringReport": {
            "waterQualityImpactAssessment": {
                "quarry": {
                    "locationDescription": "Settling pond outlet",
                    "parameters": [{
                        "name": "TSS",
                        "result": {"current": "45 mg/L", "previous": ""},
                        "eqpl": {"redFlag": "40", "action": "45", "limit": 50.0},
                        "remarks": ""
                    }],
                    "samplingDate": "",
                    "weatherAndWind": "",
                    "explanationForConfirmatorySampling": "",
                    "overallAssessment": "Compliant"
                }
            },
            "complianceWithGoodPracticeInChemicalSafetyManagement": {
                "chemicalSafety": "N/A",
                "healthSafetyChecked": true,
                "socialDevChecked": false
            },
            "complaintsVerificationAndManagement": [
                {"isNA": true, "dateFiled": "", "othersSpecify": "", "natureOfComplaint": "", "resolutions": ""}
            ],
            "recommendationFromPrevQuarter": {"quarter": "1st Quarter", "year": 2024, "items": []}
        },
        "attachments": [{"name": "site-map.png", "path": "uploads/site-map.png"}]
    })
}

#[test]
fn test_embedded_schema_is_draft_2020_12() {
    let schema: Value = serde_json::from_str(BACKEND_REPORT_SCHEMA).unwrap();
    assert_eq!(schema["$schema"], "https://json-schema.org/draft/2020-12/schema");
}

#[test]
fn test_populated_report_passes_strict() {
    let result = validate_report(&report(), ValidationMode::Strict);
    assert!(result.is_ok(), "unexpected errors: {:?}", result);
}

#[test]
fn test_unknown_top_level_field_rejected() {
    let mut doc = report();
    doc["projectNameInECC"] = json!("typo");
    let errors = validate_report(&doc, ValidationMode::Basic).unwrap_err();
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_empty_quality_assessment_rejected() {
    let mut doc = report();
    doc["complianceMonitoringReport"]["airQualityImpactAssessment"] = json!({});
    let errors = validate_report(&doc, ValidationMode::Basic).unwrap_err();
    assert!(errors.errors[0].path.ends_with("/airQualityImpactAssessment"));
}

#[test]
fn test_bad_compliance_state_rejected() {
    let mut doc = report();
    doc["complianceMonitoringReport"]["complianceWithGoodPracticeInChemicalSafetyManagement"]
        ["chemicalSafety"] = json!({
            "chemicalCategory": "",
            "training": "maybe",
            "othersSpecify": "",
            "remarks": ""
        });
    assert!(validate_report(&doc, ValidationMode::Basic).is_err());
}

#[test]
fn test_recommendation_quarter_checked_in_strict() {
    let mut doc = report();
    doc["complianceMonitoringReport"]["recommendationFromPrevQuarter"]["quarter"] = json!("Fifth");
    assert!(validate_report(&doc, ValidationMode::Basic).is_ok());
    let errors = validate_report(&doc, ValidationMode::Strict).unwrap_err();
    assert_eq!(
        errors.errors[0].path,
        "/complianceMonitoringReport/recommendationFromPrevQuarter/quarter"
    );
}
