//! End-to-end tests for the report normalizer


use cmvr_core::normalizer::build_water_quality_impact_assessment;
use cmvr_core::{
    transform_to_backend_dto, ComplianceState, ReportSubmission, SectionOutcome, Sentinel,
};
use cmvr_schemas::{validate_report, ValidationMode};
use serde_json::{json, Value};
use test_support::*;

#[test]
fn test_ecc_only_scenario() {
    let general = json!({"companyName": "Acme", "quarter": "1st Quarter", "year": "2024"});
    let dto = transform_to_backend_dto(&ecc_only_report(), &general, "user-123").unwrap();

    assert_eq!(dto.created_by_id, "user-123");
    assert_eq!(dto.company_name, "Acme");
    assert_eq!(dto.quarter, "1st Quarter");
    assert_eq!(dto.year, Some(2024));
    assert_eq!(dto.ecc.len(), 1);
    assert_eq!(dto.ecc[0].permit_holder_name, "Acme Mining");
    assert_eq!(dto.ecc[0].ecc_number, "ECC-001");
    assert_eq!(dto.ecc[0].date_of_issuance, "01/01/2024");

    assert!(dto.isag.is_empty());
    assert!(dto.rcf.is_empty());
    assert!(dto.executive_summary_of_compliance.is_none());
    assert!(dto.compliance_monitoring_report.air_quality_impact_assessment.is_none());
    assert!(dto.compliance_monitoring_report.complaints_verification_and_management.is_empty());
}

#[test]
fn test_ecc_only_scenario_wire_shape() {
    let general = json!({"companyName": "Acme", "quarter": "1st Quarter", "year": "2024"});
    let dto = transform_to_backend_dto(&ecc_only_report(), &general, "user-123").unwrap();
    let wire = serde_json::to_value(&dto).unwrap();

    assert_eq!(wire["companyName"], json!("Acme"));
    assert_eq!(wire["year"], json!(2024));
    assert_eq!(
        wire["ecc"],
        json!([{"permitHolderName": "Acme Mining", "eccNumber": "ECC-001", "dateOfIssuance": "01/01/2024"}])
    );
    assert_eq!(wire["isag"], json!([]));
    assert_eq!(wire["attachments"], json!([]));
    assert!(wire.get("executiveSummaryOfCompliance").is_none());
    assert!(wire.get("attendanceId").is_none());
    assert_eq!(
        wire["complianceMonitoringReport"],
        json!({"complaintsVerificationAndManagement": []})
    );
}

#[test]
fn test_null_guard() {
    for general in [Value::Null, json!({}), general_info()] {
        assert!(transform_to_backend_dto(&Value::Null, &general, "anyone").is_none());
    }
}

#[test]
fn test_transform_is_idempotent() {
    let report = full_report();
    let general = general_info();
    let first = transform_to_backend_dto(&report, &general, "user-9");
    let second = transform_to_backend_dto(&report, &general, "user-9");
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_transform_does_not_mutate_input() {
    let report = full_report();
    let snapshot = report.clone();
    let _ = transform_to_backend_dto(&report, &general_info(), "u");
    assert_eq!(report, snapshot);
}

#[test]
fn test_water_shapes_are_equivalent() {
    let shared = build_water_quality_impact_assessment(Some(&water_shared_table())).unwrap();
    let single = build_water_quality_impact_assessment(Some(&water_single_object())).unwrap();
    let per_location = build_water_quality_impact_assessment(Some(&water_per_location())).unwrap();

    assert_eq!(shared, single);
    assert_eq!(shared, per_location);

    let quarry = shared.quarry.unwrap();
    assert_eq!(quarry.location_description, "Settling pond outlet");
    assert_eq!(quarry.parameters[0].eqpl.limit, Some(50.0));
    assert!(shared.plant.is_none());
}

#[test]
fn test_full_report() {
    let dto = transform_to_backend_dto(&full_report(), &general_info(), "user-9").unwrap();

    assert_eq!(dto.project_name, "Malinao Limestone Quarry");
    assert_eq!(dto.project_name_in_ecc, "Malinao Limestone Project");
    assert_eq!(dto.monitoring_period_covered, "January to March 2024");
    assert_eq!(dto.date_of_cmr_submission, "2024-04-15");
    assert_eq!(dto.proponent.name, "Acme Mining Corp.");
    assert_eq!(dto.proponent.contact_person, "J. Dela Cruz");
    assert_eq!(dto.proponent.mailing_address, "12 Ore St., Pasig");
    assert_eq!(dto.mmt.contact_person, "Engr. R. Santos");

    assert_eq!(dto.ecc.len(), 2);
    assert_eq!(dto.isag[0].isag_permit_number, "ISAG-2019-044");
    assert_eq!(dto.epep.len(), 1);
    assert_eq!(dto.epep[0].epep_number, "EPEP-12");
    assert_eq!(dto.rcf[0].amount_deposited, Some(5_000_000.0));
    assert!(dto.mtf.is_empty());

    let summary = dto.executive_summary_of_compliance.as_ref().unwrap();
    assert!(summary.complaints_management.na_for_all);
    assert!(!summary.complaints_management.case_investigation);
    assert_eq!(summary.sdmp.status, Some(ComplianceState::Complied));
    assert_eq!(summary.accountability.status, Some(ComplianceState::NotComplied));
    assert_eq!(summary.accountability.remarks, "Pending audit");

    let process = dto.process_documentation_of_activities_undertaken.as_ref().unwrap();
    assert_eq!(process.ecc_conditions_checking.mmt_members_involved, vec!["A. Reyes", "B. Cruz"]);
    assert_eq!(process.site_ocular_validation.mmt_members_involved, vec!["C. Lim"]);
    assert_eq!(process.site_ocular_validation.methodology_used, "Walkthrough");

    let cmr = &dto.compliance_monitoring_report;
    let air = cmr.air_quality_impact_assessment.as_ref().unwrap();
    assert_eq!(air.quarry.as_ref().unwrap().location_description, "Crusher area");
    assert_eq!(air.port.as_ref().unwrap().location_description, "Pier 2");
    assert_eq!(
        cmr.water_quality_impact_assessment.as_ref().unwrap().quarry.as_ref().unwrap().overall_assessment,
        "Compliant"
    );

    let waste = cmr
        .compliance_with_good_practice_in_solid_and_hazardous_waste_management
        .as_ref()
        .unwrap();
    assert_eq!(waste.quarry, Some(SectionOutcome::Sentinel(Sentinel::NoSignificantImpact)));
    assert_eq!(waste.plant, Some(SectionOutcome::Sentinel(Sentinel::NotApplicable)));

    let chemical = cmr
        .compliance_with_good_practice_in_chemical_safety_management
        .as_ref()
        .unwrap();
    assert_eq!(chemical.chemical_safety, SectionOutcome::Sentinel(Sentinel::NotApplicable));
    assert!(chemical.health_safety_checked);

    assert_eq!(cmr.complaints_verification_and_management.len(), 1);
    assert!(cmr.complaints_verification_and_management[0].is_na);
    assert_eq!(cmr.recommendation_from_prev_quarter.as_ref().unwrap().year, Some(2023));
    assert!(cmr.recommendation_for_next_quarter.is_none());

    assert_eq!(dto.attendance_id.as_deref(), Some("att-2024-q1"));
    assert_eq!(dto.attachments[0].mime_type.as_deref(), Some("image/png"));
    assert_eq!(dto.ecc_conditions_attachment.as_ref().unwrap().name, "ecc-conditions.pdf");
}

#[test]
fn test_submission_round_trip_through_json_text() {
    let envelope = json!({
        "currentReport": full_report(),
        "generalInfo": general_info(),
        "createdById": "user-9"
    });
    let submission = ReportSubmission::from_json_str(&envelope.to_string()).unwrap();
    let via_submission = submission.normalize().unwrap();
    let direct = transform_to_backend_dto(&full_report(), &general_info(), "user-9").unwrap();
    assert_eq!(via_submission, direct);
}

fn normalize_to_wire(report: &Value) -> Value {
    let dto = transform_to_backend_dto(report, &json!({"quarter": "1st Quarter", "year": "2024"}), "u")
        .unwrap();
    serde_json::to_value(dto).unwrap()
}

#[test]
fn test_fund_with_unparseable_amount_passes_strict_validation() {
    let wire = normalize_to_wire(&json!({"rcfInfo": {"amountDeposited": "TBD"}}));
    assert_eq!(wire["rcf"], json!([]));
    validate_report(&wire, ValidationMode::Strict).unwrap();

    let wire = normalize_to_wire(&json!({"rcfInfo": {"amountDeposited": "PHP 1,000"}}));
    assert_eq!(wire["rcf"][0]["amountDeposited"], json!(1000.0));
    validate_report(&wire, ValidationMode::Strict).unwrap();
}
