//! Top-level assembly of the backend report DTO
//!
//! Copyright (c) 2025 CMVR Team
//! Licensed under the Apache-2.0 license

use super::coerce::{is_falsy, parse_first_number, sanitize_opt};
use super::fallback::{lookup, FallbackChain};
use super::files::{normalize_file, normalize_files};
use super::{complaints, coverage, noise, permits, quality, recommendations, summary, waste};
use crate::types::{BackendReportDto, ComplianceMonitoringReport, MmtContact, ProponentContact};
use permits::FundKind;
use serde_json::Value;

/// Only string values; an object at the same key is read field by field instead
fn as_text(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| v.is_string())
}

fn proponent_contact(report: &Value, general: &Value) -> ProponentContact {
    let field = |name: &'static str, isag_key: &'static str, general_key: &'static str| {
        FallbackChain::new(name)
            .then(isag_key, report, isag_key)
            .then(general_key, general, general_key)
            .resolve()
    };

    ProponentContact {
        name: FallbackChain::new("proponent.name")
            .then("isagInfo.proponentName", report, "isagInfo.proponentName")
            .then_with("generalInfo.proponent", || as_text(general.get("proponent")))
            .then("generalInfo.proponent.name", general, "proponent.name")
            .resolve(),
        contact_person: field(
            "proponent.contactPerson",
            "isagInfo.proponentContact",
            "proponent.contactPerson",
        ),
        mailing_address: field(
            "proponent.mailingAddress",
            "isagInfo.proponentAddress",
            "proponent.mailingAddress",
        ),
        telephone_no: FallbackChain::new("proponent.telephoneNo")
            .then("isagInfo.proponentPhone", report, "isagInfo.proponentPhone")
            .then("isagInfo.proponentTelephone", report, "isagInfo.proponentTelephone")
            .then("generalInfo.proponent.telephoneNo", general, "proponent.telephoneNo")
            .resolve(),
        email_address: field(
            "proponent.emailAddress",
            "isagInfo.proponentEmail",
            "proponent.emailAddress",
        ),
    }
}

fn mmt_contact(report: &Value, general: &Value) -> MmtContact {
    let field = |name: &'static str, key: &'static str| {
        FallbackChain::new(name)
            .then_with("mmtInfo", move || report.get("mmtInfo").and_then(|m| m.get(key)))
            .then_with("generalInfo.mmt", move || general.get("mmt").and_then(|m| m.get(key)))
            .resolve()
    };

    MmtContact {
        contact_person: FallbackChain::new("mmt.contactPerson")
            .then("mmtInfo.contactPerson", report, "mmtInfo.contactPerson")
            .then("generalInfo.mmt.contactPerson", general, "mmt.contactPerson")
            .then_with("generalInfo.environmentalOfficer", || {
                as_text(general.get("environmentalOfficer"))
            })
            .resolve(),
        mailing_address: field("mmt.mailingAddress", "mailingAddress"),
        telephone_no: field("mmt.telephoneNo", "telephoneNo"),
        email_address: field("mmt.emailAddress", "emailAddress"),
    }
}

fn report_year(report: &Value, general: &Value) -> Option<i32> {
    [lookup(general, "year"), lookup(report, "year")]
        .into_iter()
        .flatten()
        .find_map(parse_first_number)
        .map(|year| year.trunc() as i32)
}

fn compliance_monitoring_report(report: &Value) -> ComplianceMonitoringReport {
    let (previous, next) = recommendations::build_recommendations(report.get("recommendationsData"));

    ComplianceMonitoringReport {
        compliance_to_project_location_and_coverage_limits:
            coverage::build_project_location_compliance(
                report.get("complianceToProjectLocationAndCoverageLimits"),
            ),
        compliance_to_impact_management_commitments: coverage::build_impact_management_compliance(
            report.get("complianceToImpactManagementCommitments"),
        ),
        air_quality_impact_assessment: quality::build_air_quality_impact_assessment(
            report.get("airQualityImpactAssessment"),
        ),
        water_quality_impact_assessment: quality::build_water_quality_impact_assessment(
            report.get("waterQualityImpactAssessment"),
        ),
        noise_quality_impact_assessment: noise::build_noise_quality_impact_assessment(
            report.get("noiseQualityImpactAssessment"),
        ),
        compliance_with_good_practice_in_solid_and_hazardous_waste_management:
            waste::build_waste_management_section(
                report.get("complianceWithGoodPracticeInSolidAndHazardousWasteManagement"),
            ),
        compliance_with_good_practice_in_chemical_safety_management:
            waste::build_chemical_safety_section(
                report.get("complianceWithGoodPracticeInChemicalSafetyManagement"),
            ),
        complaints_verification_and_management: complaints::build_complaints_list(
            report.get("complaintsVerificationAndManagement"),
        ),
        recommendation_from_prev_quarter: previous,
        recommendation_for_next_quarter: next,
    }
}

/// Map the in-app report state onto the backend DTO
///
/// Returns `None` only when `current_report` is falsy (`null`, `false`, `0`
/// or `""`). Every other input produces a DTO; sections with no meaningful
/// data are omitted or left empty.
#[tracing::instrument(skip_all, fields(created_by_id = %created_by_id))]
pub fn transform_to_backend_dto(
    current_report: &Value,
    general_info: &Value,
    created_by_id: &str,
) -> Option<BackendReportDto> {
    if is_falsy(current_report) {
        tracing::debug!("report is empty, nothing to transform");
        return None;
    }
    let report = current_report;
    let general = general_info;

    let project_name = FallbackChain::new("projectName")
        .then("projectCurrentName", report, "projectCurrentName")
        .then("projectNameCurrent", report, "projectNameCurrent")
        .then("isagInfo.currentName", report, "isagInfo.currentName")
        .then("generalInfo.projectName", general, "projectName")
        .then("projectName", report, "projectName")
        .then("generalInfo.companyName", general, "companyName")
        .then("companyName", report, "companyName");
    tracing::trace!(source = ?project_name.winner(), "project name resolved");

    let attendance_id = sanitize_opt(report.get("attendanceId"));

    let dto = BackendReportDto {
        created_by_id: created_by_id.to_string(),
        company_name: FallbackChain::new("companyName")
            .then("generalInfo.companyName", general, "companyName")
            .then("companyName", report, "companyName")
            .then("isagInfo.permitHolder", report, "isagInfo.permitHolder")
            .resolve(),
        location: FallbackChain::new("location")
            .then("generalInfo.location", general, "location")
            .then("location", report, "location")
            .then("isagInfo.projectLocation", report, "isagInfo.projectLocation")
            .resolve(),
        quarter: FallbackChain::new("quarter")
            .then("generalInfo.quarter", general, "quarter")
            .then("quarter", report, "quarter")
            .resolve(),
        year: report_year(report, general),
        date_of_compliance_monitoring_and_validation: FallbackChain::new(
            "dateOfComplianceMonitoringAndValidation",
        )
        .then(
            "generalInfo.dateOfComplianceMonitoringAndValidation",
            general,
            "dateOfComplianceMonitoringAndValidation",
        )
        .then("generalInfo.dateOfCompliance", general, "dateOfCompliance")
        .then("generalInfo.complianceDate", general, "complianceDate")
        .then("dateOfCompliance", report, "dateOfCompliance")
        .resolve(),
        monitoring_period_covered: FallbackChain::new("monitoringPeriodCovered")
            .then("generalInfo.monitoringPeriodCovered", general, "monitoringPeriodCovered")
            .then("generalInfo.monitoringPeriod", general, "monitoringPeriod")
            .resolve(),
        date_of_cmr_submission: FallbackChain::new("dateOfCmrSubmission")
            .then("generalInfo.dateOfCmrSubmission", general, "dateOfCmrSubmission")
            .then("generalInfo.dateOfCMRSubmission", general, "dateOfCMRSubmission")
            .then("generalInfo.dateOfSubmission", general, "dateOfSubmission")
            .then("generalInfo.submissionDate", general, "submissionDate")
            .resolve(),

        ecc: permits::build_ecc_entries(report),
        ecc_conditions_attachment: report.get("eccConditionsAttachment").and_then(normalize_file),
        isag: permits::build_isag_entries(report),
        epep: permits::build_epep_entries(report),
        rcf: permits::build_fund_entries(report, FundKind::Rcf),
        mtf: permits::build_fund_entries(report, FundKind::Mtf),
        fmrdf: permits::build_fund_entries(report, FundKind::Fmrdf),

        project_name: project_name.resolve(),
        project_name_in_ecc: FallbackChain::new("projectNameInEcc")
            .then("isagInfo.nameInECC", report, "isagInfo.nameInECC")
            .then("isagInfo.nameInEcc", report, "isagInfo.nameInEcc")
            .then("projectNameInEcc", report, "projectNameInEcc")
            .resolve(),
        project_status: FallbackChain::new("projectStatus")
            .then("isagInfo.projectStatus", report, "isagInfo.projectStatus")
            .then("projectStatus", report, "projectStatus")
            .resolve(),
        project_location: FallbackChain::new("projectLocation")
            .then("isagInfo.projectLocation", report, "isagInfo.projectLocation")
            .then("generalInfo.location", general, "location")
            .resolve(),
        project_area: FallbackChain::new("projectArea")
            .then("isagInfo.projectArea", report, "isagInfo.projectArea")
            .then("projectArea", report, "projectArea")
            .resolve(),
        proponent: proponent_contact(report, general),
        mmt: mmt_contact(report, general),

        executive_summary_of_compliance: summary::transform_executive_summary(
            report.get("executiveSummaryOfCompliance"),
        ),
        process_documentation_of_activities_undertaken: summary::transform_process_documentation(
            report.get("processDocumentationOfActivitiesUndertaken"),
            report,
        ),
        compliance_monitoring_report: compliance_monitoring_report(report),
        attendance_id: (!attendance_id.is_empty()).then_some(attendance_id),
        attachments: normalize_files(report.get("attachments")),
    };

    Some(dto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_falsy_report_returns_none() {
        for report in [json!(null), json!(false), json!(0), json!("")] {
            assert!(transform_to_backend_dto(&report, &json!({}), "u").is_none());
        }
        assert!(transform_to_backend_dto(&json!({}), &json!(null), "u").is_some());
    }

    #[test]
    fn test_project_name_chain_order() {
        let general = json!({"projectName": "General Project", "companyName": "Acme"});
        let report = json!({"isagInfo": {"currentName": "ISAG Name"}, "projectName": "Report Project"});
        let dto = transform_to_backend_dto(&report, &general, "u").unwrap();
        assert_eq!(dto.project_name, "ISAG Name");

        let report = json!({"projectName": "Report Project"});
        let dto = transform_to_backend_dto(&report, &general, "u").unwrap();
        assert_eq!(dto.project_name, "General Project");

        let dto = transform_to_backend_dto(&json!({"x": 1}), &json!({"companyName": "Acme"}), "u").unwrap();
        assert_eq!(dto.project_name, "Acme");
    }

    #[test]
    fn test_year_skips_unparseable_general_value() {
        let dto = transform_to_backend_dto(&json!({"year": 2023}), &json!({"year": "TBD"}), "u").unwrap();
        assert_eq!(dto.year, Some(2023));
        let dto = transform_to_backend_dto(&json!({}), &json!({"year": "CY 2024"}), "u").unwrap();
        assert_eq!(dto.year, Some(2024));
    }

    #[test]
    fn test_proponent_from_isag_and_general_text() {
        let report = json!({"isagInfo": {"proponentContact": "J. Dela Cruz", "proponentPhone": "0917"}});
        let general = json!({"proponent": "Acme Mining Corp."});
        let dto = transform_to_backend_dto(&report, &general, "u").unwrap();
        assert_eq!(dto.proponent.name, "Acme Mining Corp.");
        assert_eq!(dto.proponent.contact_person, "J. Dela Cruz");
        assert_eq!(dto.proponent.telephone_no, "0917");
    }

    #[test]
    fn test_mmt_contact_chain() {
        let general = json!({"environmentalOfficer": "Engr. Santos", "mmt": {"emailAddress": "mmt@example.org"}});
        let report = json!({"mmtInfo": {"telephoneNo": "8123"}});
        let dto = transform_to_backend_dto(&report, &general, "u").unwrap();
        assert_eq!(dto.mmt.contact_person, "Engr. Santos");
        assert_eq!(dto.mmt.telephone_no, "8123");
        assert_eq!(dto.mmt.email_address, "mmt@example.org");

        let report = json!({"mmtInfo": {"contactPerson": "MMT Head"}});
        let dto = transform_to_backend_dto(&report, &general, "u").unwrap();
        assert_eq!(dto.mmt.contact_person, "MMT Head");
    }

    #[test]
    fn test_attachments_and_attendance() {
        let report = json!({
            "attendanceId": "  att-9 ",
            "attachments": [{"path": "uploads/map.png"}, {"name": "x"}],
            "eccConditionsAttachment": {"uri": "https://files.example.com/ecc.pdf"}
        });
        let dto = transform_to_backend_dto(&report, &json!({}), "u").unwrap();
        assert_eq!(dto.attendance_id.as_deref(), Some("att-9"));
        assert_eq!(dto.attachments.len(), 1);
        assert_eq!(dto.ecc_conditions_attachment.unwrap().name, "ecc.pdf");

        let dto = transform_to_backend_dto(&json!({"attendanceId": ""}), &json!({}), "u").unwrap();
        assert!(dto.attendance_id.is_none());
        assert!(dto.attachments.is_empty());
    }

    #[test]
    fn test_numeric_ids_render_like_form_text() {
        let report = json!({"eccInfo": {"eccNumber": 1.0, "permitHolder": "Acme"}, "attendanceId": 7.0});
        let dto = transform_to_backend_dto(&report, &json!({}), "u").unwrap();
        assert_eq!(dto.ecc[0].ecc_number, "1");
        assert_eq!(dto.attendance_id.as_deref(), Some("7"));
    }

    #[test]
    fn test_empty_summary_sections_are_omitted() {
        let report = json!({
            "executiveSummaryOfCompliance": {},
            "processDocumentationOfActivitiesUndertaken": {}
        });
        let dto = transform_to_backend_dto(&report, &json!({}), "u").unwrap();
        let wire = serde_json::to_value(&dto).unwrap();
        assert!(wire.get("executiveSummaryOfCompliance").is_none());
        assert!(wire.get("processDocumentationOfActivitiesUndertaken").is_none());
    }
}
