//! Output types for the backend report DTO
//!
//! Field names and nesting here are the wire contract with the backend
//! endpoint. Every struct serializes in `camelCase`; optional sections are
//! omitted rather than sent as `null`.

use serde::{Deserialize, Serialize};

/// Compliance state for checkbox-style compliance questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceState {
    #[serde(rename = "complied")]
    Complied,
    #[serde(rename = "notComplied")]
    NotComplied,
}

/// The canonical report submitted to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendReportDto {
    pub created_by_id: String,
    pub company_name: String,
    pub location: String,
    pub quarter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub date_of_compliance_monitoring_and_validation: String,
    pub monitoring_period_covered: String,
    pub date_of_cmr_submission: String,

    pub ecc: Vec<EccEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecc_conditions_attachment: Option<FileReference>,
    pub isag: Vec<IsagEntry>,
    pub epep: Vec<EpepEntry>,
    pub rcf: Vec<FundEntry>,
    pub mtf: Vec<FundEntry>,
    pub fmrdf: Vec<FundEntry>,

    pub project_name: String,
    pub project_name_in_ecc: String,
    pub project_status: String,
    pub project_location: String,
    pub project_area: String,
    pub proponent: ProponentContact,
    pub mmt: MmtContact,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub executive_summary_of_compliance: Option<ExecutiveSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_documentation_of_activities_undertaken: Option<ProcessDocumentation>,
    pub compliance_monitoring_report: ComplianceMonitoringReport,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_id: Option<String>,
    pub attachments: Vec<FileReference>,
}

/// Environmental-assessment sub-records nested under one key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceMonitoringReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_to_project_location_and_coverage_limits: Option<ProjectLocationCompliance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_to_impact_management_commitments: Option<ImpactManagementCompliance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_quality_impact_assessment: Option<QualityImpactAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_quality_impact_assessment: Option<QualityImpactAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_quality_impact_assessment: Option<NoiseQualityImpactAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_with_good_practice_in_solid_and_hazardous_waste_management: Option<WasteManagement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_with_good_practice_in_chemical_safety_management: Option<ChemicalSafetyManagement>,
    pub complaints_verification_and_management: Vec<Complaint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation_from_prev_quarter: Option<Recommendations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation_for_next_quarter: Option<Recommendations>,
}

// ---------------------------------------------------------------------------
// Permit entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EccEntry {
    pub permit_holder_name: String,
    pub ecc_number: String,
    pub date_of_issuance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsagEntry {
    pub permit_holder_name: String,
    pub isag_permit_number: String,
    pub date_of_issuance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpepEntry {
    pub permit_holder_name: String,
    pub epep_number: String,
    pub date_of_approval: String,
}

/// Rehabilitation, monitoring-trust and final-rehabilitation fund records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundEntry {
    pub permit_holder_name: String,
    pub savings_account_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_deposited: Option<f64>,
    pub date_updated: String,
}

// ---------------------------------------------------------------------------
// Contacts and files
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProponentContact {
    pub name: String,
    pub contact_person: String,
    pub mailing_address: String,
    pub telephone_no: String,
    pub email_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MmtContact {
    pub contact_person: String,
    pub mailing_address: String,
    pub telephone_no: String,
    pub email_address: String,
}

/// An uploaded file, addressed by storage path, URI, or both
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReference {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Executive summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveSummary {
    pub epep_compliance: EpepCompliance,
    pub complaints_management: ComplaintsManagement,
    pub sdmp: ComplianceGroup,
    pub accountability: ComplianceGroup,
    pub others: OthersGroup,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpepCompliance {
    pub safety: bool,
    pub social: bool,
    pub rehabilitation: bool,
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintsManagement {
    pub na_for_all: bool,
    pub complaint_receiving_setup: bool,
    pub case_investigation: bool,
    pub implementation_of_control: bool,
    pub communication_with_complainant_or_public: bool,
    pub complaint_documentation: bool,
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplianceState>,
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OthersGroup {
    pub specify: String,
    pub remarks: String,
}

// ---------------------------------------------------------------------------
// Process documentation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDocumentation {
    pub date_conducted: String,
    pub merged_methodology_or_other_activities: bool,
    pub ecc_conditions_checking: Activity,
    pub epep_commitments_checking: Activity,
    pub site_ocular_validation: Activity,
    pub site_sampling_validation: Activity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub mmt_members_involved: Vec<String>,
    pub methodology_used: String,
    pub remarks: String,
}

// ---------------------------------------------------------------------------
// Project location and impact management
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLocationCompliance {
    pub parameters: Vec<CoverageParameter>,
    pub other_components: Vec<CoverageParameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageParameter {
    pub name: String,
    pub specification: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub within_specs: Option<bool>,
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactManagementCompliance {
    pub construction_info: Vec<ConstructionInfo>,
    pub implementation_of_environmental_impact_control_strategies: Vec<ImpactControlStrategy>,
    pub overall_compliance_assessment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructionInfo {
    pub area_name: String,
    pub commitment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_provided: Option<bool>,
    pub comments: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactControlStrategy {
    pub env_component: String,
    pub potential_impact: String,
    pub mitigation_measure: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance: Option<ComplianceState>,
    pub remarks: String,
}

// ---------------------------------------------------------------------------
// Air, water and noise quality
// ---------------------------------------------------------------------------

/// Per-location air or water quality assessment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityImpactAssessment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarry: Option<LocationAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant: Option<LocationAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<LocationAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarry_and_plant: Option<LocationAssessment>,
}

impl QualityImpactAssessment {
    /// True when no location carries an assessment
    pub fn is_empty(&self) -> bool {
        self.quarry.is_none()
            && self.plant.is_none()
            && self.port.is_none()
            && self.quarry_and_plant.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationAssessment {
    pub location_description: String,
    pub parameters: Vec<ParameterReading>,
    pub sampling_date: String,
    pub weather_and_wind: String,
    pub explanation_for_confirmatory_sampling: String,
    pub overall_assessment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterReading {
    pub name: String,
    pub result: ReadingResult,
    pub eqpl: EqplThresholds,
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingResult {
    pub current: String,
    pub previous: String,
}

/// Environmental quality performance level thresholds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EqplThresholds {
    pub red_flag: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoiseQualityImpactAssessment {
    pub parameters: Vec<ParameterReading>,
    pub sampling_date: String,
    pub weather_and_wind: String,
    pub explanation_for_confirmatory_sampling: String,
    pub overall_assessment: QuarterlyAssessment,
    pub uploaded_files: Vec<FileReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyAssessment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_quarter: Option<QuarterAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_quarter: Option<QuarterAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_quarter: Option<QuarterAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fourth_quarter: Option<QuarterAssessment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterAssessment {
    pub year: String,
    pub assessment: String,
}

// ---------------------------------------------------------------------------
// Waste, chemical safety, complaints
// ---------------------------------------------------------------------------

/// Sentinel answers that replace a structured table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentinel {
    #[serde(rename = "N/A")]
    NotApplicable,
    #[serde(rename = "No significant impact")]
    NoSignificantImpact,
}

/// Either a sentinel answer or populated structured data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionOutcome<T> {
    Sentinel(Sentinel),
    Populated(T),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteManagement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarry: Option<SectionOutcome<Vec<WasteRow>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant: Option<SectionOutcome<Vec<WasteRow>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<SectionOutcome<Vec<WasteRow>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteRow {
    pub type_of_waste: String,
    pub ecc_epep_commitments: WasteCommitments,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adequate: Option<bool>,
    pub previous_record: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_generated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteCommitments {
    pub handling: bool,
    pub storage: bool,
    pub disposal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChemicalSafetyManagement {
    pub chemical_safety: SectionOutcome<ChemicalSafetyDetails>,
    pub health_safety_checked: bool,
    pub social_dev_checked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChemicalSafetyDetails {
    pub chemical_category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_management: Option<ComplianceState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training: Option<ComplianceState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handling: Option<ComplianceState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_preparedness: Option<ComplianceState>,
    pub others_specify: String,
    pub remarks: String,
}

/// Where a complaint was lodged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FiledLocation {
    #[serde(rename = "DENR")]
    Denr,
    #[serde(rename = "Company")]
    Company,
    #[serde(rename = "MMT")]
    Mmt,
    #[serde(rename = "Others")]
    Others,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    #[serde(rename = "isNA")]
    pub is_na: bool,
    pub date_filed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filed_location: Option<FiledLocation>,
    pub others_specify: String,
    pub nature_of_complaint: String,
    pub resolutions: String,
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub quarter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub items: Vec<RecommendationItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationItem {
    pub category: String,
    pub recommendation: String,
    pub commitment: String,
    pub status: String,
}
