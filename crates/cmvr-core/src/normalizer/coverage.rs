//! Project-location coverage and impact-management commitments

use super::coerce::{coerce_boolean_or_undefined, interpret_compliance_state, sanitize_string};
use super::fallback::{first_present, first_text};
use crate::types::{
    ConstructionInfo, CoverageParameter, ImpactControlStrategy, ImpactManagementCompliance,
    ProjectLocationCompliance,
};
use serde_json::Value;

/// Legacy named coverage rows, in report order
const LEGACY_PARAMETERS: &[(&str, &str)] = &[
    ("projectLocation", "Project Location"),
    ("projectArea", "Project Area (ha)"),
    ("capitalCost", "Capital Cost (Php)"),
    ("typeOfMinerals", "Type of Minerals"),
    ("miningMethod", "Mining Method"),
    ("production", "Production"),
    ("mineLife", "Mine Life"),
    ("mineralReservesResources", "Mineral Reserves/Resources"),
    ("primaryAccess", "Primary Access"),
];

fn coverage_row(entry: &Value, default_name: &str) -> Option<CoverageParameter> {
    let row = match entry {
        Value::Object(_) => {
            let name = first_text(entry, &["name", "parameter"]);
            CoverageParameter {
                name: if name.is_empty() { default_name.to_string() } else { name },
                specification: first_text(entry, &["specification", "specs"]),
                within_specs: first_present(entry, &["withinSpecs", "isWithinSpecs"])
                    .and_then(coerce_boolean_or_undefined),
                remarks: first_text(entry, &["remarks"]),
            }
        }
        Value::String(_) | Value::Number(_) => CoverageParameter {
            name: default_name.to_string(),
            specification: sanitize_string(entry),
            within_specs: None,
            remarks: String::new(),
        },
        _ => return None,
    };

    let meaningful = !row.specification.is_empty()
        || row.within_specs.is_some()
        || !row.remarks.is_empty()
        || (!row.name.is_empty() && row.name != default_name);
    meaningful.then_some(row)
}

fn coverage_rows(entries: Option<&Value>) -> Vec<CoverageParameter> {
    entries
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|e| coverage_row(e, "")).collect())
        .unwrap_or_default()
}

/// Coverage-limit rows from either the modern arrays or the legacy named keys
pub fn build_project_location_compliance(section: Option<&Value>) -> Option<ProjectLocationCompliance> {
    let section = section.filter(|s| s.is_object())?;

    let mut parameters = coverage_rows(section.get("parameters"));
    if parameters.is_empty() {
        parameters = LEGACY_PARAMETERS
            .iter()
            .filter_map(|(key, label)| section.get(*key).and_then(|v| coverage_row(v, label)))
            .collect();
    }
    let other_components = coverage_rows(section.get("otherComponents"));

    if parameters.is_empty() && other_components.is_empty() {
        return None;
    }
    Some(ProjectLocationCompliance {
        parameters,
        other_components,
    })
}

fn construction_row(entry: &Value) -> Option<ConstructionInfo> {
    if !entry.is_object() {
        return None;
    }
    let row = ConstructionInfo {
        area_name: first_text(entry, &["areaName", "area"]),
        commitment: first_text(entry, &["commitment", "projectPhase"]),
        is_provided: first_present(entry, &["isProvided", "provided"])
            .and_then(coerce_boolean_or_undefined),
        comments: first_text(entry, &["comments", "remarks"]),
    };
    let meaningful = !row.area_name.is_empty()
        || !row.commitment.is_empty()
        || row.is_provided.is_some()
        || !row.comments.is_empty();
    meaningful.then_some(row)
}

fn strategy_row(entry: &Value) -> Option<ImpactControlStrategy> {
    if !entry.is_object() {
        return None;
    }
    let row = ImpactControlStrategy {
        env_component: first_text(entry, &["envComponent", "environmentalComponent"]),
        potential_impact: first_text(entry, &["potentialImpact"]),
        mitigation_measure: first_text(entry, &["mitigationMeasure", "mitigationMeasures"]),
        compliance: first_present(entry, &["compliance", "isCompliant"])
            .and_then(interpret_compliance_state),
        remarks: first_text(entry, &["remarks"]),
    };
    let meaningful = !row.env_component.is_empty()
        || !row.potential_impact.is_empty()
        || !row.mitigation_measure.is_empty()
        || row.compliance.is_some()
        || !row.remarks.is_empty();
    meaningful.then_some(row)
}

/// Construction commitments and impact-control strategies
pub fn build_impact_management_compliance(
    section: Option<&Value>,
) -> Option<ImpactManagementCompliance> {
    let section = section.filter(|s| s.is_object())?;

    let construction_info: Vec<_> = section
        .get("constructionInfo")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(construction_row).collect())
        .unwrap_or_default();
    let strategies: Vec<_> = section
        .get("implementationOfEnvironmentalImpactControlStrategies")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(strategy_row).collect())
        .unwrap_or_default();
    let overall = first_text(section, &["overallComplianceAssessment", "overallAssessment"]);

    if construction_info.is_empty() && strategies.is_empty() && overall.is_empty() {
        return None;
    }
    Some(ImpactManagementCompliance {
        construction_info,
        implementation_of_environmental_impact_control_strategies: strategies,
        overall_compliance_assessment: overall,
    })
}
