//! Solid/hazardous waste and chemical safety sections
//!
//! Each sub-area resolves to exactly one of: the N/A sentinel, the
//! no-significant-impact sentinel, or a populated table. Flags are checked
//! in that order.

use super::coerce::{
    coerce_boolean, coerce_boolean_opt, coerce_boolean_or_undefined, interpret_compliance_state,
    parse_first_number, sanitize_string,
};
use super::fallback::{first_present, first_text};
use crate::types::{
    ChemicalSafetyDetails, ChemicalSafetyManagement, ComplianceState, SectionOutcome, Sentinel,
    WasteCommitments, WasteManagement, WasteRow,
};
use serde_json::Value;

/// Sentinel expressed by a flag pair or by a legacy plain-text answer
fn sentinel(area: &Value) -> Option<Sentinel> {
    if let Value::String(text) = area {
        let text = text.trim().to_lowercase();
        return match text.as_str() {
            "n/a" | "na" | "not applicable" => Some(Sentinel::NotApplicable),
            "no significant impact" => Some(Sentinel::NoSignificantImpact),
            _ => None,
        };
    }

    if coerce_boolean_opt(area.get("isNA")) {
        Some(Sentinel::NotApplicable)
    } else if coerce_boolean_opt(area.get("noSignificantImpact")) {
        Some(Sentinel::NoSignificantImpact)
    } else {
        None
    }
}

fn waste_row(entry: &Value) -> Option<WasteRow> {
    if !entry.is_object() {
        return None;
    }
    let commitments = entry.get("eccEpepCommitments").unwrap_or(entry);
    let row = WasteRow {
        type_of_waste: first_text(entry, &["typeOfWaste", "wasteType"]),
        ecc_epep_commitments: WasteCommitments {
            handling: coerce_boolean_opt(commitments.get("handling")),
            storage: coerce_boolean_opt(commitments.get("storage")),
            disposal: coerce_boolean_opt(commitments.get("disposal")),
        },
        adequate: first_present(entry, &["adequate", "isAdequate"])
            .and_then(coerce_boolean_or_undefined),
        previous_record: first_text(entry, &["previousRecord"]),
        current_generated: first_present(entry, &["currentGenerated", "currentQuarterWaste"])
            .and_then(parse_first_number),
        total: first_present(entry, &["total"]).and_then(parse_first_number),
    };

    let c = &row.ecc_epep_commitments;
    let meaningful = !row.type_of_waste.is_empty()
        || c.handling
        || c.storage
        || c.disposal
        || row.adequate.is_some()
        || !row.previous_record.is_empty()
        || row.current_generated.is_some()
        || row.total.is_some();
    meaningful.then_some(row)
}

fn waste_area(area: &Value) -> Option<SectionOutcome<Vec<WasteRow>>> {
    if let Some(sentinel) = sentinel(area) {
        return Some(SectionOutcome::Sentinel(sentinel));
    }

    let rows: Vec<WasteRow> = match area {
        Value::Array(items) => items.iter().filter_map(waste_row).collect(),
        Value::Object(_) => first_present(area, &["table", "rows"])
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(waste_row).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    (!rows.is_empty()).then_some(SectionOutcome::Populated(rows))
}

/// Normalize `complianceWithGoodPracticeInSolidAndHazardousWasteManagement`
pub fn build_waste_management_section(section: Option<&Value>) -> Option<WasteManagement> {
    let section = section.filter(|s| s.is_object())?;

    if coerce_boolean_opt(section.get("isNA")) {
        let na = || Some(SectionOutcome::Sentinel(Sentinel::NotApplicable));
        return Some(WasteManagement {
            quarry: na(),
            plant: na(),
            port: na(),
        });
    }

    let area = |key: &str| section.get(key).and_then(waste_area);
    let result = WasteManagement {
        quarry: area("quarry"),
        plant: area("plant"),
        port: area("port"),
    };

    (result.quarry.is_some() || result.plant.is_some() || result.port.is_some()).then_some(result)
}

fn compliance_field(section: &Value, keys: &[&str]) -> Option<ComplianceState> {
    first_present(section, keys).and_then(interpret_compliance_state)
}

/// Normalize `complianceWithGoodPracticeInChemicalSafetyManagement`
pub fn build_chemical_safety_section(section: Option<&Value>) -> Option<ChemicalSafetyManagement> {
    let section = section.filter(|s| s.is_object())?;

    let details = section
        .get("chemicalSafety")
        .filter(|c| c.is_object() || c.is_string())
        .unwrap_or(section);

    let chemical_safety = match sentinel(details).or_else(|| sentinel(section)) {
        Some(sentinel) => SectionOutcome::Sentinel(sentinel),
        None => {
            let category = details
                .get("chemicalCategory")
                .map(|c| match c {
                    Value::Array(items) => items
                        .iter()
                        .map(sanitize_string)
                        .filter(|s| !s.is_empty())
                        .collect::<Vec<_>>()
                        .join(", "),
                    other => sanitize_string(other),
                })
                .unwrap_or_default();
            SectionOutcome::Populated(ChemicalSafetyDetails {
                chemical_category: category,
                risk_management: compliance_field(details, &["riskManagement"]),
                training: compliance_field(details, &["training"]),
                handling: compliance_field(details, &["handling"]),
                emergency_preparedness: compliance_field(
                    details,
                    &["emergencyPreparedness", "emergencyPreparednessAndResponse"],
                ),
                others_specify: first_text(details, &["othersSpecify", "others"]),
                remarks: first_text(details, &["remarks"]),
            })
        }
    };

    let health_safety_checked = section
        .get("healthSafetyChecked")
        .map(coerce_boolean)
        .unwrap_or(false);
    let social_dev_checked = section
        .get("socialDevChecked")
        .map(coerce_boolean)
        .unwrap_or(false);

    if let SectionOutcome::Populated(details) = &chemical_safety {
        let empty = details.chemical_category.is_empty()
            && details.risk_management.is_none()
            && details.training.is_none()
            && details.handling.is_none()
            && details.emergency_preparedness.is_none()
            && details.others_specify.is_empty()
            && details.remarks.is_empty();
        if empty && !health_safety_checked && !social_dev_checked {
            return None;
        }
    }

    Some(ChemicalSafetyManagement {
        chemical_safety,
        health_safety_checked,
        social_dev_checked,
    })
}
