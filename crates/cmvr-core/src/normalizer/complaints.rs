//! Complaints verification and management

use super::coerce::{coerce_boolean, coerce_boolean_opt};
use super::fallback::first_text;
use crate::types::{Complaint, FiledLocation};
use serde_json::Value;

const LOCATION_FLAGS: [(&str, FiledLocation); 4] = [
    ("denr", FiledLocation::Denr),
    ("company", FiledLocation::Company),
    ("mmt", FiledLocation::Mmt),
    ("others", FiledLocation::Others),
];

/// Resolve where a complaint was filed, with any free text for `Others`
fn filed_location(entry: &Value) -> (Option<FiledLocation>, String) {
    let others_text = first_text(entry, &["othersSpecify", "otherLocation"]);

    match entry.get("filedLocation") {
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            let location = match trimmed.to_lowercase().as_str() {
                "" => None,
                "denr" => Some(FiledLocation::Denr),
                "company" => Some(FiledLocation::Company),
                "mmt" => Some(FiledLocation::Mmt),
                "others" | "other" => Some(FiledLocation::Others),
                _ => {
                    let specify = if others_text.is_empty() {
                        trimmed.to_string()
                    } else {
                        others_text
                    };
                    return (Some(FiledLocation::Others), specify);
                }
            };
            (location, others_text)
        }
        Some(flags @ Value::Object(_)) => {
            let location = LOCATION_FLAGS
                .iter()
                .find(|(key, _)| flags.get(*key).map(coerce_boolean).unwrap_or(false))
                .map(|(_, location)| *location);
            (location, others_text)
        }
        _ => (None, others_text),
    }
}

fn complaint(entry: &Value) -> Option<Complaint> {
    if !entry.is_object() {
        return None;
    }
    let (filed_location, others_specify) = filed_location(entry);
    let complaint = Complaint {
        is_na: false,
        date_filed: first_text(entry, &["dateFiled", "date"]),
        filed_location,
        others_specify,
        nature_of_complaint: first_text(entry, &["natureOfComplaint", "nature", "complaint"]),
        resolutions: first_text(entry, &["resolutions", "resolution", "actionTaken"]),
    };

    let meaningful = !complaint.date_filed.is_empty()
        || complaint.filed_location.is_some()
        || !complaint.others_specify.is_empty()
        || !complaint.nature_of_complaint.is_empty()
        || !complaint.resolutions.is_empty();
    meaningful.then_some(complaint)
}

fn not_applicable() -> Vec<Complaint> {
    vec![Complaint {
        is_na: true,
        ..Complaint::default()
    }]
}

/// Normalize `complaintsVerificationAndManagement` into a list
///
/// A truthy `isNA` anywhere at the top yields a single N/A entry.
pub fn build_complaints_list(section: Option<&Value>) -> Vec<Complaint> {
    match section {
        Some(Value::Array(items)) => {
            if items.iter().any(|item| coerce_boolean_opt(item.get("isNA"))) {
                return not_applicable();
            }
            items.iter().filter_map(complaint).collect()
        }
        Some(section @ Value::Object(_)) => {
            if coerce_boolean_opt(section.get("isNA")) {
                return not_applicable();
            }
            match section.get("complaints") {
                Some(Value::Array(items)) => items.iter().filter_map(complaint).collect(),
                _ => complaint(section).into_iter().collect(),
            }
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_section_is_empty() {
        assert!(build_complaints_list(None).is_empty());
        assert!(build_complaints_list(Some(&json!("none"))).is_empty());
    }

    #[test]
    fn test_na_yields_single_entry() {
        let list = build_complaints_list(Some(&json!({"isNA": true, "complaints": [{"dateFiled": "x"}]})));
        assert_eq!(list.len(), 1);
        assert!(list[0].is_na);
        assert_eq!(list[0].date_filed, "");

        let list = build_complaints_list(Some(&json!([{"isNA": "yes"}, {"natureOfComplaint": "Dust"}])));
        assert_eq!(list.len(), 1);
        assert!(list[0].is_na);
    }

    #[test]
    fn test_filed_location_variants() {
        let list = build_complaints_list(Some(&json!([
            {"filedLocation": "DENR", "natureOfComplaint": "Noise"},
            {"filedLocation": {"denr": false, "mmt": "checked"}, "natureOfComplaint": "Dust"},
            {"filedLocation": "Barangay hall", "natureOfComplaint": "Siltation"},
            {"filedLocation": "Others", "othersSpecify": "LGU", "natureOfComplaint": "Odor"},
            {"filedLocation": ""}
        ])));
        assert_eq!(list.len(), 4);
        assert_eq!(list[0].filed_location, Some(FiledLocation::Denr));
        assert_eq!(list[1].filed_location, Some(FiledLocation::Mmt));
        assert_eq!(list[2].filed_location, Some(FiledLocation::Others));
        assert_eq!(list[2].others_specify, "Barangay hall");
        assert_eq!(list[3].others_specify, "LGU");
    }

    #[test]
    fn test_single_complaint_object() {
        let list = build_complaints_list(Some(&json!({
            "dateFiled": "2024-04-02",
            "natureOfComplaint": "Blasting vibration",
            "resolution": "Adjusted blasting schedule"
        })));
        assert_eq!(list.len(), 1);
        assert!(!list[0].is_na);
        assert_eq!(list[0].resolutions, "Adjusted blasting schedule");
    }
}
