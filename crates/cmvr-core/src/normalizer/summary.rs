//! Executive summary and process documentation mappers

use super::coerce::{
    coerce_boolean, coerce_boolean_opt, has_meaningful_value, interpret_compliance_state,
    sanitize_string,
};
use super::fallback::{first_present, first_text, lookup};
use crate::types::{
    Activity, ComplaintsManagement, ComplianceGroup, ComplianceState, EpepCompliance,
    ExecutiveSummary, OthersGroup, ProcessDocumentation,
};
use serde_json::Value;

/// The complaints-management checklist, in display order
///
/// Shared by the form layer and the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplaintsChecklistItem {
    ComplaintReceivingSetup,
    CaseInvestigation,
    ImplementationOfControl,
    CommunicationWithComplainantOrPublic,
    ComplaintDocumentation,
}

impl ComplaintsChecklistItem {
    pub const ALL: [ComplaintsChecklistItem; 5] = [
        ComplaintsChecklistItem::ComplaintReceivingSetup,
        ComplaintsChecklistItem::CaseInvestigation,
        ComplaintsChecklistItem::ImplementationOfControl,
        ComplaintsChecklistItem::CommunicationWithComplainantOrPublic,
        ComplaintsChecklistItem::ComplaintDocumentation,
    ];

    /// Form-state key of the checkbox
    pub fn key(self) -> &'static str {
        match self {
            Self::ComplaintReceivingSetup => "complaintReceivingSetup",
            Self::CaseInvestigation => "caseInvestigation",
            Self::ImplementationOfControl => "implementationOfControl",
            Self::CommunicationWithComplainantOrPublic => "communicationWithComplainantOrPublic",
            Self::ComplaintDocumentation => "complaintDocumentation",
        }
    }

    /// Label shown next to the checkbox
    pub fn label(self) -> &'static str {
        match self {
            Self::ComplaintReceivingSetup => "Complaint receiving set-up",
            Self::CaseInvestigation => "Case investigation",
            Self::ImplementationOfControl => "Implementation of control",
            Self::CommunicationWithComplainantOrPublic => "Communication with complainant/public",
            Self::ComplaintDocumentation => "Complaint documentation",
        }
    }

    fn slot(self, target: &mut ComplaintsManagement) -> &mut bool {
        match self {
            Self::ComplaintReceivingSetup => &mut target.complaint_receiving_setup,
            Self::CaseInvestigation => &mut target.case_investigation,
            Self::ImplementationOfControl => &mut target.implementation_of_control,
            Self::CommunicationWithComplainantOrPublic => {
                &mut target.communication_with_complainant_or_public
            }
            Self::ComplaintDocumentation => &mut target.complaint_documentation,
        }
    }
}

/// Compliance state from a plain value or a `{complied, notComplied}` pair
fn compliance_state(value: &Value) -> Option<ComplianceState> {
    match value {
        Value::Object(map) => {
            let complied = map.get("complied").map(coerce_boolean).unwrap_or(false);
            let not_complied = map.get("notComplied").map(coerce_boolean).unwrap_or(false);
            if complied {
                Some(ComplianceState::Complied)
            } else if not_complied {
                Some(ComplianceState::NotComplied)
            } else {
                map.get("status").and_then(interpret_compliance_state)
            }
        }
        other => interpret_compliance_state(other),
    }
}

fn compliance_group(section: &Value, group: &str) -> ComplianceGroup {
    let compliance_key = format!("{group}Compliance");
    let remarks_key = format!("{group}Remarks");

    let status = [lookup(section, group), section.get(&compliance_key)]
        .into_iter()
        .flatten()
        .find_map(compliance_state);

    let remarks = section
        .get(group)
        .filter(|g| g.is_object())
        .map(|g| first_text(g, &["remarks"]))
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| first_text(section, &[remarks_key.as_str()]));

    ComplianceGroup { status, remarks }
}

fn complaints_management(group: Option<&Value>) -> ComplaintsManagement {
    let mut result = ComplaintsManagement::default();
    let Some(group) = group.filter(|g| g.is_object()) else {
        return result;
    };

    result.na_for_all = first_present(group, &["naForAll", "isNAForAll", "naAll"])
        .map(coerce_boolean)
        .unwrap_or(false);

    let na_for_all = result.na_for_all;
    for item in ComplaintsChecklistItem::ALL {
        *item.slot(&mut result) = !na_for_all && coerce_boolean_opt(group.get(item.key()));
    }
    result.remarks = first_text(group, &["remarks"]);
    result
}

/// Flatten the executive summary checkbox groups
pub fn transform_executive_summary(section: Option<&Value>) -> Option<ExecutiveSummary> {
    let section = section.filter(|s| s.is_object() && has_meaningful_value(s))?;

    let epep = section.get("epepCompliance").unwrap_or(&Value::Null);
    let others = section.get("others").unwrap_or(&Value::Null);

    Some(ExecutiveSummary {
        epep_compliance: EpepCompliance {
            safety: coerce_boolean_opt(epep.get("safety")),
            social: coerce_boolean_opt(epep.get("social")),
            rehabilitation: coerce_boolean_opt(epep.get("rehabilitation")),
            remarks: first_text(epep, &["remarks"]),
        },
        complaints_management: complaints_management(section.get("complaintsManagement")),
        sdmp: compliance_group(section, "sdmp"),
        accountability: compliance_group(section, "accountability"),
        others: OthersGroup {
            specify: first_text(others, &["specify"]),
            remarks: first_text(others, &["remarks"]),
        },
    })
}

/// The four documented activity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    EccConditionsChecking,
    EpepCommitmentsChecking,
    SiteOcularValidation,
    SiteSamplingValidation,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 4] = [
        ActivityKind::EccConditionsChecking,
        ActivityKind::EpepCommitmentsChecking,
        ActivityKind::SiteOcularValidation,
        ActivityKind::SiteSamplingValidation,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::EccConditionsChecking => "eccConditionsChecking",
            Self::EpepCommitmentsChecking => "epepCommitmentsChecking",
            Self::SiteOcularValidation => "siteOcularValidation",
            Self::SiteSamplingValidation => "siteSamplingValidation",
        }
    }
}

/// Split free text on commas, semicolons and newlines
pub fn split_member_text(text: &str) -> Vec<String> {
    text.split([',', ';', '\n', '\r'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn member_name(entry: &Value) -> String {
    match entry {
        Value::Object(_) => first_text(entry, &["name", "fullName", "memberName"]),
        other => sanitize_string(other),
    }
}

/// Prefer an explicitly structured member list over the parsed fallback
pub fn resolve_members(structured: Option<&Value>, fallback: Vec<String>) -> Vec<String> {
    let structured: Vec<String> = structured
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(member_name)
                .filter(|n| !n.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if structured.is_empty() {
        fallback
    } else {
        structured
    }
}

fn activity(section: &Value, report: &Value, kind: ActivityKind) -> Activity {
    let key = kind.key();
    let nested = section.get(key).filter(|v| v.is_object());
    let flat_keys = [format!("{key}Members"), format!("{key}MembersInvolved")];
    let members_text = first_text(section, &[flat_keys[0].as_str(), flat_keys[1].as_str()]);
    let members_text = if members_text.is_empty() {
        nested.map(|n| first_text(n, &["membersInvolved"])).unwrap_or_default()
    } else {
        members_text
    };

    let additional_key = format!("{key}AdditionalMembers");
    let additional = section
        .get(&additional_key)
        .filter(|v| has_meaningful_value(v))
        .or_else(|| report.get(&additional_key))
        .and_then(Value::as_array);

    let mut fallback = split_member_text(&members_text);
    if let Some(additional) = additional {
        fallback.extend(
            additional
                .iter()
                .map(member_name)
                .filter(|n| !n.is_empty()),
        );
    }

    let nested_value = nested.unwrap_or(&Value::Null);
    Activity {
        mmt_members_involved: resolve_members(nested_value.get("mmtMembersInvolved"), fallback),
        methodology_used: first_text(nested_value, &["methodologyUsed", "methodology"]),
        remarks: first_text(nested_value, &["remarks"]),
    }
}

/// Merge member lists and activity details for all four activity kinds
///
/// `report` is the enclosing report, searched for sibling
/// `*AdditionalMembers` arrays when the section has none.
pub fn transform_process_documentation(
    section: Option<&Value>,
    report: &Value,
) -> Option<ProcessDocumentation> {
    let section = section.filter(|s| s.is_object() && has_meaningful_value(s))?;

    let [ecc, epep, ocular, sampling] = ActivityKind::ALL.map(|kind| activity(section, report, kind));

    Some(ProcessDocumentation {
        date_conducted: first_text(section, &["dateConducted"]),
        merged_methodology_or_other_activities: first_present(
            section,
            &["mergedMethodologyOrOtherActivities", "mergedMethodology"],
        )
        .map(coerce_boolean)
        .unwrap_or(false),
        ecc_conditions_checking: ecc,
        epep_commitments_checking: epep,
        site_ocular_validation: ocular,
        site_sampling_validation: sampling,
    })
}
