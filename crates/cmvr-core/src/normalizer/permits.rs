//! Permit-entry builders for ECC, ISAG, EPEP and fund records
//!
//! Every builder follows the same rule: the primary record is kept when its
//! section is not flagged N/A and at least one mapped field is non-empty;
//! each additional form is kept on the same non-empty test, independently
//! of the primary's N/A flag. Primary first, then forms in input order.

use super::coerce::{coerce_boolean_opt, parse_first_number};
use super::fallback::{first_present, first_text};
use crate::types::{EccEntry, EpepEntry, FundEntry, IsagEntry};
use serde_json::Value;

/// The three fund sections that share the [`FundEntry`] shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundKind {
    /// Rehabilitation cash fund
    Rcf,
    /// Monitoring trust fund
    Mtf,
    /// Final mine rehabilitation and decommissioning fund
    Fmrdf,
}

impl FundKind {
    pub const ALL: [FundKind; 3] = [FundKind::Rcf, FundKind::Mtf, FundKind::Fmrdf];

    /// Report key of the primary record
    pub fn info_key(self) -> &'static str {
        match self {
            FundKind::Rcf => "rcfInfo",
            FundKind::Mtf => "mtfInfo",
            FundKind::Fmrdf => "fmrdfInfo",
        }
    }

    /// Report key of the additional forms array
    pub fn forms_key(self) -> &'static str {
        match self {
            FundKind::Rcf => "rcfAdditionalForms",
            FundKind::Mtf => "mtfAdditionalForms",
            FundKind::Fmrdf => "fmrdfAdditionalForms",
        }
    }
}

const PERMIT_HOLDER: &[&str] = &["permitHolderName", "permitHolder"];
const ISSUANCE: &[&str] = &["dateOfIssuance", "dateIssued"];

/// Collect primary + additional forms through one field mapper
///
/// `map` returns `None` when the record carries no meaningful field.
fn collect_entries<T>(
    report: &Value,
    info_key: &str,
    forms_key: &str,
    map: impl Fn(&Value) -> Option<T>,
) -> Vec<T> {
    let mut entries = Vec::new();

    if let Some(primary) = report.get(info_key).filter(|v| v.is_object()) {
        if coerce_boolean_opt(primary.get("isNA")) {
            tracing::debug!(section = info_key, "primary record flagged N/A, skipping");
        } else if let Some(entry) = map(primary) {
            entries.push(entry);
        }
    }

    if let Some(forms) = report.get(forms_key).and_then(Value::as_array) {
        entries.extend(forms.iter().filter(|f| f.is_object()).filter_map(&map));
    }

    entries
}

fn any_non_empty(fields: &[&String]) -> bool {
    fields.iter().any(|f| !f.is_empty())
}

fn map_ecc(record: &Value) -> Option<EccEntry> {
    let entry = EccEntry {
        permit_holder_name: first_text(record, PERMIT_HOLDER),
        ecc_number: first_text(record, &["eccNumber"]),
        date_of_issuance: first_text(record, ISSUANCE),
    };
    any_non_empty(&[&entry.permit_holder_name, &entry.ecc_number, &entry.date_of_issuance])
        .then_some(entry)
}

fn map_isag(record: &Value) -> Option<IsagEntry> {
    let entry = IsagEntry {
        permit_holder_name: first_text(record, PERMIT_HOLDER),
        isag_permit_number: first_text(record, &["isagPermitNumber", "isagNumber", "permitNumber"]),
        date_of_issuance: first_text(record, ISSUANCE),
    };
    any_non_empty(&[&entry.permit_holder_name, &entry.isag_permit_number, &entry.date_of_issuance])
        .then_some(entry)
}

fn map_epep(record: &Value) -> Option<EpepEntry> {
    let entry = EpepEntry {
        permit_holder_name: first_text(record, PERMIT_HOLDER),
        epep_number: first_text(record, &["epepNumber", "epepFmrdpNumber"]),
        date_of_approval: first_text(record, &["dateOfApproval", "dateApproved", "dateOfIssuance"]),
    };
    any_non_empty(&[&entry.permit_holder_name, &entry.epep_number, &entry.date_of_approval])
        .then_some(entry)
}

fn map_fund(record: &Value) -> Option<FundEntry> {
    let entry = FundEntry {
        permit_holder_name: first_text(record, PERMIT_HOLDER),
        savings_account_number: first_text(
            record,
            &["savingsAccountNumber", "savingsAccount", "accountNumber"],
        ),
        amount_deposited: first_present(record, &["amountDeposited", "amount"])
            .and_then(parse_first_number),
        date_updated: first_text(record, &["dateUpdated", "updatedDate"]),
    };
    // An unparseable amount is dropped from the entry, so it cannot keep it alive
    (entry.amount_deposited.is_some()
        || any_non_empty(&[
            &entry.permit_holder_name,
            &entry.savings_account_number,
            &entry.date_updated,
        ]))
    .then_some(entry)
}

/// ECC permits from `eccInfo` and `eccAdditionalForms`
pub fn build_ecc_entries(report: &Value) -> Vec<EccEntry> {
    collect_entries(report, "eccInfo", "eccAdditionalForms", map_ecc)
}

/// ISAG permits from `isagInfo` and `isagAdditionalForms`
pub fn build_isag_entries(report: &Value) -> Vec<IsagEntry> {
    collect_entries(report, "isagInfo", "isagAdditionalForms", map_isag)
}

/// EPEP approvals from `epepInfo` and `epepAdditionalForms`
pub fn build_epep_entries(report: &Value) -> Vec<EpepEntry> {
    collect_entries(report, "epepInfo", "epepAdditionalForms", map_epep)
}

/// Fund records for one of RCF, MTF or FMRDF
pub fn build_fund_entries(report: &Value, kind: FundKind) -> Vec<FundEntry> {
    collect_entries(report, kind.info_key(), kind.forms_key(), map_fund)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ecc_primary_with_single_field_is_kept() {
        let report = json!({
            "eccInfo": {"isNA": false, "permitHolder": "Acme", "eccNumber": "", "dateOfIssuance": ""}
        });
        let entries = build_ecc_entries(&report);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].permit_holder_name, "Acme");
        assert_eq!(entries[0].ecc_number, "");
    }

    #[test]
    fn test_ecc_primary_flagged_na_is_excluded() {
        let report = json!({
            "eccInfo": {"isNA": true, "permitHolder": "Acme", "eccNumber": "ECC-1", "dateOfIssuance": ""}
        });
        assert!(build_ecc_entries(&report).is_empty());
    }

    #[test]
    fn test_additional_forms_ignore_primary_na_flag() {
        let report = json!({
            "eccInfo": {"isNA": true, "permitHolder": "Acme"},
            "eccAdditionalForms": [
                {"permitHolder": "Beta", "eccNumber": "ECC-2"},
                {"permitHolder": "", "eccNumber": "  "},
                "not-an-object",
                {"eccNumber": "ECC-3"}
            ]
        });
        let entries = build_ecc_entries(&report);
        let numbers: Vec<_> = entries.iter().map(|e| e.ecc_number.as_str()).collect();
        assert_eq!(numbers, vec!["ECC-2", "ECC-3"]);
    }

    #[test]
    fn test_primary_comes_first() {
        let report = json!({
            "isagAdditionalForms": [{"isagPermitNumber": "ISAG-2"}],
            "isagInfo": {"permitHolderName": "Acme", "isagNumber": "ISAG-1"}
        });
        let entries = build_isag_entries(&report);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].isag_permit_number, "ISAG-1");
        assert_eq!(entries[1].isag_permit_number, "ISAG-2");
    }

    #[test]
    fn test_isna_string_flag_is_coerced() {
        let report = json!({"epepInfo": {"isNA": "yes", "epepNumber": "EPEP-1"}});
        assert!(build_epep_entries(&report).is_empty());

        let report = json!({"epepInfo": {"isNA": "no", "epepNumber": "EPEP-1", "dateApproved": "2024-02-01"}});
        let entries = build_epep_entries(&report);
        assert_eq!(entries[0].date_of_approval, "2024-02-01");
    }

    #[test]
    fn test_fund_amount_is_parsed() {
        let report = json!({
            "rcfInfo": {"permitHolder": "Acme", "savingsAccount": "001-22", "amountDeposited": "PHP 50,000.00"},
            "rcfAdditionalForms": [{"amount": "12.5 thousand"}, {"permitHolder": "Beta", "amount": "TBD"}]
        });
        let entries = build_fund_entries(&report, FundKind::Rcf);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].amount_deposited, Some(50000.0));
        assert_eq!(entries[0].savings_account_number, "001-22");
        assert_eq!(entries[1].amount_deposited, Some(12.5));
        assert_eq!(entries[2].permit_holder_name, "Beta");
        assert_eq!(entries[2].amount_deposited, None);
    }

    #[test]
    fn test_fund_with_only_unparseable_amount_is_dropped() {
        let report = json!({
            "rcfInfo": {"amountDeposited": "TBD"},
            "rcfAdditionalForms": [{"amount": "pending"}, {"amount": ""}]
        });
        assert!(build_fund_entries(&report, FundKind::Rcf).is_empty());
    }

    #[test]
    fn test_fund_kinds_read_their_own_keys() {
        let report = json!({
            "mtfInfo": {"permitHolder": "Mtf Holder"},
            "fmrdfAdditionalForms": [{"permitHolder": "Fmrdf Holder"}]
        });
        assert!(build_fund_entries(&report, FundKind::Rcf).is_empty());
        assert_eq!(build_fund_entries(&report, FundKind::Mtf)[0].permit_holder_name, "Mtf Holder");
        assert_eq!(build_fund_entries(&report, FundKind::Fmrdf)[0].permit_holder_name, "Fmrdf Holder");
    }

    #[test]
    fn test_missing_sections_yield_empty_lists() {
        let report = json!({});
        assert!(build_ecc_entries(&report).is_empty());
        assert!(build_isag_entries(&report).is_empty());
        assert!(build_epep_entries(&report).is_empty());
    }
}
