//! Recommendations carried between quarters

use super::coerce::{parse_first_number, sanitize_string};
use super::fallback::{first_present, first_text};
use crate::types::{RecommendationItem, Recommendations};
use serde_json::Value;

fn recommendation_item(entry: &Value) -> Option<RecommendationItem> {
    let item = match entry {
        Value::String(_) => RecommendationItem {
            recommendation: sanitize_string(entry),
            ..RecommendationItem::default()
        },
        Value::Object(_) => RecommendationItem {
            category: first_text(entry, &["category"]),
            recommendation: first_text(entry, &["recommendation", "text"]),
            commitment: first_text(entry, &["commitment"]),
            status: first_text(entry, &["status"]),
        },
        _ => return None,
    };

    let meaningful = !item.category.is_empty()
        || !item.recommendation.is_empty()
        || !item.commitment.is_empty()
        || !item.status.is_empty();
    meaningful.then_some(item)
}

fn recommendations(block: &Value) -> Option<Recommendations> {
    if !block.is_object() {
        return None;
    }
    let items: Vec<_> = first_present(block, &["items", "recommendations"])
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(recommendation_item).collect())
        .unwrap_or_default();

    let result = Recommendations {
        quarter: first_text(block, &["quarter"]),
        year: first_present(block, &["year"])
            .and_then(parse_first_number)
            .map(|y| y as i32),
        items,
    };

    (!result.items.is_empty() || !result.quarter.is_empty() || result.year.is_some())
        .then_some(result)
}

/// Previous-quarter and next-quarter recommendations from `recommendationsData`
pub fn build_recommendations(
    data: Option<&Value>,
) -> (Option<Recommendations>, Option<Recommendations>) {
    let Some(data) = data.filter(|d| d.is_object()) else {
        return (None, None);
    };

    let previous = first_present(data, &["previousQuarter", "prevQuarter"]).and_then(recommendations);
    let next = first_present(data, &["currentQuarter", "nextQuarter"]).and_then(recommendations);
    (previous, next)
}
