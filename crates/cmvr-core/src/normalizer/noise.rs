//! Noise quality assessment

use super::coerce::sanitize_string;
use super::fallback::{first_text, lookup};
use super::files::normalize_files;
use super::quality::map_parameter_table;
use crate::types::{NoiseQualityImpactAssessment, QuarterAssessment, QuarterlyAssessment};
use serde_json::Value;

const QUARTERS: [&str; 4] = ["first", "second", "third", "fourth"];

/// A quarter given either as bare assessment text or `{year, assessment}`
fn quarter_assessment(value: &Value) -> Option<QuarterAssessment> {
    let quarter = match value {
        Value::Object(_) => QuarterAssessment {
            year: first_text(value, &["year"]),
            assessment: first_text(value, &["assessment", "text", "remarks"]),
        },
        Value::String(_) => QuarterAssessment {
            year: String::new(),
            assessment: sanitize_string(value),
        },
        _ => return None,
    };
    (!quarter.year.is_empty() || !quarter.assessment.is_empty()).then_some(quarter)
}

fn quarterly_assessment(section: &Value) -> QuarterlyAssessment {
    let [first, second, third, fourth] = QUARTERS.map(|name| {
        lookup(section, "quarters")
            .and_then(|q| q.get(name))
            .and_then(quarter_assessment)
            .or_else(|| section.get(name).and_then(quarter_assessment))
    });
    QuarterlyAssessment {
        first_quarter: first,
        second_quarter: second,
        third_quarter: third,
        fourth_quarter: fourth,
    }
}

/// Normalize `noiseQualityImpactAssessment`
pub fn build_noise_quality_impact_assessment(
    section: Option<&Value>,
) -> Option<NoiseQualityImpactAssessment> {
    let section = section.filter(|s| s.is_object())?;

    let overall_assessment = quarterly_assessment(section);
    let result = NoiseQualityImpactAssessment {
        parameters: map_parameter_table(section.get("parameters")),
        sampling_date: first_text(section, &["samplingDate"]),
        weather_and_wind: first_text(section, &["weatherAndWind", "weather"]),
        explanation_for_confirmatory_sampling: first_text(
            section,
            &["explanationForConfirmatorySampling", "explanation"],
        ),
        overall_assessment,
        uploaded_files: normalize_files(section.get("uploadedFiles")),
    };

    let quarters = &result.overall_assessment;
    let has_quarter = quarters.first_quarter.is_some()
        || quarters.second_quarter.is_some()
        || quarters.third_quarter.is_some()
        || quarters.fourth_quarter.is_some();
    let meaningful = !result.parameters.is_empty()
        || !result.sampling_date.is_empty()
        || !result.weather_and_wind.is_empty()
        || !result.explanation_for_confirmatory_sampling.is_empty()
        || has_quarter
        || !result.uploaded_files.is_empty();

    meaningful.then_some(result)
}
