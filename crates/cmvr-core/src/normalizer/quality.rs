//! Air and water quality assessments
//!
//! Copyright (c) 2025 CMVR Team
//! Licensed under the Apache-2.0 license
//!
//! Both sections arrive in one of four historical shapes. There is no
//! discriminant tag; the shape is recognized by which keys are present,
//! checked in a fixed order (see [`QualityShape::detect`]). Every shape is
//! normalized onto the same [`LocationAssessment`] record.

use super::coerce::{coerce_boolean, has_meaningful_value, parse_first_number};
use super::fallback::{first_present, first_text};
use crate::types::{
    EqplThresholds, LocationAssessment, ParameterReading, QualityImpactAssessment, ReadingResult,
};
use serde_json::Value;
use tracing::{debug, warn};

/// Which assessment is being normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityMedium {
    Air,
    Water,
}

impl QualityMedium {
    /// Key of the single embedded object used by the second shape
    pub fn single_object_key(self) -> &'static str {
        match self {
            QualityMedium::Air => "airQuality",
            QualityMedium::Water => "waterQuality",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityMedium::Air => "air",
            QualityMedium::Water => "water",
        }
    }
}

/// Monitoring locations an assessment can be filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitoringLocation {
    Quarry,
    Plant,
    Port,
    QuarryAndPlant,
}

impl MonitoringLocation {
    pub const ALL: [MonitoringLocation; 4] = [
        MonitoringLocation::Quarry,
        MonitoringLocation::Plant,
        MonitoringLocation::Port,
        MonitoringLocation::QuarryAndPlant,
    ];

    /// Section keys that hold the location description in the shared-table shape
    fn description_keys(self) -> &'static [&'static str] {
        match self {
            Self::Quarry => &["quarry"],
            Self::Plant => &["plant"],
            Self::Port => &["port"],
            Self::QuarryAndPlant => &["quarryPlant", "quarryAndPlant"],
        }
    }

    /// Per-location object key in the old shape
    fn data_key(self) -> &'static str {
        match self {
            Self::Quarry => "quarryData",
            Self::Plant => "plantData",
            Self::Port => "portData",
            Self::QuarryAndPlant => "quarryPlantData",
        }
    }

    /// Description key under `data` in the generic shape
    fn input_key(self) -> &'static str {
        match self {
            Self::Quarry => "quarryInput",
            Self::Plant => "plantInput",
            Self::Port => "portInput",
            Self::QuarryAndPlant => "quarryPlantInput",
        }
    }

    /// Parse a selection label such as `"quarry"` or `"Quarry & Plant"`
    pub fn parse(label: &str) -> Option<Self> {
        let compact: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "quarry" => Some(Self::Quarry),
            "plant" => Some(Self::Plant),
            "port" => Some(Self::Port),
            "quarryplant" | "quarryandplant" => Some(Self::QuarryAndPlant),
            _ => None,
        }
    }

    fn slot(self, target: &mut QualityImpactAssessment) -> &mut Option<LocationAssessment> {
        match self {
            Self::Quarry => &mut target.quarry,
            Self::Plant => &mut target.plant,
            Self::Port => &mut target.port,
            Self::QuarryAndPlant => &mut target.quarry_and_plant,
        }
    }
}

/// The recognized input shapes, in detection order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityShape {
    /// Location descriptions as strings plus one shared `parameters` table
    SharedTable,
    /// A single `airQuality` / `waterQuality` object
    SingleObject,
    /// `quarryData` / `plantData` / `portData` / `quarryPlantData` objects
    PerLocation,
    /// `selectedLocations` + `data` + `parameters` + `ports`
    Generic,
}

impl QualityShape {
    /// Detect the shape by key presence
    pub fn detect(section: &Value, medium: QualityMedium) -> Self {
        let holds_string = MonitoringLocation::ALL
            .iter()
            .flat_map(|loc| loc.description_keys())
            .any(|key| section.get(*key).is_some_and(Value::is_string));
        if holds_string {
            return Self::SharedTable;
        }

        if section
            .get(medium.single_object_key())
            .is_some_and(Value::is_object)
        {
            return Self::SingleObject;
        }

        let has_location_data = MonitoringLocation::ALL
            .iter()
            .any(|loc| section.get(loc.data_key()).is_some_and(Value::is_object));
        if has_location_data {
            return Self::PerLocation;
        }

        Self::Generic
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SharedTable => "shared-table",
            Self::SingleObject => "single-object",
            Self::PerLocation => "per-location",
            Self::Generic => "generic",
        }
    }
}

/// Map one parameter row; rows with no meaningful field are dropped
pub fn map_parameter_reading(entry: &Value) -> Option<ParameterReading> {
    if !entry.is_object() {
        return None;
    }

    let reading = ParameterReading {
        name: first_text(entry, &["name", "parameter"]),
        result: ReadingResult {
            current: first_text(entry, &["result.current", "currentResult", "current", "currentSMR"]),
            previous: first_text(
                entry,
                &["result.previous", "previousResult", "previous", "previousSMR"],
            ),
        },
        eqpl: EqplThresholds {
            red_flag: first_text(entry, &["eqpl.redFlag", "redFlag", "eqplRedFlag"]),
            action: first_text(entry, &["eqpl.action", "action"]),
            limit: first_present(entry, &["eqpl.limit", "limit", "denrStandard"])
                .and_then(parse_first_number),
        },
        remarks: first_text(entry, &["remarks", "remark"]),
    };

    let meaningful = !reading.name.is_empty()
        || !reading.result.current.is_empty()
        || !reading.result.previous.is_empty()
        || !reading.eqpl.red_flag.is_empty()
        || !reading.eqpl.action.is_empty()
        || reading.eqpl.limit.is_some()
        || !reading.remarks.is_empty();
    meaningful.then_some(reading)
}

/// Map a parameter table
pub fn map_parameter_table(entries: Option<&Value>) -> Vec<ParameterReading> {
    entries
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(map_parameter_reading).collect())
        .unwrap_or_default()
}

/// Sampling metadata shared by every shape
#[derive(Debug, Clone, Default, PartialEq)]
struct SamplingMetadata {
    sampling_date: String,
    weather_and_wind: String,
    explanation: String,
    overall_assessment: String,
}

impl SamplingMetadata {
    /// Read from the first source that has each field
    fn read(sources: &[&Value]) -> Self {
        let pick = |keys: &[&str]| {
            sources
                .iter()
                .map(|source| first_text(source, keys))
                .find(|s| !s.is_empty())
                .unwrap_or_default()
        };
        Self {
            sampling_date: pick(&["samplingDate"]),
            weather_and_wind: pick(&["weatherAndWind", "weather"]),
            explanation: pick(&["explanationForConfirmatorySampling", "explanation"]),
            overall_assessment: pick(&["overallAssessment"]),
        }
    }

    fn into_assessment(
        self,
        location_description: String,
        parameters: Vec<ParameterReading>,
    ) -> LocationAssessment {
        LocationAssessment {
            location_description,
            parameters,
            sampling_date: self.sampling_date,
            weather_and_wind: self.weather_and_wind,
            explanation_for_confirmatory_sampling: self.explanation,
            overall_assessment: self.overall_assessment,
        }
    }
}

/// Locations named by `selectedLocations`, as an array of labels or a map of flags
fn selected_locations(section: &Value) -> Vec<MonitoringLocation> {
    let mut selected = Vec::new();
    let mut push = |loc: MonitoringLocation| {
        if !selected.contains(&loc) {
            selected.push(loc);
        }
    };

    match section.get("selectedLocations") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(MonitoringLocation::parse)
            .for_each(&mut push),
        Some(Value::Object(flags)) => flags
            .iter()
            .filter(|(_, flag)| coerce_boolean(flag))
            .filter_map(|(label, _)| MonitoringLocation::parse(label))
            .for_each(&mut push),
        Some(Value::String(label)) => {
            if let Some(loc) = MonitoringLocation::parse(label) {
                push(loc);
            }
        }
        _ => {}
    }
    selected
}

fn from_shared_table(section: &Value) -> QualityImpactAssessment {
    let selected = selected_locations(section);
    let parameters = map_parameter_table(section.get("parameters"));
    let metadata = SamplingMetadata::read(&[section]);

    let mut result = QualityImpactAssessment::default();
    for loc in MonitoringLocation::ALL {
        let description = first_text(section, loc.description_keys());
        if description.is_empty() && !selected.contains(&loc) {
            continue;
        }
        *loc.slot(&mut result) =
            Some(metadata.clone().into_assessment(description, parameters.clone()));
    }
    result
}

fn from_single_object(section: &Value, inner: &Value) -> QualityImpactAssessment {
    let mut targets = selected_locations(section);
    if targets.is_empty() {
        targets.push(MonitoringLocation::Quarry);
    }

    let assessment = SamplingMetadata::read(&[inner, section]).into_assessment(
        first_text(inner, &["locationDescription", "location"]),
        map_parameter_table(inner.get("parameters")),
    );

    let mut result = QualityImpactAssessment::default();
    for loc in targets {
        *loc.slot(&mut result) = Some(assessment.clone());
    }
    result
}

fn from_per_location(section: &Value) -> QualityImpactAssessment {
    let mut result = QualityImpactAssessment::default();
    for loc in MonitoringLocation::ALL {
        let Some(data) = section.get(loc.data_key()).filter(|d| d.is_object()) else {
            continue;
        };
        let assessment = SamplingMetadata::read(&[data, section]).into_assessment(
            first_text(data, &["locationDescription", "location", "description"]),
            map_parameter_table(data.get("parameters")),
        );
        *loc.slot(&mut result) = Some(assessment);
    }
    result
}

fn from_generic(section: &Value) -> QualityImpactAssessment {
    let selected = selected_locations(section);
    let data = section.get("data").filter(|d| d.is_object()).unwrap_or(&Value::Null);
    let shared_parameters = map_parameter_table(section.get("parameters"));
    let metadata = SamplingMetadata::read(&[data, section]);

    let mut result = QualityImpactAssessment::default();
    for loc in [
        MonitoringLocation::Quarry,
        MonitoringLocation::Plant,
        MonitoringLocation::QuarryAndPlant,
    ] {
        let description = first_text(data, &[loc.input_key()]);
        if description.is_empty() && !selected.contains(&loc) {
            continue;
        }
        *loc.slot(&mut result) =
            Some(metadata.clone().into_assessment(description, shared_parameters.clone()));
    }

    let ports: Vec<&Value> = section
        .get("ports")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|p| p.is_object()).collect())
        .unwrap_or_default();

    if ports.len() > 1 {
        warn!(
            ports = ports.len(),
            discarded = ports.len() - 1,
            "multiple ports supplied; only the last one is kept"
        );
    }

    for port in &ports {
        let own_parameters = map_parameter_table(port.get("parameters"));
        let parameters = if own_parameters.is_empty() {
            shared_parameters.clone()
        } else {
            own_parameters
        };
        result.port = Some(
            SamplingMetadata::read(&[*port, data, section])
                .into_assessment(first_text(port, &["name", "portName"]), parameters),
        );
    }

    if ports.is_empty() {
        let description = first_text(data, &[MonitoringLocation::Port.input_key()]);
        if !description.is_empty() || selected.contains(&MonitoringLocation::Port) {
            result.port = Some(metadata.into_assessment(description, shared_parameters));
        }
    }

    result
}

fn build_quality_assessment(
    section: Option<&Value>,
    medium: QualityMedium,
) -> Option<QualityImpactAssessment> {
    let section = section.filter(|s| s.is_object() && has_meaningful_value(s))?;

    let shape = QualityShape::detect(section, medium);
    debug!(medium = medium.as_str(), shape = shape.as_str(), "quality assessment shape detected");

    let result = match shape {
        QualityShape::SharedTable => from_shared_table(section),
        QualityShape::SingleObject => {
            let inner = section
                .get(medium.single_object_key())
                .unwrap_or(&Value::Null);
            from_single_object(section, inner)
        }
        QualityShape::PerLocation => from_per_location(section),
        QualityShape::Generic => from_generic(section),
    };

    (!result.is_empty()).then_some(result)
}

/// Normalize `airQualityImpactAssessment`
pub fn build_air_quality_impact_assessment(
    section: Option<&Value>,
) -> Option<QualityImpactAssessment> {
    build_quality_assessment(section, QualityMedium::Air)
}

/// Normalize `waterQualityImpactAssessment`
pub fn build_water_quality_impact_assessment(
    section: Option<&Value>,
) -> Option<QualityImpactAssessment> {
    build_quality_assessment(section, QualityMedium::Water)
}
