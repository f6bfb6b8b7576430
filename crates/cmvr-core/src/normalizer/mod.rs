//! Report normalization pipeline
//!
//! The pipeline is a set of independent section mappers composed by
//! [`transform_to_backend_dto`]. Each mapper takes a raw, possibly missing
//! section and returns either a normalized record or `None`; none of them
//! fail and none mutate their input.
//!
//! ```text
//! currentReport + generalInfo
//!        │
//!        ├── coerce        string / bool / number primitives
//!        ├── fallback      ordered alternate-source chains
//!        ├── permits       ECC, ISAG, EPEP, RCF/MTF/FMRDF
//!        ├── summary       executive summary, process documentation
//!        ├── coverage      project location, impact management
//!        ├── quality       air and water (four input shapes)
//!        ├── noise         noise readings and quarterly assessment
//!        ├── waste         solid/hazardous waste, chemical safety
//!        ├── complaints    complaints list
//!        └── assemble      BackendReportDto
//! ```

pub mod assemble;
pub mod coerce;
pub mod complaints;
pub mod coverage;
pub mod fallback;
pub mod files;
pub mod noise;
pub mod permits;
pub mod quality;
pub mod recommendations;
pub mod summary;
pub mod waste;

pub use assemble::transform_to_backend_dto;
pub use complaints::build_complaints_list;
pub use coverage::{build_impact_management_compliance, build_project_location_compliance};
pub use noise::build_noise_quality_impact_assessment;
pub use permits::{
    build_ecc_entries, build_epep_entries, build_fund_entries, build_isag_entries, FundKind,
};
pub use quality::{
    build_air_quality_impact_assessment, build_water_quality_impact_assessment, QualityShape,
};
pub use summary::{
    transform_executive_summary, transform_process_documentation, ComplaintsChecklistItem,
};
pub use waste::{build_chemical_safety_section, build_waste_management_section};
