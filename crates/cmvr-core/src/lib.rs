//! CMVR Core - Report normalization for compliance monitoring submissions
//!
//! This crate turns the loosely-structured report state collected by the
//! CMVR form screens into the single canonical DTO accepted by the backend.
//!
//! # Main Components
//!
//! - **Error Handling**: Edge errors for submission parsing using `thiserror` and `anyhow`
//! - **Core Types**: The backend DTO and every nested section record
//! - **Normalizer**: Coercion primitives, fallback chains and per-section mappers
//! - **Submission**: The envelope bundling report state, general info and creator id
//!
//! # Example
//!
//! ```
//! use cmvr_core::transform_to_backend_dto;
//! use serde_json::json;
//!
//! let report = json!({
//!     "eccInfo": {"isNA": false, "permitHolder": "Acme Mining", "eccNumber": "ECC-001"}
//! });
//! let general = json!({"companyName": "Acme", "year": "2024"});
//!
//! let dto = transform_to_backend_dto(&report, &general, "user-123").unwrap();
//! assert_eq!(dto.year, Some(2024));
//! assert_eq!(dto.ecc[0].ecc_number, "ECC-001");
//! ```

pub mod error;
pub mod normalizer;
pub mod submission;
pub mod types;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use normalizer::transform_to_backend_dto;
pub use submission::ReportSubmission;
pub use types::{
    // Top level
    BackendReportDto, ComplianceMonitoringReport, ComplianceState,

    // Permits and contacts
    EccEntry, IsagEntry, EpepEntry, FundEntry, ProponentContact, MmtContact, FileReference,

    // Narrative sections
    ExecutiveSummary, ProcessDocumentation, Activity,

    // Environmental sections
    QualityImpactAssessment, LocationAssessment, ParameterReading,
    NoiseQualityImpactAssessment, WasteManagement, ChemicalSafetyManagement,
    SectionOutcome, Sentinel, Complaint, FiledLocation, Recommendations,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
