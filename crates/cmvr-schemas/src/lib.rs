//! CMVR Schemas - JSON Schema and validation for the backend report DTO
//!
//! The backend accepts one canonical report document. This crate embeds its
//! JSON Schema (draft 2020-12) and layers the business rules the schema
//! cannot express on top of it.
//!
//! ## Quick Start
//!
//! ```rust
//! use cmvr_schemas::{validate_report, ValidationMode};
//! use serde_json::json;
//!
//! let result = validate_report(&json!({"companyName": "Acme"}), ValidationMode::Basic);
//! assert!(result.is_err());
//! ```
//!
//! ## Strict Rules
//!
//! - Every permit entry carries at least one populated field
//! - `year`, when present, lies within 1900..=2100
//! - A non-empty `quarter` names one of the four quarters
//! - A waste table is never an empty list; absent data uses a sentinel
//!
//! Copyright (c) 2025 CMVR Team
//! Licensed under the Apache-2.0 license

pub mod validation;

pub use validation::{
    report_validator, validate_report, ReportValidator, SchemaValidator, ValidationContext,
    ValidationError, ValidationErrors, ValidationHelpers, ValidationMode, ValidationResult,
    Violation, BACKEND_REPORT_SCHEMA,
};
