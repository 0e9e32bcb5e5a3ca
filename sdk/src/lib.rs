//! # OLI SDK - Open Labels Initiative attestation validation
//!
//! Validates, normalizes and prepares OLI label attestations coming from a CSV
//! upload or a form, before they are signed and submitted.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Validator  │────▶│ Rows + Diag │
//! │  (ISO/UTF8) │     │ (auto-map)  │     │ (row, bulk) │     │  (4 buckets)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                ▲
//!                                         project registry
//!                                          (cached fetch)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use oli::{validate_row, AttestationRow, ValidationOptions};
//!
//! let row = AttestationRow::from_pairs([
//!     ("address", "eip155:8453:0x1234567890123456789012345678901234567890"),
//!     ("usage_category", "dex"),
//! ]);
//! let result = validate_row(&row, &ValidationOptions::default());
//!
//! assert!(result.valid);
//! assert_eq!(result.row.text("chain_id"), "eip155:8453");
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Attestation rows and project records
//! - [`reference`] - Chains, categories, form fields and mode profiles
//! - [`caip`] - CAIP-2/CAIP-10 parsing and EIP-55 checksums
//! - [`fuzzy`] - Alias conversion and ranked suggestions
//! - [`diagnostics`] - Diagnostic buckets and index remapping
//! - [`validation`] - Row and bulk validators
//! - [`parser`] - CSV parsing with auto-detection
//! - [`pipeline`] - Parse + validate in one call
//! - [`projects`] - Project registry sources
//! - [`cache`] - Shared project list cache
//! - [`config`] - Environment configuration
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Reference data
pub mod reference;

// Identifiers and matching
pub mod caip;
pub mod fuzzy;

// Diagnostics
pub mod diagnostics;

// Validation
pub mod validation;

// Parsing
pub mod parser;
pub mod pipeline;

// Project registry
pub mod projects;
pub mod cache;

// Configuration
pub mod config;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError,
    CsvError,
    ProjectsError,
    SdkError,
    ServerError,
    ValidationError,
    SdkResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{AttestationInput, AttestationRow, ProjectRecord};

// =============================================================================
// Re-exports - Reference data
// =============================================================================

pub use reference::{
    ChainMetadata,
    CategoryDefinition,
    ModeProfile,
    PaymasterCategory,
    CATEGORIES,
    CHAINS,
    FORM_FIELDS,
    PAYMASTER_CATEGORIES,
};

// =============================================================================
// Re-exports - CAIP
// =============================================================================

pub use caip::{build_caip10, parse_caip10, to_checksum_address, Caip10};

// =============================================================================
// Re-exports - Fuzzy matching
// =============================================================================

pub use fuzzy::{
    convert_category_alias,
    convert_chain_id,
    convert_paymaster_alias,
    get_project_validation,
    suggest_categories,
    suggest_chains,
    suggest_paymaster_categories,
    suggest_projects,
};

// =============================================================================
// Re-exports - Diagnostics
// =============================================================================

pub use diagnostics::{
    remap_diagnostics,
    AttestationDiagnostics,
    Diagnostic,
    Pointer,
    RemapMode,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    validate_bulk,
    validate_field,
    validate_row,
    BulkValidationResult,
    RowValidationResult,
    ValidationOptions,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_delimiter,
    detect_encoding,
    parse_csv,
    parse_csv_bytes,
    parse_csv_file,
    write_csv,
    CsvParseResult,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{
    validate_csv,
    validate_csv_bytes,
    validate_csv_file,
    CsvInfo,
    CsvValidationReport,
    ValidationStatus,
};

// =============================================================================
// Re-exports - Project registry
// =============================================================================

pub use projects::{
    parse_csv_async,
    resolve_projects,
    validate_bulk_async,
    validate_row_async,
    ProjectClient,
    ProjectSource,
};

pub use cache::ProjectCache;

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::SdkConfig;

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
