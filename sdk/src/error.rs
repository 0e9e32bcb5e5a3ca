//! Error types for the OLI validation SDK.
//!
//! Content problems in attestation data (bad addresses, unknown categories,
//! malformed CSV rows) are never errors: they are reported as diagnostics, see
//! [`crate::diagnostics`]. The types here cover everything else:
//!
//! - [`ValidationError`] - Caller contract violations (empty input, bad options)
//! - [`CsvError`] - Reading and decoding CSV bytes
//! - [`ProjectsError`] - Fetching the project registry
//! - [`ConfigError`] - Environment configuration
//! - [`ServerError`] - HTTP API errors
//! - [`SdkError`] - Top-level umbrella used by the CLI
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Validation Errors
// =============================================================================

/// Structural precondition failures of the validation entry points.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Bulk validation requires at least one row.
    #[error("At least one row is required")]
    EmptyInput,

    /// Options that cannot be combined.
    #[error("Invalid validation options: {0}")]
    InvalidOptions(String),
}

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while reading CSV input before it reaches the parser.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode bytes.
    #[error("Failed to decode content: {0}")]
    EncodingError(String),

    /// Failed to write CSV output.
    #[error("Failed to write CSV: {0}")]
    WriteError(String),
}

// =============================================================================
// Project Registry Errors
// =============================================================================

/// Errors from the project registry fetcher.
///
/// `Clone` so that one in-flight fetch can hand its outcome to every waiter.
#[derive(Debug, Clone, Error)]
pub enum ProjectsError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Non-success status code.
    #[error("Project registry returned status {0}")]
    Status(u16),

    /// Payload could not be decoded.
    #[error("Invalid project list: {0}")]
    Decode(String),

    /// Caller-supplied resolver failed.
    #[error("Project resolver failed: {0}")]
    Resolver(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    /// Unknown mode profile name.
    #[error("Unknown mode '{0}' (expected 'simple' or 'advanced')")]
    UnknownMode(String),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Validation contract error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// CSV decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Top-level
// =============================================================================

/// Umbrella error for binaries and integrations.
#[derive(Debug, Error)]
pub enum SdkError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Projects(#[from] ProjectsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for validation entry points.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for CSV input operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for project registry operations.
pub type ProjectsResult<T> = Result<T, ProjectsError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Result type for the CLI.
pub type SdkResult<T> = Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // ValidationError -> ServerError -> SdkError
        let server_err: ServerError = ValidationError::EmptyInput.into();
        assert!(server_err.to_string().contains("At least one row"));

        let sdk_err: SdkError = server_err.into();
        assert!(sdk_err.to_string().contains("At least one row"));

        // ProjectsError -> SdkError
        let sdk_err: SdkError = ProjectsError::Status(503).into();
        assert!(sdk_err.to_string().contains("503"));
    }

    #[test]
    fn test_config_error_format() {
        let err = ConfigError::InvalidValue {
            key: "OLI_MAX_ROWS".into(),
            value: "many".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("OLI_MAX_ROWS"));
        assert!(msg.contains("many"));
    }

    #[test]
    fn test_projects_error_is_clone() {
        let err = ProjectsError::Decode("bad json".into());
        let copy = err.clone();
        assert_eq!(err.to_string(), copy.to_string());
    }
}
