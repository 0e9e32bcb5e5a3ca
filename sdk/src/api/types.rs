//! REST API request and response bodies.
//!
//! Every validation response carries a fresh `validationId` and a `status`
//! (`ready`, `warning` or `error`) next to the full result.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::models::AttestationRow;
use crate::pipeline::{CsvValidationReport, ValidationStatus};
use crate::reference::ModeProfile;
use crate::validation::{BulkValidationResult, ValidationOptions};

/// Body of `POST /api/validate/rows`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRowsRequest {
    pub rows: Vec<AttestationRow>,
    /// `simple` or `advanced`
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub allowed_fields: Option<Vec<String>>,
    #[serde(default)]
    pub max_rows: Option<usize>,
}

/// Query string of `POST /api/validate/csv`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvQuery {
    #[serde(default)]
    pub mode: Option<String>,
    /// Comma separated field ids
    #[serde(default)]
    pub allowed_fields: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowsResponse {
    pub validation_id: String,
    pub status: ValidationStatus,
    #[serde(flatten)]
    pub result: BulkValidationResult,
}

impl From<BulkValidationResult> for RowsResponse {
    fn from(result: BulkValidationResult) -> Self {
        Self {
            validation_id: Uuid::new_v4().to_string(),
            status: ValidationStatus::from_diagnostics(&result.diagnostics),
            result,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvResponse {
    pub validation_id: String,
    /// Name of the uploaded file, when sent as multipart
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(flatten)]
    pub report: CsvValidationReport,
}

impl CsvResponse {
    pub fn new(report: CsvValidationReport, file_name: Option<String>) -> Self {
        Self {
            validation_id: Uuid::new_v4().to_string(),
            file_name,
            report,
        }
    }
}

/// Resolve the request's mode and field restriction on top of the server
/// defaults.
pub fn request_options(
    base: &ValidationOptions,
    mode: Option<&str>,
    allowed_fields: Option<Vec<String>>,
    max_rows: Option<usize>,
) -> ServerResult<ValidationOptions> {
    let mut options = base.clone();

    if let Some(name) = mode.map(str::trim).filter(|m| !m.is_empty()) {
        options.mode = ModeProfile::by_name(name)
            .ok_or_else(|| ServerError::BadRequest(format!("unknown mode '{}'", name)))?;
    }
    if let Some(fields) = allowed_fields {
        options = options.with_allowed_fields(fields);
    }
    if let Some(max_rows) = max_rows {
        options = options.with_max_rows(max_rows);
    }

    options.check()?;
    Ok(options)
}

/// Split `a, b,,c` into field ids.
pub fn split_fields(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "validationId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
    })
}
