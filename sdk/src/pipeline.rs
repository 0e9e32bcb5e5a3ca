//! CSV in, validated batch out.
//!
//! Combines the two stages a CSV upload goes through:
//!
//! 1. [`parse_csv`](crate::parser::parse_csv) maps headers, converts aliases
//!    and runs the reference checks
//! 2. [`validate_bulk`](crate::validation::validate_bulk) runs the full row
//!    validator and the row ceiling
//!
//! Both stages report some of the same findings; the merged diagnostics are
//! de-duplicated.
//!
//! # Example
//!
//! ```rust
//! use oli::{validate_csv, ValidationOptions};
//!
//! let csv = "origin_key,address\nmainnet,0x1234567890123456789012345678901234567890\n";
//! let report = validate_csv(csv, &ValidationOptions::default());
//!
//! assert!(report.valid);
//! assert_eq!(report.rows[0].text("chain_id"), "eip155:1");
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::api::logs::{log_info, log_success, log_warning};
use crate::diagnostics::{codes, AttestationDiagnostics, Pointer};
use crate::error::{CsvResult, ValidationError};
use crate::models::AttestationRow;
use crate::parser::{parse_csv, parse_csv_bytes, CsvParseResult};
use crate::projects::{options_with_source, ProjectSource};
use crate::validation::{validate_bulk, ValidationOptions};

/// Overall outcome used by the CLI exit code and the HTTP `status` field.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// No errors, no warnings.
    Ready,
    /// Warnings only.
    Warning,
    Error,
}

impl ValidationStatus {
    pub fn from_diagnostics(diagnostics: &AttestationDiagnostics) -> Self {
        if diagnostics.has_errors() {
            Self::Error
        } else if !diagnostics.warnings.is_empty() {
            Self::Warning
        } else {
            Self::Ready
        }
    }
}

/// CSV file information
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: String,
    pub row_count: usize,
    pub columns: Vec<String>,
    pub header_map: BTreeMap<String, Option<String>>,
}

/// Result of validating a whole CSV document.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CsvValidationReport {
    pub valid: bool,
    pub status: ValidationStatus,
    pub csv_info: CsvInfo,
    pub rows: Vec<AttestationRow>,
    pub valid_rows: Vec<AttestationRow>,
    pub invalid_rows: Vec<usize>,
    pub diagnostics: AttestationDiagnostics,
}

/// Parse and validate CSV text.
pub fn validate_csv(text: &str, options: &ValidationOptions) -> CsvValidationReport {
    finish(parse_csv(text, options), options)
}

/// Decode (encoding auto-detected), parse and validate CSV bytes.
pub fn validate_csv_bytes(bytes: &[u8], options: &ValidationOptions) -> CsvResult<CsvValidationReport> {
    Ok(finish(parse_csv_bytes(bytes, options)?, options))
}

/// Resolve the project source, then read and validate a CSV file.
pub async fn validate_csv_file(
    path: impl AsRef<Path>,
    options: &ValidationOptions,
    source: &ProjectSource,
) -> CsvResult<CsvValidationReport> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    validate_csv_bytes(&bytes, &options_with_source(options, source).await)
}

fn finish(parsed: CsvParseResult, options: &ValidationOptions) -> CsvValidationReport {
    let csv_info = CsvInfo {
        encoding: parsed.encoding.clone(),
        delimiter: format_delimiter(parsed.delimiter).to_string(),
        row_count: parsed.rows.len(),
        columns: parsed.columns.clone(),
        header_map: parsed.header_map.clone(),
    };
    let mut diagnostics = parsed.diagnostics;

    let bulk = match validate_bulk(&parsed.rows, options) {
        Ok(bulk) => bulk,
        Err(e) => {
            // the report is only ever invalid through an error diagnostic
            if !diagnostics.has_errors() {
                let code = match e {
                    ValidationError::EmptyInput => codes::CSV_EMPTY,
                    ValidationError::InvalidOptions(_) => codes::OPTIONS_INVALID,
                };
                diagnostics.add_error(code, e.to_string(), Pointer::global());
            }
            log_warning("No rows to validate");
            return CsvValidationReport {
                valid: !diagnostics.has_errors(),
                status: ValidationStatus::from_diagnostics(&diagnostics),
                csv_info,
                rows: Vec::new(),
                valid_rows: Vec::new(),
                invalid_rows: Vec::new(),
                diagnostics,
            };
        }
    };

    diagnostics.merge(bulk.diagnostics);
    diagnostics.dedup();

    let valid = !diagnostics.has_errors();
    let status = ValidationStatus::from_diagnostics(&diagnostics);
    match status {
        ValidationStatus::Ready => log_success(format!("{} rows ready", bulk.valid_rows.len())),
        ValidationStatus::Warning => log_info(format!(
            "{} rows ready, {} warnings",
            bulk.valid_rows.len(),
            diagnostics.warnings.len()
        )),
        ValidationStatus::Error => log_warning(format!(
            "{} of {} rows have errors",
            bulk.invalid_rows.len(),
            bulk.rows.len()
        )),
    }

    CsvValidationReport {
        valid,
        status,
        csv_info,
        rows: bulk.rows,
        valid_rows: bulk.valid_rows,
        invalid_rows: bulk.invalid_rows,
        diagnostics,
    }
}

/// Format delimiter for display
fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectRecord;
    use std::io::Write;

    const ADDRESS: &str = "0x1234567890123456789012345678901234567890";

    #[test]
    fn test_csv_report_combines_stages() {
        let options = ValidationOptions::new()
            .with_projects(vec![ProjectRecord::new("growthepie").with_display_name("growthepie")]);
        let csv = format!(
            "chain_id,address,owner_project\n\
             eip155:1,{ADDRESS},growthpie\n\
             eip155:1,0x52908400098527886E0F7030069857D2E4169Ee7,growthepie\n"
        );
        let report = validate_csv(&csv, &options);

        assert!(!report.valid);
        assert_eq!(report.status, ValidationStatus::Error);
        assert_eq!(report.invalid_rows, vec![0, 1]);

        let codes: Vec<_> = report.diagnostics.errors.iter().map(|d| d.code.as_str()).collect();
        // PROJECT_INVALID is reported by both stages but kept once
        assert_eq!(codes, vec!["PROJECT_INVALID", "ADDRESS_INVALID"]);
    }

    #[test]
    fn test_structural_failure_yields_empty_report() {
        let report = validate_csv("contract_name\nRouter\n", &ValidationOptions::default());
        assert!(!report.valid);
        assert!(report.rows.is_empty());
        assert_eq!(report.diagnostics.errors[0].code, "CSV_MISSING_REQUIRED_COLUMNS");
    }

    #[test]
    fn test_blank_data_lines_report_csv_empty() {
        let report = validate_csv("chain_id,address\n,,\n", &ValidationOptions::default());
        assert!(!report.valid);
        assert_eq!(report.status, ValidationStatus::Error);
        let codes: Vec<_> = report.diagnostics.errors.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["CSV_EMPTY"]);
    }

    #[test]
    fn test_bad_options_surface_as_error_diagnostic() {
        let mut options = ValidationOptions::default();
        options.mode.allowed_fields.retain(|f| f != "address");
        let csv = format!("chain_id,address\neip155:1,{ADDRESS}\n");

        let report = validate_csv(&csv, &options);
        assert!(!report.valid);
        assert_eq!(report.status, ValidationStatus::Error);
        assert_eq!(report.diagnostics.errors.last().map(|d| d.code.as_str()), Some("OPTIONS_INVALID"));
    }

    #[test]
    fn test_warning_status() {
        let csv = format!("chain_id,address,banana\neip155:1,{ADDRESS},x\n");
        let report = validate_csv(&csv, &ValidationOptions::default());
        assert!(report.valid);
        assert_eq!(report.status, ValidationStatus::Warning);
        assert_eq!(report.csv_info.delimiter, ",");
    }

    #[tokio::test]
    async fn test_validate_file_with_project_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "chain_id;address;owner_project\neip155:8453;{ADDRESS};growthepie\n").unwrap();

        let source = ProjectSource::List(vec![ProjectRecord::new("growthepie")]);
        let report = validate_csv_file(file.path(), &ValidationOptions::default(), &source)
            .await
            .unwrap();

        assert!(report.valid, "{:?}", report.diagnostics);
        assert_eq!(report.status, ValidationStatus::Ready);
        assert_eq!(report.csv_info.delimiter, ";");
        assert_eq!(report.valid_rows.len(), 1);
    }
}
