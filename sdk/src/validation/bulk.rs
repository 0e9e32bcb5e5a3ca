//! Multi-row validation with the submission ceiling.

use serde::Serialize;
use serde_json::Value;

use crate::api::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::diagnostics::{codes, AttestationDiagnostics, Pointer};
use crate::error::{ValidationError, ValidationResult};
use crate::models::AttestationRow;

use super::row::validate_row_at;
use super::ValidationOptions;

/// Outcome of validating a batch.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkValidationResult {
    pub valid: bool,
    /// Every input row after normalization, same order and length as the input.
    pub rows: Vec<AttestationRow>,
    /// Rows without row-scoped errors.
    pub valid_rows: Vec<AttestationRow>,
    /// Indices into `rows` that carry at least one error.
    pub invalid_rows: Vec<usize>,
    pub diagnostics: AttestationDiagnostics,
}

/// Validate every row. Blank rows are skipped when there is more than one row.
///
/// Fails only on an empty input or options that fail
/// [`ValidationOptions::check`]; a batch whose valid rows exceed
/// `options.max_rows` gets a global `BULK_ROW_LIMIT_EXCEEDED` error.
pub fn validate_bulk(
    rows: &[AttestationRow],
    options: &ValidationOptions,
) -> ValidationResult<BulkValidationResult> {
    options.check()?;
    if rows.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    let mut diagnostics = AttestationDiagnostics::new();
    let mut out_rows = Vec::with_capacity(rows.len());
    let mut valid_rows = Vec::new();
    let mut invalid_rows = Vec::new();
    let skip_blank = rows.len() > 1;

    for (index, row) in rows.iter().enumerate() {
        if skip_blank && row.is_blank() {
            out_rows.push(row.clone());
            continue;
        }

        let result = validate_row_at(row, index, options);
        if result.diagnostics.has_row_errors(index) {
            log_info_indent(
                format!("Row {}: {} errors", index, result.diagnostics.errors.len()),
                1,
            );
            invalid_rows.push(index);
        } else {
            valid_rows.push(result.row.clone());
        }
        out_rows.push(result.row);
        diagnostics.merge(result.diagnostics);
    }

    if valid_rows.len() > options.max_rows {
        diagnostics.add_error(
            codes::BULK_ROW_LIMIT_EXCEEDED,
            format!(
                "{} valid rows exceed the limit of {} per submission",
                valid_rows.len(),
                options.max_rows
            ),
            Pointer::global()
                .with_metadata("maxRows", Value::from(options.max_rows))
                .with_metadata("validRows", Value::from(valid_rows.len())),
        );
    }

    let valid = !diagnostics.has_errors();
    log_info(format!(
        "Validated {} rows: {} valid, {} invalid",
        rows.len(),
        valid_rows.len(),
        invalid_rows.len()
    ));
    if valid {
        log_success("Batch is ready to attest");
    } else {
        log_warning(format!("{} errors found", diagnostics.errors.len()));
    }

    Ok(BulkValidationResult {
        valid,
        rows: out_rows,
        valid_rows,
        invalid_rows,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(i: usize) -> AttestationRow {
        AttestationRow::from_pairs([
            ("chain_id", "eip155:1".to_string()),
            ("address", format!("0x{:040x}", i + 1)),
        ])
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let result = validate_bulk(&[], &ValidationOptions::default());
        assert!(matches!(result, Err(ValidationError::EmptyInput)));
    }

    #[test]
    fn test_mixed_batch() {
        let bad = AttestationRow::from_pairs([("chain_id", "eip155:1"), ("address", "0x12")]);
        let rows = vec![row(0), bad, row(2)];
        let result = validate_bulk(&rows, &ValidationOptions::default()).unwrap();

        assert!(!result.valid);
        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.valid_rows.len(), 2);
        assert_eq!(result.invalid_rows, vec![1]);
        assert_eq!(result.diagnostics.errors[0].row, Some(1));
    }

    #[test]
    fn test_blank_rows_skipped_in_batches() {
        let rows = vec![row(0), AttestationRow::new(), row(1)];
        let result = validate_bulk(&rows, &ValidationOptions::default()).unwrap();
        assert!(result.valid);
        assert_eq!(result.valid_rows.len(), 2);
        assert!(result.invalid_rows.is_empty());
    }

    #[test]
    fn test_rows_after_blank_keep_input_position() {
        let bad = AttestationRow::from_pairs([("chain_id", "eip155:1"), ("address", "0x12")]);
        let rows = vec![row(0), AttestationRow::new(), bad];
        let result = validate_bulk(&rows, &ValidationOptions::default()).unwrap();

        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.invalid_rows, vec![2]);
        let error_rows: Vec<_> = result.diagnostics.errors.iter().map(|d| d.row).collect();
        assert_eq!(error_rows, vec![Some(2)]);
        assert!(result.rows[1].is_blank());
    }

    #[test]
    fn test_invalid_rows_are_logged_indented() {
        use crate::api::logs::{LogLevel, LOG_BROADCASTER};
        use tokio::sync::broadcast::error::TryRecvError;

        let mut rx = LOG_BROADCASTER.subscribe();
        let bad = AttestationRow::from_pairs([("chain_id", "eip155:1"), ("address", "0x12")]);
        validate_bulk(&[bad], &ValidationOptions::default()).unwrap();

        let mut entries = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(entry) => entries.push(entry),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        assert!(entries
            .iter()
            .any(|e| e.level == LogLevel::Info && e.indent == 1 && e.message == "Row 0: 1 errors"));
    }

    #[test]
    fn test_options_are_checked() {
        let mut options = ValidationOptions::default();
        options.mode.allowed_fields.retain(|f| f != "chain_id");
        let result = validate_bulk(&[row(0)], &options);
        assert!(matches!(result, Err(ValidationError::InvalidOptions(_))));
    }

    #[test]
    fn test_single_blank_row_is_validated() {
        let result = validate_bulk(&[AttestationRow::new()], &ValidationOptions::default()).unwrap();
        assert!(!result.valid);
        assert_eq!(result.invalid_rows, vec![0]);
    }

    #[test]
    fn test_row_ceiling() {
        let rows: Vec<_> = (0..51).map(row).collect();
        let result = validate_bulk(&rows, &ValidationOptions::default()).unwrap();

        assert!(!result.valid);
        assert_eq!(result.valid_rows.len(), 51);
        let error = &result.diagnostics.errors[0];
        assert_eq!(error.code, codes::BULK_ROW_LIMIT_EXCEEDED);
        assert_eq!(error.row, None);

        let fifty = validate_bulk(&rows[..50], &ValidationOptions::default()).unwrap();
        assert!(fifty.valid);
    }

    #[test]
    fn test_custom_ceiling() {
        let rows: Vec<_> = (0..3).map(row).collect();
        let options = ValidationOptions::new().with_max_rows(2);
        assert!(!validate_bulk(&rows, &options).unwrap().valid);
    }
}
