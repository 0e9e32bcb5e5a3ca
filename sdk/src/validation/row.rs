//! Single-row validation.

use serde::Serialize;

use crate::caip::to_checksum_address;
use crate::diagnostics::{codes, AttestationDiagnostics, Pointer};
use crate::fuzzy::{convert_chain_id, suggest_chains};
use crate::models::AttestationRow;
use crate::reference::field_label;

use super::fields::{is_unrecognized_chain, normalize_row, validate_field};
use super::normalize::{check_references, infer_caip};
use super::ValidationOptions;

/// Outcome of validating one row.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RowValidationResult {
    /// No entry in `diagnostics.errors`.
    pub valid: bool,
    /// The normalized row. Equal to the input when nothing was rewritten.
    pub row: AttestationRow,
    pub diagnostics: AttestationDiagnostics,
}

/// Validate a standalone row (diagnostics point at row 0).
pub fn validate_row(row: &AttestationRow, options: &ValidationOptions) -> RowValidationResult {
    validate_row_at(row, 0, options)
}

/// Validate a row that sits at `index` in a larger set.
pub fn validate_row_at(
    row: &AttestationRow,
    index: usize,
    options: &ValidationOptions,
) -> RowValidationResult {
    let mut diagnostics = AttestationDiagnostics::new();
    let mut row = normalize_row(row);

    infer_caip(&mut row, index, &mut diagnostics);

    let mode = &options.mode;
    for (field, _) in row.iter().filter(|(f, _)| row.has_value(f)) {
        if !mode.allows(field) {
            diagnostics.add_warning(
                codes::FIELD_NOT_IN_MODE,
                format!("{} is not part of {} mode", field_label(field), mode.label),
                Pointer::cell(index, field.as_str()),
            );
        }
    }

    for field in &mode.requires_fields {
        if !row.has_value(field) {
            diagnostics.add_error(
                codes::REQUIRED_FIELD_MISSING,
                format!("{} is required", field_label(field)),
                Pointer::cell(index, field.as_str()),
            );
        }
    }

    let chain_id = row.text("chain_id");
    for (field, _) in row.iter() {
        let value = row.text(field);
        if value.is_empty() {
            continue;
        }

        if let Err(message) = validate_field(field, &value, &chain_id) {
            diagnostics.add_error(
                codes::invalid_code(field),
                message,
                fix_for(field, &value, Pointer::cell(index, field.as_str())),
            );
        } else if field == "chain_id" && is_unrecognized_chain(&value) {
            diagnostics.add_warning(
                codes::CHAIN_ID_UNRECOGNIZED,
                format!("Chain {} is not in the known chain list", value),
                Pointer::cell(index, "chain_id"),
            );
        }
    }

    check_references(&row, index, &options.projects, &mut diagnostics);

    RowValidationResult {
        valid: !diagnostics.has_errors(),
        row,
        diagnostics,
    }
}

/// Attach a ready-made correction where one can be computed.
fn fix_for(field: &str, value: &str, pointer: Pointer) -> Pointer {
    match field {
        "chain_id" => {
            let converted = convert_chain_id(value);
            let pointer = pointer.with_suggestions(suggest_chains(value));
            if converted.is_empty() {
                pointer
            } else {
                pointer.with_suggestion(converted)
            }
        }
        "address" | "deployer_address" => match to_checksum_address(value) {
            Some(checksummed) => pointer.with_suggestion(checksummed),
            None => pointer,
        },
        _ => pointer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectRecord;
    use crate::reference::ModeProfile;

    const ADDRESS: &str = "0x1234567890123456789012345678901234567890";

    fn codes_of(list: &[crate::diagnostics::Diagnostic]) -> Vec<&str> {
        list.iter().map(|d| d.code.as_str()).collect()
    }

    #[test]
    fn test_valid_minimal_row() {
        let row = AttestationRow::from_pairs([("chain_id", "eip155:1"), ("address", ADDRESS)]);
        let result = validate_row(&row, &ValidationOptions::default());
        assert!(result.valid, "{:?}", result.diagnostics);
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.row, row);
    }

    #[test]
    fn test_bad_checksum_is_address_invalid() {
        let row = AttestationRow::from_pairs([
            ("chain_id", "eip155:1"),
            ("address", "0x52908400098527886E0F7030069857D2E4169Ee7"),
        ]);
        let result = validate_row(&row, &ValidationOptions::default());

        assert!(!result.valid);
        assert_eq!(codes_of(&result.diagnostics.errors), vec!["ADDRESS_INVALID"]);
        assert_eq!(result.diagnostics.errors[0].field.as_deref(), Some("address"));
        assert_eq!(
            result.diagnostics.errors[0].suggestion.as_deref(),
            Some("0x52908400098527886E0F7030069857D2E4169EE7")
        );
    }

    #[test]
    fn test_category_alias_stays_valid() {
        let row = AttestationRow::from_pairs([
            ("chain_id", "eip155:1"),
            ("address", ADDRESS),
            ("usage_category", "defi"),
        ]);
        let result = validate_row(&row, &ValidationOptions::default());

        assert!(result.valid);
        let conversion = &result.diagnostics.conversions[0];
        assert_eq!(conversion.code, "CATEGORY_ALIAS_SUGGESTION");
        assert_eq!(conversion.suggestion.as_deref(), Some("dex"));
        // the row itself is not rewritten
        assert_eq!(result.row.text("usage_category"), "defi");
    }

    #[test]
    fn test_missing_required_fields() {
        let row = AttestationRow::from_pairs([("contract_name", "Router")]);
        let result = validate_row(&row, &ValidationOptions::default());

        assert_eq!(
            codes_of(&result.diagnostics.errors),
            vec!["REQUIRED_FIELD_MISSING", "REQUIRED_FIELD_MISSING"]
        );
        assert_eq!(result.diagnostics.errors[0].field.as_deref(), Some("chain_id"));
        assert_eq!(result.diagnostics.errors[1].field.as_deref(), Some("address"));
    }

    #[test]
    fn test_advanced_field_warns_in_simple_mode() {
        let row = AttestationRow::from_pairs([
            ("chain_id", "eip155:1"),
            ("address", ADDRESS),
            ("is_proxy", "yes"),
        ]);

        let simple = validate_row(&row, &ValidationOptions::default());
        assert!(simple.valid);
        assert_eq!(codes_of(&simple.diagnostics.warnings), vec!["FIELD_NOT_IN_MODE"]);
        assert_eq!(simple.row.text("is_proxy"), "true");

        let advanced = validate_row(&row, &ValidationOptions::new().with_mode(ModeProfile::advanced()));
        assert!(advanced.diagnostics.warnings.is_empty());
    }

    #[test]
    fn test_invalid_chain_gets_suggestion() {
        let row = AttestationRow::from_pairs([("chain_id", "mainnet"), ("address", ADDRESS)]);
        let result = validate_row(&row, &ValidationOptions::default());

        let error = &result.diagnostics.errors[0];
        assert_eq!(error.code, "CHAIN_ID_INVALID");
        assert_eq!(error.suggestion.as_deref(), Some("eip155:1"));
    }

    #[test]
    fn test_unknown_chain_is_warning_only() {
        let row = AttestationRow::from_pairs([("chain_id", "eip155:999999"), ("address", ADDRESS)]);
        let result = validate_row(&row, &ValidationOptions::default());

        assert!(result.valid);
        assert_eq!(codes_of(&result.diagnostics.warnings), vec!["CHAIN_ID_UNRECOGNIZED"]);
    }

    #[test]
    fn test_caip_address_fills_chain() {
        let row = AttestationRow::from_pairs([("address", format!("eip155:10:{ADDRESS}"))]);
        let result = validate_row(&row, &ValidationOptions::default());

        assert!(result.valid, "{:?}", result.diagnostics);
        assert_eq!(result.row.text("chain_id"), "eip155:10");
        assert_eq!(result.row.text("address"), ADDRESS);
        assert_eq!(codes_of(&result.diagnostics.conversions), vec!["CAIP_CHAIN_INFERRED"]);
    }

    #[test]
    fn test_unknown_project() {
        let options = ValidationOptions::new()
            .with_projects(vec![ProjectRecord::new("growthepie").with_display_name("growthepie")]);
        let row = AttestationRow::from_pairs([
            ("chain_id", "eip155:1"),
            ("address", ADDRESS),
            ("owner_project", "growthpie"),
        ]);
        let result = validate_row_at(&row, 4, &options);

        assert!(!result.valid);
        let error = &result.diagnostics.errors[0];
        assert_eq!(error.code, "PROJECT_INVALID");
        assert_eq!(error.row, Some(4));
        assert_eq!(error.suggestions, vec!["growthepie"]);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let row = AttestationRow::from_pairs([
            ("chain_id", "eip155:8453"),
            ("address", &*format!("eip155:8453:{ADDRESS}")),
            ("deployment_date", "2024-03-15"),
            ("is_proxy", "1"),
            ("erc20.decimals", "18.0"),
        ]);
        let options = ValidationOptions::new().with_mode(ModeProfile::advanced());

        let first = validate_row(&row, &options);
        let second = validate_row(&first.row, &options);
        assert_eq!(first.row, second.row);
        assert_eq!(second.row.text("deployment_date"), "2024-03-15 00:00:00");
    }
}
