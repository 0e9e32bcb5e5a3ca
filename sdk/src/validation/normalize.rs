//! Row steps shared by the row validator and the CSV parser.
//!
//! Both entry points pass the index of the row in their *output* array so the
//! diagnostics they emit line up with what the caller gets back.

use serde_json::Value;

use crate::caip::{normalize_chain_id, parse_caip10};
use crate::diagnostics::{codes, AttestationDiagnostics, Pointer};
use crate::fuzzy::{
    convert_category_alias, convert_paymaster_alias, get_project_validation, suggest_categories,
    suggest_paymaster_categories,
};
use crate::models::{AttestationRow, ProjectRecord};
use crate::reference::{is_valid_category, is_valid_paymaster_category};

/// Fallback suggestion for an unknown category with no close match.
pub const DEFAULT_CATEGORY: &str = "other";

/// Fallback suggestion for an unknown paymaster category with no close match.
pub const DEFAULT_PAYMASTER_CATEGORY: &str = "verifying";

/// Split a CAIP-10 `address` into `chain_id` and a bare address.
///
/// The address is always rewritten. An empty `chain_id` is filled only when
/// the embedded chain is known; a conflicting `chain_id` is left untouched and
/// reported.
pub fn infer_caip(row: &mut AttestationRow, index: usize, diagnostics: &mut AttestationDiagnostics) {
    let Some(parsed) = parse_caip10(&row.text("address")) else {
        return;
    };

    row.set("address", parsed.address.clone());

    let current = row.text("chain_id");
    if current.is_empty() {
        if parsed.is_known_chain {
            row.set("chain_id", parsed.chain_id.clone());
            diagnostics.add_conversion(
                codes::CAIP_CHAIN_INFERRED,
                format!("Chain ID {} taken from the CAIP-10 address", parsed.chain_id),
                Pointer::cell(index, "chain_id").with_suggestion(parsed.chain_id),
            );
        }
        return;
    }

    let current = normalize_chain_id(&current).unwrap_or(current);
    if !current.eq_ignore_ascii_case(&parsed.chain_id) {
        diagnostics.add_error(
            codes::CAIP_CHAIN_MISMATCH,
            format!(
                "Chain ID {} does not match the address chain {}",
                current, parsed.chain_id
            ),
            Pointer::cell(index, "chain_id")
                .with_suggestion(parsed.chain_id.clone())
                .with_metadata("addressChainId", parsed.chain_id),
        );
    }
}

/// Project, category and paymaster checks against the reference data.
pub fn check_references(
    row: &AttestationRow,
    index: usize,
    projects: &[ProjectRecord],
    diagnostics: &mut AttestationDiagnostics,
) {
    check_project(row, index, projects, diagnostics);
    check_category(row, index, diagnostics);
    check_paymaster(row, index, diagnostics);
}

fn check_project(
    row: &AttestationRow,
    index: usize,
    projects: &[ProjectRecord],
    diagnostics: &mut AttestationDiagnostics,
) {
    let owner = row.text("owner_project");
    // an empty registry means "not loaded", not "nothing is valid"
    if owner.is_empty() || projects.is_empty() {
        return;
    }

    let validation = get_project_validation(&owner, projects);
    if validation.valid {
        return;
    }

    let mut pointer = Pointer::cell(index, "owner_project")
        .with_suggestions(validation.suggestions.clone())
        .with_metadata(
            "similarProjects",
            Value::from(validation.similar_projects.clone()),
        );
    if let Some(best) = validation.suggestions.first() {
        pointer = pointer.with_suggestion(best.clone());
    }

    diagnostics.add_error(
        codes::PROJECT_INVALID,
        format!("Unknown project '{}'", owner),
        pointer.clone(),
    );

    if let Some(best) = validation.suggestions.first() {
        diagnostics.add_suggestion(
            codes::PROJECT_SUGGESTION,
            format!("Did you mean '{}'?", best),
            pointer,
        );
    }
}

fn check_category(row: &AttestationRow, index: usize, diagnostics: &mut AttestationDiagnostics) {
    let category = row.text("usage_category");
    if category.is_empty() || is_valid_category(&category) {
        return;
    }

    let converted = convert_category_alias(&category);
    if converted != category && is_valid_category(&converted) {
        let pointer = Pointer::cell(index, "usage_category").with_suggestion(converted.clone());
        let message = format!("'{}' is an alias of category '{}'", category, converted);
        diagnostics.add_conversion(codes::CATEGORY_ALIAS_SUGGESTION, message.clone(), pointer.clone());
        diagnostics.add_suggestion(codes::CATEGORY_ALIAS_SUGGESTION, message, pointer);
        return;
    }

    let mut suggestions = suggest_categories(&category);
    if suggestions.is_empty() {
        suggestions.push(DEFAULT_CATEGORY.to_string());
    }
    diagnostics.add_error(
        codes::CATEGORY_INVALID,
        format!("Unknown usage category '{}'", category),
        Pointer::cell(index, "usage_category")
            .with_suggestion(suggestions[0].clone())
            .with_suggestions(suggestions),
    );
}

fn check_paymaster(row: &AttestationRow, index: usize, diagnostics: &mut AttestationDiagnostics) {
    let category = row.text("paymaster_category");
    if category.is_empty() || is_valid_paymaster_category(&category) {
        return;
    }

    let converted = convert_paymaster_alias(&category);
    if converted != category && is_valid_paymaster_category(&converted) {
        let pointer = Pointer::cell(index, "paymaster_category").with_suggestion(converted.clone());
        let message = format!("'{}' is an alias of paymaster category '{}'", category, converted);
        diagnostics.add_conversion(codes::PAYMASTER_ALIAS_SUGGESTION, message.clone(), pointer.clone());
        diagnostics.add_suggestion(codes::PAYMASTER_ALIAS_SUGGESTION, message, pointer);
        return;
    }

    let mut suggestions = suggest_paymaster_categories(&category);
    if suggestions.is_empty() {
        suggestions.push(DEFAULT_PAYMASTER_CATEGORY.to_string());
    }
    diagnostics.add_error(
        codes::PAYMASTER_CATEGORY_INVALID,
        format!("Unknown paymaster category '{}'", category),
        Pointer::cell(index, "paymaster_category")
            .with_suggestion(suggestions[0].clone())
            .with_suggestions(suggestions),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caip_fills_empty_chain() {
        let mut row = AttestationRow::from_pairs([(
            "address",
            "eip155:8453:0x1234567890123456789012345678901234567890",
        )]);
        let mut diags = AttestationDiagnostics::new();
        infer_caip(&mut row, 3, &mut diags);

        assert_eq!(row.text("chain_id"), "eip155:8453");
        assert_eq!(row.text("address"), "0x1234567890123456789012345678901234567890");
        assert_eq!(diags.conversions[0].code, codes::CAIP_CHAIN_INFERRED);
        assert_eq!(diags.conversions[0].row, Some(3));
    }

    #[test]
    fn test_caip_mismatch_keeps_chain() {
        let mut row = AttestationRow::from_pairs([
            ("chain_id", "eip155:1"),
            ("address", "eip155:10:0x1234567890123456789012345678901234567890"),
        ]);
        let mut diags = AttestationDiagnostics::new();
        infer_caip(&mut row, 0, &mut diags);

        assert_eq!(row.text("chain_id"), "eip155:1");
        assert_eq!(row.text("address"), "0x1234567890123456789012345678901234567890");
        assert_eq!(diags.errors[0].code, codes::CAIP_CHAIN_MISMATCH);
    }

    #[test]
    fn test_caip_unknown_chain_leaves_chain_empty() {
        let mut row = AttestationRow::from_pairs([("address", "eip155:777777:0xabc")]);
        let mut diags = AttestationDiagnostics::new();
        infer_caip(&mut row, 0, &mut diags);

        assert_eq!(row.text("chain_id"), "");
        assert_eq!(row.text("address"), "0xabc");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_plain_address_untouched() {
        let mut row = AttestationRow::from_pairs([("address", "0x1234567890123456789012345678901234567890")]);
        let before = row.clone();
        let mut diags = AttestationDiagnostics::new();
        infer_caip(&mut row, 0, &mut diags);
        assert_eq!(row, before);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_category_alias_is_not_an_error() {
        let row = AttestationRow::from_pairs([("usage_category", "defi")]);
        let mut diags = AttestationDiagnostics::new();
        check_references(&row, 0, &[], &mut diags);

        assert!(diags.errors.is_empty());
        assert_eq!(diags.conversions[0].code, codes::CATEGORY_ALIAS_SUGGESTION);
        assert_eq!(diags.conversions[0].suggestion.as_deref(), Some("dex"));
        assert_eq!(diags.suggestions.len(), 1);
    }

    #[test]
    fn test_unknown_category_falls_back_to_other() {
        let row = AttestationRow::from_pairs([("usage_category", "qqqqqqqqqq")]);
        let mut diags = AttestationDiagnostics::new();
        check_references(&row, 0, &[], &mut diags);

        assert_eq!(diags.errors[0].code, codes::CATEGORY_INVALID);
        assert_eq!(diags.errors[0].suggestions, vec!["other"]);
    }

    #[test]
    fn test_unknown_paymaster_falls_back_to_verifying() {
        let row = AttestationRow::from_pairs([("paymaster_category", "zzzzzzzz")]);
        let mut diags = AttestationDiagnostics::new();
        check_references(&row, 0, &[], &mut diags);

        assert_eq!(diags.errors[0].code, codes::PAYMASTER_CATEGORY_INVALID);
        assert_eq!(diags.errors[0].suggestions, vec!["verifying"]);
    }

    #[test]
    fn test_project_skipped_without_registry() {
        let row = AttestationRow::from_pairs([("owner_project", "whatever")]);
        let mut diags = AttestationDiagnostics::new();
        check_references(&row, 0, &[], &mut diags);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_unknown_project_mirrored_as_suggestion() {
        let projects = vec![ProjectRecord::new("growthepie").with_display_name("growthepie")];
        let row = AttestationRow::from_pairs([("owner_project", "growthpie")]);
        let mut diags = AttestationDiagnostics::new();
        check_references(&row, 1, &projects, &mut diags);

        assert_eq!(diags.errors[0].code, codes::PROJECT_INVALID);
        assert_eq!(diags.errors[0].suggestions, vec!["growthepie"]);
        assert_eq!(diags.suggestions[0].code, codes::PROJECT_SUGGESTION);
        assert_eq!(diags.suggestions[0].row, Some(1));
    }
}
