//! Re-attach diagnostics to rows after the row set was edited.
//!
//! Rows are matched by content signature (see [`AttestationRow::signature`]):
//!
//! 1. identical signatures at the same position
//! 2. remaining identical signatures, each taking the first free slot
//!
//! Diagnostics whose row found no match are dropped; diagnostics without a row
//! pass through. [`RemapMode::Relaxed`] additionally keeps a field diagnostic
//! at its old position when that slot is free and the diagnostic's own field
//! still holds the same value, so editing an unrelated cell does not clear it.

use serde::{Deserialize, Serialize};

use super::{AttestationDiagnostics, Diagnostic};
use crate::models::AttestationRow;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RemapMode {
    /// Signature matching only.
    #[default]
    Strict,
    /// Signature matching, then same-position matching on the diagnostic's field.
    Relaxed,
}

/// Map diagnostics computed against `previous` onto `current`.
pub fn remap_diagnostics(
    diagnostics: &AttestationDiagnostics,
    previous: &[AttestationRow],
    current: &[AttestationRow],
    mode: RemapMode,
) -> AttestationDiagnostics {
    let prev_sigs: Vec<String> = previous.iter().map(AttestationRow::signature).collect();
    let cur_sigs: Vec<String> = current.iter().map(AttestationRow::signature).collect();

    let mut mapping: Vec<Option<usize>> = vec![None; previous.len()];
    let mut claimed = vec![false; current.len()];

    for i in 0..prev_sigs.len().min(cur_sigs.len()) {
        if prev_sigs[i] == cur_sigs[i] {
            mapping[i] = Some(i);
            claimed[i] = true;
        }
    }

    for (i, sig) in prev_sigs.iter().enumerate() {
        if mapping[i].is_some() {
            continue;
        }
        if let Some(j) = (0..cur_sigs.len()).find(|&j| !claimed[j] && &cur_sigs[j] == sig) {
            mapping[i] = Some(j);
            claimed[j] = true;
        }
    }

    let relocate = |d: &Diagnostic| -> Option<Diagnostic> {
        let Some(row) = d.row else {
            return Some(d.clone());
        };

        if let Some(Some(target)) = mapping.get(row) {
            let mut moved = d.clone();
            moved.row = Some(*target);
            return Some(moved);
        }

        let keep_in_place = mode == RemapMode::Relaxed
            && row < current.len()
            && row < previous.len()
            && !claimed[row]
            && d.field
                .as_deref()
                .is_some_and(|f| previous[row].text(f) == current[row].text(f));

        keep_in_place.then(|| d.clone())
    };

    let mut out = AttestationDiagnostics::new();
    let sources = [
        &diagnostics.errors,
        &diagnostics.warnings,
        &diagnostics.conversions,
        &diagnostics.suggestions,
    ];
    for (target, source) in out.buckets_mut().into_iter().zip(sources) {
        target.extend(source.iter().filter_map(&relocate));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Pointer;

    fn row(address: &str, name: &str) -> AttestationRow {
        AttestationRow::from_pairs([("address", address), ("contract_name", name)])
    }

    fn diags_for(rows: &[(usize, &str)]) -> AttestationDiagnostics {
        let mut d = AttestationDiagnostics::new();
        for (r, field) in rows {
            d.add_error("X_INVALID", "bad", Pointer::cell(*r, *field));
        }
        d
    }

    #[test]
    fn test_unchanged_rows_keep_indices() {
        let rows = vec![row("a", "A"), row("b", "B")];
        let d = diags_for(&[(0, "address"), (1, "address")]);
        let out = remap_diagnostics(&d, &rows, &rows, RemapMode::Strict);
        assert_eq!(out, d);
    }

    #[test]
    fn test_reordered_rows_follow_content() {
        let before = vec![row("a", "A"), row("b", "B"), row("c", "C")];
        let after = vec![row("c", "C"), row("a", "A"), row("b", "B")];
        let d = diags_for(&[(0, "address"), (2, "address")]);

        let out = remap_diagnostics(&d, &before, &after, RemapMode::Strict);
        let rows: Vec<_> = out.errors.iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_removed_row_drops_diagnostics() {
        let before = vec![row("a", "A"), row("b", "B")];
        let after = vec![row("b", "B")];
        let d = diags_for(&[(0, "address"), (1, "address")]);

        let out = remap_diagnostics(&d, &before, &after, RemapMode::Strict);
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].row, Some(0));
    }

    #[test]
    fn test_duplicate_rows_take_first_free_slot() {
        let before = vec![row("x", "X"), row("a", "A"), row("a", "A")];
        let after = vec![row("a", "A"), row("a", "A")];
        let d = diags_for(&[(1, "address"), (2, "address")]);

        // row 1 keeps its position, row 2 takes the first free slot
        let out = remap_diagnostics(&d, &before, &after, RemapMode::Strict);
        let rows: Vec<_> = out.errors.iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_global_diagnostics_pass_through() {
        let mut d = AttestationDiagnostics::new();
        d.add_error("BULK_ROW_LIMIT_EXCEEDED", "too many", Pointer::global());
        let out = remap_diagnostics(&d, &[row("a", "A")], &[], RemapMode::Strict);
        assert_eq!(out.errors.len(), 1);
    }

    #[test]
    fn test_edited_cell_strict_vs_relaxed() {
        let before = vec![row("a", "A")];
        let after = vec![row("a", "Renamed")];
        let d = diags_for(&[(0, "address"), (0, "contract_name")]);

        let strict = remap_diagnostics(&d, &before, &after, RemapMode::Strict);
        assert!(strict.errors.is_empty());

        let relaxed = remap_diagnostics(&d, &before, &after, RemapMode::Relaxed);
        assert_eq!(relaxed.errors.len(), 1);
        assert_eq!(relaxed.errors[0].field.as_deref(), Some("address"));
    }
}
