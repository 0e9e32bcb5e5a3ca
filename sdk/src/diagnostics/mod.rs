//! Row- and field-scoped diagnostics.
//!
//! Validation never fails with an error value for bad data. Every finding is
//! recorded in one of four buckets:
//!
//! | Bucket        | Meaning                                       | Blocks row |
//! |---------------|-----------------------------------------------|------------|
//! | `errors`      | validation failed                             | yes        |
//! | `warnings`    | non-fatal anomaly                             | no         |
//! | `conversions` | value was rewritten (alias, normalization)    | no         |
//! | `suggestions` | ranked corrections, not applied               | no         |
//!
//! `row` indices point into the *output* row array. An error without a row is
//! global and invalidates every row.

pub mod codes;
pub mod remap;

pub use remap::{remap_diagnostics, RemapMode};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Diagnostic
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Stable machine-readable code, e.g. `ADDRESS_INVALID`.
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Where a diagnostic points and what it carries besides the message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pointer {
    pub row: Option<usize>,
    pub field: Option<String>,
    pub suggestion: Option<String>,
    pub suggestions: Vec<String>,
    pub metadata: Option<Map<String, Value>>,
}

impl Pointer {
    /// No row, no field: a global diagnostic.
    pub fn global() -> Self {
        Self::default()
    }

    pub fn row(row: usize) -> Self {
        Self {
            row: Some(row),
            ..Default::default()
        }
    }

    pub fn cell(row: usize, field: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            field: Some(field.into()),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

impl Diagnostic {
    pub fn new(code: impl Into<String>, message: impl Into<String>, pointer: Pointer) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            row: pointer.row,
            field: pointer.field,
            suggestion: pointer.suggestion,
            suggestions: pointer.suggestions,
            metadata: pointer.metadata,
        }
    }
}

// =============================================================================
// Buckets
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttestationDiagnostics {
    #[serde(default)]
    pub errors: Vec<Diagnostic>,
    #[serde(default)]
    pub warnings: Vec<Diagnostic>,
    #[serde(default)]
    pub conversions: Vec<Diagnostic>,
    #[serde(default)]
    pub suggestions: Vec<Diagnostic>,
}

impl AttestationDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, code: impl Into<String>, message: impl Into<String>, pointer: Pointer) {
        self.errors.push(Diagnostic::new(code, message, pointer));
    }

    pub fn add_warning(&mut self, code: impl Into<String>, message: impl Into<String>, pointer: Pointer) {
        self.warnings.push(Diagnostic::new(code, message, pointer));
    }

    pub fn add_conversion(&mut self, code: impl Into<String>, message: impl Into<String>, pointer: Pointer) {
        self.conversions.push(Diagnostic::new(code, message, pointer));
    }

    pub fn add_suggestion(&mut self, code: impl Into<String>, message: impl Into<String>, pointer: Pointer) {
        self.suggestions.push(Diagnostic::new(code, message, pointer));
    }

    /// Append every bucket of `incoming`.
    pub fn merge(&mut self, incoming: AttestationDiagnostics) {
        self.errors.extend(incoming.errors);
        self.warnings.extend(incoming.warnings);
        self.conversions.extend(incoming.conversions);
        self.suggestions.extend(incoming.suggestions);
    }

    /// Drop exact repeats within each bucket, keeping the first.
    pub fn dedup(&mut self) {
        for bucket in self.buckets_mut() {
            let mut seen: Vec<Diagnostic> = Vec::with_capacity(bucket.len());
            bucket.retain(|d| {
                if seen.contains(d) {
                    false
                } else {
                    seen.push(d.clone());
                    true
                }
            });
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors scoped to exactly this row (global errors excluded).
    pub fn has_row_errors(&self, row: usize) -> bool {
        self.errors.iter().any(|d| d.row == Some(row))
    }

    /// A row is invalid if it has its own error or any global error exists.
    pub fn row_is_invalid(&self, row: usize) -> bool {
        self.errors.iter().any(|d| d.row.is_none() || d.row == Some(row))
    }

    /// Copy of the diagnostics pointing at `row`.
    pub fn for_row(&self, row: usize) -> AttestationDiagnostics {
        let pick = |list: &[Diagnostic]| -> Vec<Diagnostic> {
            list.iter().filter(|d| d.row == Some(row)).cloned().collect()
        };
        AttestationDiagnostics {
            errors: pick(&self.errors),
            warnings: pick(&self.warnings),
            conversions: pick(&self.conversions),
            suggestions: pick(&self.suggestions),
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.conversions.len() + self.suggestions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every diagnostic of every bucket, mutably.
    pub(crate) fn buckets_mut(&mut self) -> [&mut Vec<Diagnostic>; 4] {
        [
            &mut self.errors,
            &mut self.warnings,
            &mut self.conversions,
            &mut self.suggestions,
        ]
    }
}

/// Free-function form of [`AttestationDiagnostics::merge`].
pub fn merge_diagnostics(target: &mut AttestationDiagnostics, incoming: AttestationDiagnostics) {
    target.merge(incoming);
}
