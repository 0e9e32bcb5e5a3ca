//! Attestation validation.
//!
//! # Pipeline
//!
//! ```text
//! row ──▶ normalize values ──▶ CAIP-10 split ──▶ mode scope ──▶ required
//!     ──▶ per-field formats ──▶ project / category / paymaster ──▶ result
//! ```
//!
//! Validation never returns `Err` for bad data. Every finding lands in the
//! [`AttestationDiagnostics`](crate::diagnostics::AttestationDiagnostics) of
//! the result; only caller mistakes (no rows at all) are errors.
//!
//! # Example
//!
//! ```rust
//! use oli::{validate_row, AttestationRow, ValidationOptions};
//!
//! let row = AttestationRow::from_pairs([
//!     ("chain_id", "eip155:1"),
//!     ("address", "0x1234567890123456789012345678901234567890"),
//!     ("usage_category", "defi"),
//! ]);
//! let result = validate_row(&row, &ValidationOptions::default());
//! assert!(result.valid);
//! assert_eq!(result.diagnostics.conversions[0].suggestion.as_deref(), Some("dex"));
//! ```

pub mod bulk;
pub mod fields;
pub mod normalize;
pub mod row;

pub use bulk::{validate_bulk, BulkValidationResult};
pub use fields::{normalize_row, normalize_value, validate_field};
pub use normalize::{check_references, infer_caip};
pub use row::{validate_row, validate_row_at, RowValidationResult};

use crate::error::{ValidationError, ValidationResult};
use crate::models::ProjectRecord;
use crate::reference::ModeProfile;

/// Row ceiling for a bulk submission.
pub const DEFAULT_MAX_ROWS: usize = 50;

/// Knobs shared by the row, bulk and CSV entry points.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    pub mode: ModeProfile,
    /// Known projects. Empty disables the `owner_project` check.
    pub projects: Vec<ProjectRecord>,
    /// When set, CSV columns outside this list are dropped silently instead of
    /// being reported.
    pub allowed_fields: Option<Vec<String>>,
    pub max_rows: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            mode: ModeProfile::simple(),
            projects: Vec::new(),
            allowed_fields: None,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: ModeProfile) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_projects(mut self, projects: Vec<ProjectRecord>) -> Self {
        self.projects = projects;
        self
    }

    pub fn with_allowed_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Reject option sets that can never produce a valid row.
    pub fn check(&self) -> ValidationResult<()> {
        if self.max_rows == 0 {
            return Err(ValidationError::InvalidOptions(
                "max_rows must be at least 1".to_string(),
            ));
        }
        if let Some(missing) = self
            .mode
            .requires_fields
            .iter()
            .find(|f| !self.mode.allows(f))
        {
            return Err(ValidationError::InvalidOptions(format!(
                "required field '{}' is not allowed in mode '{}'",
                missing, self.mode.id
            )));
        }
        Ok(())
    }

    /// True when `field` should be kept by the CSV parser.
    pub fn accepts_column(&self, field: &str) -> bool {
        self.allowed_fields
            .as_ref()
            .map_or(true, |allowed| allowed.iter().any(|f| f == field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ValidationOptions::default();
        assert_eq!(options.mode.id, "simple");
        assert_eq!(options.max_rows, 50);
        assert!(options.check().is_ok());
        assert!(options.accepts_column("anything"));
    }

    #[test]
    fn test_builder_and_check() {
        let options = ValidationOptions::new()
            .with_mode(ModeProfile::advanced())
            .with_allowed_fields(["chain_id", "address"])
            .with_max_rows(0);

        assert!(options.accepts_column("address"));
        assert!(!options.accepts_column("owner_project"));
        assert!(matches!(options.check(), Err(ValidationError::InvalidOptions(_))));
    }
}
