//! Diagnostic codes.
//!
//! `*_INVALID` format failures, `*_MISSING` required gaps, `*_MISMATCH`
//! conflicts, `*_NOT_IN_MODE` scope warnings, `BULK_*` batch gates and `CSV_*`
//! parse-stage findings. Per-field format errors are derived with
//! [`invalid_code`].

// Row validation
pub const CAIP_CHAIN_INFERRED: &str = "CAIP_CHAIN_INFERRED";
pub const CAIP_CHAIN_MISMATCH: &str = "CAIP_CHAIN_MISMATCH";
pub const FIELD_NOT_IN_MODE: &str = "FIELD_NOT_IN_MODE";
pub const REQUIRED_FIELD_MISSING: &str = "REQUIRED_FIELD_MISSING";
pub const CHAIN_ID_UNRECOGNIZED: &str = "CHAIN_ID_UNRECOGNIZED";
pub const PROJECT_INVALID: &str = "PROJECT_INVALID";
pub const PROJECT_SUGGESTION: &str = "PROJECT_SUGGESTION";
pub const CATEGORY_INVALID: &str = "CATEGORY_INVALID";
pub const CATEGORY_ALIAS_SUGGESTION: &str = "CATEGORY_ALIAS_SUGGESTION";
pub const PAYMASTER_CATEGORY_INVALID: &str = "PAYMASTER_CATEGORY_INVALID";
pub const PAYMASTER_ALIAS_SUGGESTION: &str = "PAYMASTER_ALIAS_SUGGESTION";

// Bulk
pub const BULK_ROW_LIMIT_EXCEEDED: &str = "BULK_ROW_LIMIT_EXCEEDED";
pub const OPTIONS_INVALID: &str = "OPTIONS_INVALID";

// CSV
pub const CSV_EMPTY: &str = "CSV_EMPTY";
pub const CSV_HEADER_PARSE_ERROR: &str = "CSV_HEADER_PARSE_ERROR";
pub const CSV_UNKNOWN_COLUMN: &str = "CSV_UNKNOWN_COLUMN";
pub const CSV_DUPLICATE_COLUMN: &str = "CSV_DUPLICATE_COLUMN";
pub const CSV_MISSING_REQUIRED_COLUMNS: &str = "CSV_MISSING_REQUIRED_COLUMNS";
pub const CSV_ROW_PARSE_ERROR: &str = "CSV_ROW_PARSE_ERROR";
pub const CSV_EXTRA_CELLS: &str = "CSV_EXTRA_CELLS";
pub const CHAIN_NORMALIZED: &str = "CHAIN_NORMALIZED";
pub const CATEGORY_CONVERTED: &str = "CATEGORY_CONVERTED";
pub const PAYMASTER_CATEGORY_CONVERTED: &str = "PAYMASTER_CATEGORY_CONVERTED";

/// `chain_id` → `CHAIN_ID_INVALID`, `erc20.decimals` → `ERC20_DECIMALS_INVALID`.
pub fn invalid_code(field: &str) -> String {
    let stem: String = field
        .trim_start_matches('_')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("{}_INVALID", stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_code() {
        assert_eq!(invalid_code("address"), "ADDRESS_INVALID");
        assert_eq!(invalid_code("chain_id"), "CHAIN_ID_INVALID");
        assert_eq!(invalid_code("erc20.decimals"), "ERC20_DECIMALS_INVALID");
        assert_eq!(invalid_code("_comment"), "COMMENT_INVALID");
    }
}
