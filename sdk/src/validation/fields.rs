//! Per-field value normalization and format validators.
//!
//! Validators return `Err(message)` with a human readable reason; the row
//! validator wraps it into a `<FIELD>_INVALID` diagnostic.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::caip::{is_evm_address_format, is_valid_evm_address, normalize_chain_id};
use crate::models::{value_to_text, AttestationRow};
use crate::reference::fields::{is_boolean_field, is_url_field};

/// Longest accepted `contract_name`.
pub const MAX_CONTRACT_NAME_LENGTH: usize = 40;

/// Output format of `deployment_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepted `erc_type` entries.
pub const KNOWN_ERC_TYPES: &[&str] = &[
    "erc20", "erc721", "erc777", "erc1155", "erc1167", "erc1271", "erc2981", "erc4337", "erc4626",
    "erc6551",
];

static CAIP2: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-z0-9]{3,8}:[-_a-zA-Z0-9]{1,32}$").expect("valid CAIP-2 regex"));

static TX_HASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{64}$").expect("valid tx hash regex"));

// =============================================================================
// Normalization
// =============================================================================

/// `1/yes/true` → `"true"`, `0/no/false` → `"false"`, case-insensitive.
pub fn normalize_boolean(text: &str) -> Option<&'static str> {
    match text.trim().to_lowercase().as_str() {
        "1" | "yes" | "true" => Some("true"),
        "0" | "no" | "false" => Some("false"),
        _ => None,
    }
}

/// Canonical text for one cell. Values that cannot be coerced are returned
/// trimmed so the validator can report them.
pub fn normalize_text(field: &str, text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    if is_boolean_field(field) {
        return normalize_boolean(text).map(str::to_string).unwrap_or_else(|| text.to_string());
    }

    match field {
        "erc20.decimals" => normalize_decimals(text).unwrap_or_else(|| text.to_string()),
        "deployment_date" => parse_date(text)
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| text.to_string()),
        "erc_type" => text
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(","),
        _ => text.to_string(),
    }
}

pub fn normalize_value(field: &str, value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        other => Value::String(normalize_text(field, &value_to_text(other))),
    }
}

/// Copy of `row` with every value normalized. Unknown fields are kept.
pub fn normalize_row(row: &AttestationRow) -> AttestationRow {
    row.iter()
        .map(|(field, value)| (field.clone(), normalize_value(field, value)))
        .collect()
}

fn normalize_decimals(text: &str) -> Option<String> {
    let number: f64 = text.parse().ok()?;
    (number.is_finite() && number >= 0.0 && number.fract() == 0.0 && number <= u32::MAX as f64)
        .then(|| format!("{}", number as u64))
}

/// Parse the date formats seen in spreadsheets and explorers.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    for format in [DATE_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    // Unix seconds
    if (9..=11).contains(&text.len()) && text.chars().all(|c| c.is_ascii_digit()) {
        let secs: i64 = text.parse().ok()?;
        return DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc());
    }

    None
}

// =============================================================================
// Validators
// =============================================================================

pub fn validate_chain_id(value: &str) -> Result<(), String> {
    if normalize_chain_id(value).is_some() || CAIP2.is_match(value) {
        Ok(())
    } else {
        Err(format!(
            "Invalid chain ID '{}': expected a CAIP-2 identifier such as eip155:1",
            value
        ))
    }
}

/// True for a well-formed CAIP-2 id that is not in the chain table.
pub fn is_unrecognized_chain(value: &str) -> bool {
    normalize_chain_id(value).is_none() && CAIP2.is_match(value)
}

/// Address format only enforced for EIP-155 chains.
pub fn validate_address_for_chain(address: &str, chain_id: &str) -> Result<(), String> {
    if chain_id.to_lowercase().starts_with("eip155:") {
        if !is_evm_address_format(address) {
            return Err("Invalid EVM address: expected 0x followed by 40 hex characters".to_string());
        }
        if !is_valid_evm_address(address) {
            return Err(
                "Invalid EVM address checksum: use all lowercase or the EIP-55 checksummed form"
                    .to_string(),
            );
        }
        return Ok(());
    }

    if address.chars().any(char::is_whitespace) {
        return Err("Address must not contain whitespace".to_string());
    }
    Ok(())
}

pub fn validate_contract_name(value: &str) -> Result<(), String> {
    let length = value.chars().count();
    if length > MAX_CONTRACT_NAME_LENGTH {
        return Err(format!(
            "Contract name is {} characters long (maximum {})",
            length, MAX_CONTRACT_NAME_LENGTH
        ));
    }
    Ok(())
}

pub fn validate_tx_hash(value: &str) -> Result<(), String> {
    if TX_HASH.is_match(value) {
        Ok(())
    } else {
        Err("Invalid transaction hash: expected 0x followed by 64 hex characters".to_string())
    }
}

pub fn validate_deployer_address(value: &str) -> Result<(), String> {
    if is_valid_evm_address(value) {
        Ok(())
    } else {
        Err("Invalid deployer address: expected a valid EVM address".to_string())
    }
}

pub fn validate_url(value: &str) -> Result<(), String> {
    if value.starts_with("https://") || value.starts_with("www.") {
        Ok(())
    } else {
        Err("URL must start with https:// or www.".to_string())
    }
}

pub fn validate_boolean(value: &str) -> Result<(), String> {
    match value {
        "true" | "false" => Ok(()),
        _ => Err(format!("Expected true or false, got '{}'", value)),
    }
}

pub fn validate_decimals(value: &str) -> Result<(), String> {
    value
        .parse::<u8>()
        .map(|_| ())
        .map_err(|_| format!("Decimals must be a whole number between 0 and 255, got '{}'", value))
}

pub fn validate_date(value: &str) -> Result<(), String> {
    parse_date(value)
        .map(|_| ())
        .ok_or_else(|| format!("Unrecognized date '{}': use YYYY-MM-DD HH:MM:SS", value))
}

pub fn validate_erc_types(value: &str) -> Result<(), String> {
    let unknown: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty() && !KNOWN_ERC_TYPES.contains(&t.to_lowercase().as_str()))
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(format!("Unknown ERC type(s): {}", unknown.join(", ")))
    }
}

/// Dispatch a normalized, non-empty value to its validator. Fields checked by
/// the fuzzy engines (`owner_project`, `usage_category`, `paymaster_category`)
/// and free-text fields always pass here.
pub fn validate_field(field: &str, value: &str, chain_id: &str) -> Result<(), String> {
    match field {
        "chain_id" => validate_chain_id(value),
        "address" => validate_address_for_chain(value, chain_id),
        "contract_name" => validate_contract_name(value),
        "deployment_tx" => validate_tx_hash(value),
        "deployer_address" => validate_deployer_address(value),
        "erc20.decimals" => validate_decimals(value),
        "deployment_date" => validate_date(value),
        "erc_type" => validate_erc_types(value),
        f if is_url_field(f) => validate_url(value),
        f if is_boolean_field(f) => validate_boolean(value),
        _ => Ok(()),
    }
}
