//! CAIP-2 / CAIP-10 identifiers and EIP-55 address checksums.
//!
//! ```text
//! CAIP-2   eip155:8453
//! CAIP-10  eip155:8453:0x4200000000000000000000000000000000000006
//!          └── chain ─┘ └──────────── address ───────────────┘
//! ```
//!
//! Non-EVM addresses may themselves contain colons, so everything after the
//! second colon is treated as the address.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tiny_keccak::{Hasher, Keccak};

use crate::reference::chains::chain_by_caip2;

static EVM_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("valid address regex"));

/// A parsed `chain:address` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Caip10 {
    /// Canonical CAIP-2 id when known, otherwise the raw `namespace:reference`.
    pub chain_id: String,
    pub address: String,
    pub is_known_chain: bool,
}

/// Canonical CAIP-2 string for a known chain, matched case-insensitively.
pub fn normalize_chain_id(raw: &str) -> Option<String> {
    chain_by_caip2(raw).map(|c| c.caip2.to_string())
}

/// Split a CAIP-10 identifier into chain and address.
///
/// Returns `None` when there are fewer than three colon-separated segments or
/// the address part is blank.
pub fn parse_caip10(value: &str) -> Option<Caip10> {
    let parts: Vec<&str> = value.trim().split(':').collect();
    if parts.len() < 3 {
        return None;
    }

    let chain = format!("{}:{}", parts[0].trim(), parts[1].trim());
    let address = parts[2..].join(":").trim().to_string();
    if address.is_empty() {
        return None;
    }

    let normalized = normalize_chain_id(&chain);
    Some(Caip10 {
        is_known_chain: normalized.is_some(),
        chain_id: normalized.unwrap_or(chain),
        address,
    })
}

/// Join a chain id and address into CAIP-10 form. Never fails: unknown chains
/// are kept verbatim and addresses that cannot be checksummed are only trimmed.
pub fn build_caip10(chain_id: &str, address: &str) -> String {
    let chain = normalize_chain_id(chain_id).unwrap_or_else(|| chain_id.trim().to_string());
    let address = address.trim();
    let address = if EVM_ADDRESS.is_match(address) {
        to_checksum_address(address).unwrap_or_else(|| address.to_string())
    } else {
        address.to_string()
    };
    format!("{}:{}", chain, address)
}

pub fn is_evm_address_format(address: &str) -> bool {
    EVM_ADDRESS.is_match(address.trim())
}

/// EIP-55 mixed-case encoding of a 20-byte hex address.
pub fn to_checksum_address(address: &str) -> Option<String> {
    let address = address.trim();
    if !EVM_ADDRESS.is_match(address) {
        return None;
    }

    let lower = address[2..].to_ascii_lowercase();
    let hash = hex::encode(keccak256(lower.as_bytes()));

    let checksummed: String = lower
        .chars()
        .zip(hash.chars())
        .map(|(c, h)| {
            let nibble = h.to_digit(16).unwrap_or(0);
            if c.is_ascii_alphabetic() && nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect();

    Some(format!("0x{}", checksummed))
}

/// Accepts all-lowercase or all-uppercase hex without hashing; mixed case must
/// match the EIP-55 checksum exactly.
pub fn is_valid_evm_address(address: &str) -> bool {
    let address = address.trim();
    if !EVM_ADDRESS.is_match(address) {
        return false;
    }

    let hex_part = &address[2..];
    if hex_part == hex_part.to_ascii_lowercase() || hex_part == hex_part.to_ascii_uppercase() {
        return true;
    }

    to_checksum_address(address).is_some_and(|c| c == address)
}

fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut k = Keccak::v256();
    k.update(data);
    let mut out = [0u8; 32];
    k.finalize(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference vectors from EIP-55.
    const VECTORS: &[&str] = &[
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        "0x52908400098527886E0F7030069857D2E4169EE7",
    ];

    #[test]
    fn test_checksum_vectors() {
        for v in VECTORS {
            assert_eq!(to_checksum_address(&v.to_lowercase()).as_deref(), Some(*v));
            assert!(is_valid_evm_address(v));
        }
    }

    #[test]
    fn test_checksum_idempotent() {
        for v in VECTORS {
            let once = to_checksum_address(v).unwrap();
            let twice = to_checksum_address(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_wrong_case_rejected() {
        assert!(!is_valid_evm_address("0x52908400098527886E0F7030069857D2E4169Ee7"));
        assert!(is_valid_evm_address("0x52908400098527886e0f7030069857d2e4169ee7"));
        assert!(is_valid_evm_address("0x52908400098527886E0F7030069857D2E4169EE7"));
        assert!(!is_valid_evm_address("0x1234"));
        assert!(!is_valid_evm_address("52908400098527886e0f7030069857d2e4169ee7"));
    }

    #[test]
    fn test_normalize_chain_id() {
        assert_eq!(normalize_chain_id("EIP155:1").as_deref(), Some("eip155:1"));
        assert_eq!(normalize_chain_id("eip155:424242"), None);
        assert_eq!(normalize_chain_id(""), None);
    }

    #[test]
    fn test_parse_caip10() {
        let parsed = parse_caip10("eip155:8453:0x4200000000000000000000000000000000000006").unwrap();
        assert_eq!(parsed.chain_id, "eip155:8453");
        assert_eq!(parsed.address, "0x4200000000000000000000000000000000000006");
        assert!(parsed.is_known_chain);

        let unknown = parse_caip10("eip155:999:0xabc").unwrap();
        assert!(!unknown.is_known_chain);
        assert_eq!(unknown.chain_id, "eip155:999");

        assert!(parse_caip10("eip155:1").is_none());
        assert!(parse_caip10("eip155:1:   ").is_none());
        assert!(parse_caip10("0x4200000000000000000000000000000000000006").is_none());
    }

    #[test]
    fn test_parse_keeps_colons_in_address() {
        let parsed = parse_caip10("cosmos:cosmoshub-4:addr:with:colons").unwrap();
        assert_eq!(parsed.chain_id, "cosmos:cosmoshub-4");
        assert_eq!(parsed.address, "addr:with:colons");
    }

    #[test]
    fn test_build_round_trip() {
        let address = "0x52908400098527886e0f7030069857d2e4169ee7";
        let built = build_caip10("EIP155:1", address);
        assert_eq!(built, "eip155:1:0x52908400098527886E0F7030069857D2E4169EE7");

        let parsed = parse_caip10(&built).unwrap();
        assert_eq!(parsed.chain_id, "eip155:1");
        assert_eq!(parsed.address, to_checksum_address(address).unwrap());
        assert!(parsed.is_known_chain);
    }

    #[test]
    fn test_build_falls_back_to_raw_input() {
        assert_eq!(build_caip10(" foo:bar ", " some-address "), "foo:bar:some-address");
    }
}
