//! Chain id conversion.

use crate::caip::normalize_chain_id;
use crate::reference::chains::{chain_by_caip2, CHAINS, CHAIN_ALIASES};

use super::{rank, score_candidate, Candidate, MIN_SUGGESTION_SCORE};

const MAX_CHAIN_SUGGESTIONS: usize = 3;

/// Convert a loose chain reference to its canonical CAIP-2 id.
///
/// Tries, in order: a CAIP-2 id (`eip155:8453`), a bare EVM chain number
/// (`8453`), a chain id / name / short name (`base`), then the alias table
/// (`mainnet`). Returns an empty string when nothing matches; callers keep the
/// original value in that case.
pub fn convert_chain_id(raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        return String::new();
    }

    if let Some(canonical) = normalize_chain_id(value) {
        return canonical;
    }

    if value.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(number) = value.parse::<u64>() {
            if let Some(chain) = chain_by_caip2(&format!("eip155:{}", number)) {
                return chain.caip2.to_string();
            }
        }
        return String::new();
    }

    let lower = value.to_lowercase();
    let spaced = lower.replace(['_', '-'], " ");
    let by_name = CHAINS.iter().find(|c| {
        [c.id, c.name, c.short_name].iter().any(|candidate| {
            let candidate = candidate.to_lowercase();
            candidate == lower || candidate.replace(['_', '-'], " ") == spaced
        })
    });
    if let Some(chain) = by_name {
        return chain.caip2.to_string();
    }

    CHAIN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower || *alias == spaced)
        .map(|(_, caip2)| caip2.to_string())
        .unwrap_or_default()
}

/// Ranked CAIP-2 ids that might be what the caller meant.
pub fn suggest_chains(raw: &str) -> Vec<String> {
    let query = raw.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let scored = CHAINS
        .iter()
        .map(|c| {
            let score = if c.short_name.eq_ignore_ascii_case(&query) {
                95.0
            } else {
                score_candidate(
                    &query,
                    &Candidate { id: c.id, name: c.name, description: None, group: None },
                )
            };
            (c.caip2, score)
        })
        .collect();

    rank(scored, MIN_SUGGESTION_SCORE, MAX_CHAIN_SUGGESTIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_and_numeric() {
        assert_eq!(convert_chain_id("eip155:8453"), "eip155:8453");
        assert_eq!(convert_chain_id(" EIP155:10 "), "eip155:10");
        assert_eq!(convert_chain_id("42161"), "eip155:42161");
        assert_eq!(convert_chain_id("999999999"), "");
    }

    #[test]
    fn test_names_and_aliases() {
        assert_eq!(convert_chain_id("mainnet"), "eip155:1");
        assert_eq!(convert_chain_id("Base"), "eip155:8453");
        assert_eq!(convert_chain_id("arb"), "eip155:42161");
        assert_eq!(convert_chain_id("Arbitrum One"), "eip155:42161");
        assert_eq!(convert_chain_id("arbitrum-nova"), "eip155:42170");
        assert_eq!(convert_chain_id("zksync_era"), "eip155:324");
        assert_eq!(convert_chain_id("starknet"), "starknet:SN_MAIN");
    }

    #[test]
    fn test_unknown_returns_empty() {
        assert_eq!(convert_chain_id(""), "");
        assert_eq!(convert_chain_id("not-a-chain"), "");
        assert_eq!(convert_chain_id("🦀🦀"), "");
    }

    #[test]
    fn test_suggest_chains() {
        assert_eq!(suggest_chains("arbitrum").first().map(String::as_str), Some("eip155:42161"));
        assert_eq!(suggest_chains("optimsm").first().map(String::as_str), Some("eip155:10"));
        assert!(suggest_chains("").is_empty());
    }
}
