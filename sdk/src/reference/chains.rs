//! Chains supported by the label pool.
//!
//! `caip2` is the canonical form used everywhere else in the crate.

use serde::Serialize;

/// Static metadata for one chain.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChainMetadata {
    /// Internal slug (`"arbitrum"`).
    pub id: &'static str,
    /// Display name (`"Arbitrum One"`).
    pub name: &'static str,
    /// Short ticker-like name (`"arb"`).
    pub short_name: &'static str,
    /// Canonical CAIP-2 identifier (`"eip155:42161"`).
    pub caip2: &'static str,
}

const fn chain(
    id: &'static str,
    name: &'static str,
    short_name: &'static str,
    caip2: &'static str,
) -> ChainMetadata {
    ChainMetadata { id, name, short_name, caip2 }
}

/// All known chains.
pub const CHAINS: &[ChainMetadata] = &[
    chain("ethereum", "Ethereum", "eth", "eip155:1"),
    chain("optimism", "OP Mainnet", "op", "eip155:10"),
    chain("bnb", "BNB Smart Chain", "bsc", "eip155:56"),
    chain("gnosis", "Gnosis", "gno", "eip155:100"),
    chain("unichain", "Unichain", "uni", "eip155:130"),
    chain("polygon", "Polygon PoS", "matic", "eip155:137"),
    chain("fraxtal", "Fraxtal", "frax", "eip155:252"),
    chain("zksync_era", "ZKsync Era", "zksync", "eip155:324"),
    chain("worldchain", "World Chain", "wld", "eip155:480"),
    chain("redstone", "Redstone", "redstone", "eip155:690"),
    chain("polygon_zkevm", "Polygon zkEVM", "zkevm", "eip155:1101"),
    chain("lisk", "Lisk", "lsk", "eip155:1135"),
    chain("soneium", "Soneium", "soneium", "eip155:1868"),
    chain("swell", "Swellchain", "swell", "eip155:1923"),
    chain("mantle", "Mantle", "mnt", "eip155:5000"),
    chain("base", "Base", "base", "eip155:8453"),
    chain("mode", "Mode", "mode", "eip155:34443"),
    chain("arbitrum", "Arbitrum One", "arb", "eip155:42161"),
    chain("arbitrum_nova", "Arbitrum Nova", "nova", "eip155:42170"),
    chain("celo", "Celo", "celo", "eip155:42220"),
    chain("ink", "Ink", "ink", "eip155:57073"),
    chain("linea", "Linea", "linea", "eip155:59144"),
    chain("blast", "Blast", "blast", "eip155:81457"),
    chain("taiko", "Taiko Alethia", "taiko", "eip155:167000"),
    chain("scroll", "Scroll", "scr", "eip155:534352"),
    chain("zora", "Zora", "zora", "eip155:7777777"),
    chain("sepolia", "Sepolia", "sep", "eip155:11155111"),
    chain("base_sepolia", "Base Sepolia", "basesep", "eip155:84532"),
    chain("starknet", "Starknet", "strk", "starknet:SN_MAIN"),
    chain("solana", "Solana", "sol", "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp"),
    chain("bitcoin", "Bitcoin", "btc", "bip122:000000000019d6689c085ae165831e93"),
];

/// Common spellings that do not match any id, name or short name.
pub const CHAIN_ALIASES: &[(&str, &str)] = &[
    ("mainnet", "eip155:1"),
    ("ethereum mainnet", "eip155:1"),
    ("eth mainnet", "eip155:1"),
    ("l1", "eip155:1"),
    ("optimism mainnet", "eip155:10"),
    ("opmainnet", "eip155:10"),
    ("binance", "eip155:56"),
    ("bnb chain", "eip155:56"),
    ("xdai", "eip155:100"),
    ("matic", "eip155:137"),
    ("polygon pos", "eip155:137"),
    ("zksync", "eip155:324"),
    ("zksyncera", "eip155:324"),
    ("world", "eip155:480"),
    ("zkevm", "eip155:1101"),
    ("base mainnet", "eip155:8453"),
    ("arbitrum one", "eip155:42161"),
    ("arb1", "eip155:42161"),
    ("arbitrum-one", "eip155:42161"),
    ("nova", "eip155:42170"),
    ("taiko", "eip155:167000"),
    ("scroll mainnet", "eip155:534352"),
    ("starknet mainnet", "starknet:SN_MAIN"),
    ("solana mainnet", "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp"),
];

/// Look up a chain by its canonical CAIP-2 id (case-insensitive).
pub fn chain_by_caip2(caip2: &str) -> Option<&'static ChainMetadata> {
    let needle = caip2.trim();
    CHAINS.iter().find(|c| c.caip2.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_caip2_unique() {
        let ids: HashSet<_> = CHAINS.iter().map(|c| c.caip2).collect();
        assert_eq!(ids.len(), CHAINS.len());
    }

    #[test]
    fn test_aliases_point_to_known_chains() {
        for (alias, target) in CHAIN_ALIASES {
            assert!(chain_by_caip2(target).is_some(), "alias {alias} -> {target}");
        }
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(chain_by_caip2("EIP155:8453").map(|c| c.id), Some("base"));
        assert!(chain_by_caip2("eip155:999999").is_none());
    }
}
