//! Usage categories for `usage_category`.

use serde::Serialize;

/// One entry of the usage category taxonomy.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Grouping used for display (`"defi"`, `"social"`, ...).
    pub main_category: &'static str,
}

const fn category(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    main_category: &'static str,
) -> CategoryDefinition {
    CategoryDefinition { id, name, description, main_category }
}

pub const CATEGORIES: &[CategoryDefinition] = &[
    // Centralized finance
    category("trading", "Centralized Exchange", "Deposit and withdrawal wallets of centralized exchanges", "cefi"),
    category("cex", "CEX Hot Wallet", "Hot wallets operated by centralized exchanges", "cefi"),
    // Decentralized finance
    category("dex", "Decentralized Exchange", "Automated market makers, order books and swap aggregators", "defi"),
    category("lending", "Lending", "Borrowing and lending markets, money markets and CDPs", "defi"),
    category("derivative", "Derivatives", "Perpetuals, options and synthetic asset protocols", "defi"),
    category("staking", "Staking", "Liquid staking, restaking and validator deposit contracts", "defi"),
    category("yield_vaults", "Yield Vaults", "Vaults and strategies that compound or route yield", "defi"),
    category("index", "Index", "Token baskets and structured index products", "defi"),
    category("rwa", "Real World Assets", "Tokenized treasuries, credit and other off-chain assets", "defi"),
    category("insurance", "Insurance", "Cover markets and risk pools", "defi"),
    category("custody", "Custody", "Multisig wallets, vaults and custodial solutions", "defi"),
    // Cross-chain
    category("bridge", "Bridge", "Token bridges and canonical bridge escrows", "cross_chain"),
    category("cc_communication", "Cross-Chain Communication", "Messaging layers and interoperability protocols", "cross_chain"),
    // Token transfers
    category("stablecoin", "Stablecoin", "Fiat-backed and algorithmic stablecoin contracts", "token_transfers"),
    category("fungible_tokens", "Fungible Tokens", "ERC-20 token contracts", "token_transfers"),
    category("non_fungible_tokens", "Non-Fungible Tokens", "ERC-721 and ERC-1155 collections", "token_transfers"),
    category("native_transfer", "Native Transfer", "Plain native token transfers", "token_transfers"),
    // NFT
    category("nft_marketplace", "NFT Marketplace", "Marketplaces for trading NFTs", "nft"),
    category("nft_fi", "NFT Finance", "NFT lending, fractionalization and derivatives", "nft"),
    // Social
    category("gaming", "Gaming", "On-chain games and game assets", "social"),
    category("community", "Community", "DAOs, clubs and community tooling", "social"),
    category("governance", "Governance", "Voting, delegation and treasury management", "social"),
    category("identity", "Identity", "Name services, attestations and reputation", "social"),
    category("social", "Social Network", "Decentralized social graphs and messaging", "social"),
    // Utility
    category("erc4337", "Account Abstraction", "Entry points, bundlers and smart accounts", "utility"),
    category("oracle", "Oracle", "Price feeds and data oracles", "utility"),
    category("developer_tools", "Developer Tools", "Deployers, factories and infrastructure used by builders", "utility"),
    category("middleware", "Middleware", "Automation, keepers and relayers", "utility"),
    category("privacy", "Privacy", "Mixers and privacy-preserving protocols", "utility"),
    category("payments", "Payments", "Payment processing, streaming and invoicing", "utility"),
    category("airdrop", "Airdrop", "Token distribution and claim contracts", "utility"),
    category("depin", "DePIN", "Decentralized physical infrastructure networks", "utility"),
    category("ai_agent", "AI Agent", "Autonomous agents acting on-chain", "utility"),
    category("mev", "MEV", "Searchers, builders and arbitrage bots", "utility"),
    category("other", "Other", "Anything that does not fit another category", "unlabeled"),
];

/// Informal names people use for categories.
pub const CATEGORY_ALIASES: &[(&str, &str)] = &[
    ("defi", "dex"),
    ("exchange", "dex"),
    ("swap", "dex"),
    ("swaps", "dex"),
    ("amm", "dex"),
    ("aggregator", "dex"),
    ("decentralized exchange", "dex"),
    ("cefi", "trading"),
    ("centralized exchange", "trading"),
    ("lend", "lending"),
    ("borrow", "lending"),
    ("money market", "lending"),
    ("perps", "derivative"),
    ("perpetuals", "derivative"),
    ("options", "derivative"),
    ("derivatives", "derivative"),
    ("liquid staking", "staking"),
    ("restaking", "staking"),
    ("lst", "staking"),
    ("vault", "yield_vaults"),
    ("vaults", "yield_vaults"),
    ("yield", "yield_vaults"),
    ("real world assets", "rwa"),
    ("multisig", "custody"),
    ("safe", "custody"),
    ("bridges", "bridge"),
    ("interop", "cc_communication"),
    ("messaging", "cc_communication"),
    ("stable", "stablecoin"),
    ("stablecoins", "stablecoin"),
    ("token", "fungible_tokens"),
    ("erc20", "fungible_tokens"),
    ("nft", "non_fungible_tokens"),
    ("nfts", "non_fungible_tokens"),
    ("erc721", "non_fungible_tokens"),
    ("marketplace", "nft_marketplace"),
    ("nft marketplace", "nft_marketplace"),
    ("game", "gaming"),
    ("games", "gaming"),
    ("dao", "governance"),
    ("voting", "governance"),
    ("ens", "identity"),
    ("naming", "identity"),
    ("account abstraction", "erc4337"),
    ("aa", "erc4337"),
    ("4337", "erc4337"),
    ("price feed", "oracle"),
    ("oracles", "oracle"),
    ("dev tools", "developer_tools"),
    ("tooling", "developer_tools"),
    ("infra", "developer_tools"),
    ("automation", "middleware"),
    ("keeper", "middleware"),
    ("relayer", "middleware"),
    ("mixer", "privacy"),
    ("payment", "payments"),
    ("claim", "airdrop"),
    ("ai", "ai_agent"),
    ("agent", "ai_agent"),
    ("bot", "mev"),
    ("arbitrage", "mev"),
    ("unknown", "other"),
    ("misc", "other"),
];

pub fn category_by_id(id: &str) -> Option<&'static CategoryDefinition> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// Exact membership test against the taxonomy ids.
pub fn is_valid_category(id: &str) -> bool {
    category_by_id(id.trim()).is_some()
}
