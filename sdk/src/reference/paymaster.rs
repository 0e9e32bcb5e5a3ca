//! Paymaster categories for `paymaster_category`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymasterCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const PAYMASTER_CATEGORIES: &[PaymasterCategory] = &[
    PaymasterCategory {
        id: "verifying",
        name: "Verifying Paymaster",
        description: "Sponsors gas after an off-chain signer approves the user operation",
    },
    PaymasterCategory {
        id: "token",
        name: "Token Paymaster",
        description: "Lets users pay gas in ERC-20 tokens",
    },
    PaymasterCategory {
        id: "verifying_and_token",
        name: "Verifying and Token Paymaster",
        description: "Supports both sponsored and token-denominated gas payment",
    },
];

pub const PAYMASTER_ALIASES: &[(&str, &str)] = &[
    ("verify", "verifying"),
    ("verifier", "verifying"),
    ("sponsor", "verifying"),
    ("sponsored", "verifying"),
    ("sponsoring", "verifying"),
    ("gasless", "verifying"),
    ("verifying paymaster", "verifying"),
    ("erc20", "token"),
    ("erc-20", "token"),
    ("erc20 paymaster", "token"),
    ("tokens", "token"),
    ("token paymaster", "token"),
    ("hybrid", "verifying_and_token"),
    ("both", "verifying_and_token"),
    ("verifying and token", "verifying_and_token"),
    ("verifying+token", "verifying_and_token"),
];

pub fn is_valid_paymaster_category(id: &str) -> bool {
    let id = id.trim();
    PAYMASTER_CATEGORIES.iter().any(|p| p.id == id)
}
