//! Paymaster category aliases and suggestions.

use crate::reference::paymaster::{is_valid_paymaster_category, PAYMASTER_ALIASES, PAYMASTER_CATEGORIES};

use super::{rank, score_candidate, Candidate, MIN_SUGGESTION_SCORE};

const MAX_PAYMASTER_SUGGESTIONS: usize = 3;

/// Resolve an informal paymaster category; unknown input comes back unchanged.
pub fn convert_paymaster_alias(raw: &str) -> String {
    let key = raw.trim().to_lowercase();
    if is_valid_paymaster_category(&key) {
        return key;
    }
    PAYMASTER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, id)| id.to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn suggest_paymaster_categories(raw: &str) -> Vec<String> {
    let query = raw.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let scored = PAYMASTER_CATEGORIES
        .iter()
        .map(|p| {
            let candidate = Candidate {
                id: p.id,
                name: p.name,
                description: Some(p.description),
                group: None,
            };
            (p.id, score_candidate(&query, &candidate))
        })
        .collect();

    rank(scored, MIN_SUGGESTION_SCORE, MAX_PAYMASTER_SUGGESTIONS)
}
