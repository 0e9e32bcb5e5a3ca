//! Usage category aliases and suggestions.

use crate::reference::categories::{is_valid_category, CATEGORIES, CATEGORY_ALIASES};

use super::{rank, score_candidate, Candidate, MIN_SUGGESTION_SCORE};

const MAX_CATEGORY_SUGGESTIONS: usize = 5;

/// Resolve an informal category name (`"defi"` → `"dex"`).
///
/// Best effort: anything that is not an alias comes back unchanged, valid or
/// not.
pub fn convert_category_alias(raw: &str) -> String {
    let key = raw.trim().to_lowercase();
    if is_valid_category(&key) {
        return key;
    }
    CATEGORY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, id)| id.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Up to five category ids ranked by similarity to `raw`.
pub fn suggest_categories(raw: &str) -> Vec<String> {
    let query = raw.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let scored = CATEGORIES
        .iter()
        .map(|c| {
            let candidate = Candidate {
                id: c.id,
                name: c.name,
                description: Some(c.description),
                group: Some(c.main_category),
            };
            (c.id, score_candidate(&query, &candidate))
        })
        .collect();

    rank(scored, MIN_SUGGESTION_SCORE, MAX_CATEGORY_SUGGESTIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_conversion() {
        assert_eq!(convert_category_alias("defi"), "dex");
        assert_eq!(convert_category_alias("  DeFi "), "dex");
        assert_eq!(convert_category_alias("NFT Marketplace"), "nft_marketplace");
        assert_eq!(convert_category_alias("DEX"), "dex");
    }

    #[test]
    fn test_unknown_is_returned_unchanged() {
        assert_eq!(convert_category_alias("Some Thing"), "Some Thing");
        assert_eq!(convert_category_alias(""), "");
        assert_eq!(convert_category_alias("\u{0}💥"), "\u{0}💥");
    }

    #[test]
    fn test_suggestions() {
        assert_eq!(suggest_categories("lendng").first().map(String::as_str), Some("lending"));
        assert_eq!(suggest_categories("Bridge").first().map(String::as_str), Some("bridge"));
        assert!(suggest_categories("qqqqqqqqqqqq").is_empty());
        assert!(suggest_categories("  ").is_empty());
    }

    #[test]
    fn test_suggestions_capped_at_five() {
        assert!(suggest_categories("token").len() <= 5);
    }
}
