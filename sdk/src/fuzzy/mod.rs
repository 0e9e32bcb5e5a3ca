//! Fuzzy correction engines.
//!
//! Every engine follows the same priority order:
//!
//! ```text
//! alias table ─▶ exact match ─▶ substring / length ratio ─▶ edit distance ─▶ top N
//! ```
//!
//! The score constants (100/95/80/70/60, ratio 0.4, similarity 0.6) are
//! behavioral contracts: suggestion order depends on them.
//!
//! - [`similarity`] - Levenshtein distance and token overlap
//! - [`chain`] - Chain id conversion and suggestions
//! - [`category`] - Usage category aliases and suggestions
//! - [`paymaster`] - Paymaster category aliases and suggestions
//! - [`project`] - Project id validation against the registry

pub mod category;
pub mod chain;
pub mod paymaster;
pub mod project;
pub mod similarity;

pub use category::{convert_category_alias, suggest_categories};
pub use chain::{convert_chain_id, suggest_chains};
pub use paymaster::{convert_paymaster_alias, suggest_paymaster_categories};
pub use project::{find_similar_projects, get_project_validation, suggest_projects, ProjectValidation};
pub use similarity::{levenshtein_distance, similarity as string_similarity, token_overlap};

use std::cmp::Ordering;

use similarity::{length_ratio, similarity as sim};

/// Scores at or below this are dropped for taxonomy suggestions.
pub(crate) const MIN_SUGGESTION_SCORE: f64 = 50.0;

/// Minimum edit-distance similarity before a candidate scores at all.
pub(crate) const MIN_SIMILARITY: f64 = 0.6;

/// Minimum length ratio for a containment match.
pub(crate) const MIN_CONTAINMENT_RATIO: f64 = 0.4;

/// The parts of a taxonomy entry that take part in scoring.
pub(crate) struct Candidate<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub group: Option<&'a str>,
}

/// Score one candidate against a lowercased, trimmed query.
pub(crate) fn score_candidate(query: &str, candidate: &Candidate<'_>) -> f64 {
    let id = candidate.id.to_lowercase();
    let name = candidate.name.to_lowercase();

    if id == query {
        return 100.0;
    }
    if name == query {
        return 95.0;
    }

    if name.contains(query) || query.contains(name.as_str()) {
        let ratio = length_ratio(&name, query);
        if ratio > MIN_CONTAINMENT_RATIO {
            return 80.0 + ratio * 15.0;
        }
    }

    if candidate
        .description
        .is_some_and(|d| d.to_lowercase().contains(query))
    {
        return 70.0;
    }

    if let Some(group) = candidate.group.map(str::to_lowercase) {
        if !group.is_empty() && (group.contains(query) || query.contains(group.as_str())) {
            return 60.0;
        }
    }

    let mut best = 0.0_f64;
    let name_similarity = sim(query, &name);
    if name_similarity > MIN_SIMILARITY {
        best = best.max(name_similarity * 75.0);
    }
    let id_similarity = sim(query, &id);
    if id_similarity > MIN_SIMILARITY {
        best = best.max(id_similarity * 80.0);
    }
    best
}

/// Keep scores above `min_score`, best first (ties keep table order), and
/// return at most `limit` ids.
pub(crate) fn rank<S: Into<String>>(scored: Vec<(S, f64)>, min_score: f64, limit: usize) -> Vec<String> {
    let mut kept: Vec<(S, f64)> = scored.into_iter().filter(|(_, s)| *s > min_score).collect();
    kept.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let mut out: Vec<String> = Vec::with_capacity(limit);
    for (id, _) in kept {
        let id = id.into();
        if !out.contains(&id) {
            out.push(id);
        }
        if out.len() == limit {
            break;
        }
    }
    out
}
