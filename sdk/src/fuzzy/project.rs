//! Project id validation against the project registry.
//!
//! Two independent lists come back for an unknown `owner_project`:
//!
//! - `suggestions`: slugs ranked by score, safe to apply as a fix
//! - `similar_projects`: display names of projects that look related
//!   (shared tokens, same website domain or GitHub org), for humans only

use serde::Serialize;

use crate::models::ProjectRecord;

use super::rank;
use super::similarity::{length_ratio, similarity, tokens_overlap};
use super::{MIN_CONTAINMENT_RATIO, MIN_SIMILARITY};

/// Project scores at or below this are dropped.
const MIN_PROJECT_SCORE: f64 = 40.0;

const MAX_PROJECT_SUGGESTIONS: usize = 5;
const MAX_SIMILAR_PROJECTS: usize = 5;

/// Outcome of checking one `owner_project` value.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectValidation {
    pub valid: bool,
    pub suggestions: Vec<String>,
    pub similar_projects: Vec<String>,
}

/// Exact membership test, with ranked alternatives when it fails.
pub fn get_project_validation(input: &str, projects: &[ProjectRecord]) -> ProjectValidation {
    let value = input.trim();
    if projects.iter().any(|p| p.owner_project == value) {
        return ProjectValidation {
            valid: true,
            ..Default::default()
        };
    }

    ProjectValidation {
        valid: false,
        suggestions: suggest_projects(value, projects),
        similar_projects: find_similar_projects(value, projects),
    }
}

/// Up to five project slugs, best first.
pub fn suggest_projects(input: &str, projects: &[ProjectRecord]) -> Vec<String> {
    let query = input.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let scored = projects
        .iter()
        .map(|p| (p.owner_project.clone(), score_project(&query, p)))
        .collect();

    rank(scored, MIN_PROJECT_SCORE, MAX_PROJECT_SUGGESTIONS)
}

/// Slug matches score in the 80–100 band, display-name matches in 70–90.
fn score_project(query: &str, project: &ProjectRecord) -> f64 {
    let id = project.owner_project.to_lowercase();
    let name = project
        .display_name
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    if id == query {
        return 100.0;
    }
    if !name.is_empty() && name == query {
        return 95.0;
    }

    if contains_either(&id, query) {
        let ratio = length_ratio(&id, query);
        if ratio > MIN_CONTAINMENT_RATIO {
            return 80.0 + ratio * 20.0;
        }
    }
    if !name.is_empty() && contains_either(&name, query) {
        let ratio = length_ratio(&name, query);
        if ratio > MIN_CONTAINMENT_RATIO {
            return 70.0 + ratio * 20.0;
        }
    }

    let mut best = 0.0_f64;
    let id_similarity = similarity(query, &id);
    if id_similarity > MIN_SIMILARITY {
        best = best.max(id_similarity * 80.0);
    }
    if !name.is_empty() {
        let name_similarity = similarity(query, &name);
        if name_similarity > MIN_SIMILARITY {
            best = best.max(name_similarity * 75.0);
        }
    }
    best
}

fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Display names of projects sharing tokens, website domain or GitHub org
/// with the input.
pub fn find_similar_projects(input: &str, projects: &[ProjectRecord]) -> Vec<String> {
    let query = compact(input);
    if query.is_empty() {
        return Vec::new();
    }

    let mut out: Vec<String> = Vec::new();
    for project in projects {
        let keys = [
            Some(project.owner_project.clone()),
            project.display_name.clone(),
            project.website.as_deref().and_then(website_domain),
            project.main_github.as_deref().and_then(github_slug),
        ];

        let related = keys.iter().flatten().any(|key| {
            let compacted = compact(key);
            !compacted.is_empty()
                && (compacted == query
                    || (compacted.len() >= 4 && query.len() >= 4 && contains_either(&compacted, &query))
                    || tokens_overlap(key, input))
        });

        let label = project.label().to_string();
        if related && !out.contains(&label) {
            out.push(label);
            if out.len() == MAX_SIMILAR_PROJECTS {
                break;
            }
        }
    }
    out
}

/// Lowercase, alphanumerics only.
fn compact(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// `https://www.growthepie.xyz/fundamentals` → `growthepie`.
fn website_domain(url: &str) -> Option<String> {
    let without_scheme = url
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.");
    let host = without_scheme.split(['/', '?', '#']).next()?.to_lowercase();
    let mut labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() > 1 {
        labels.pop();
    }
    labels.last().map(|l| l.to_string())
}

/// `https://github.com/growthepie/gtp-backend` → `growthepie`. A bare org
/// name is returned as is.
fn github_slug(value: &str) -> Option<String> {
    let trimmed = value
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.")
        .trim_start_matches("github.com/");
    trimmed
        .split('/')
        .find(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Vec<ProjectRecord> {
        vec![
            ProjectRecord::new("growthepie")
                .with_display_name("growthepie")
                .with_website("https://www.growthepie.xyz")
                .with_github("growthepie"),
            ProjectRecord::new("uniswap")
                .with_display_name("Uniswap")
                .with_website("https://uniswap.org")
                .with_github("https://github.com/Uniswap"),
            ProjectRecord::new("aave").with_display_name("Aave Protocol"),
            ProjectRecord::new("compound-finance").with_display_name("Compound"),
        ]
    }

    #[test]
    fn test_exact_match_is_valid() {
        let result = get_project_validation("uniswap", &registry());
        assert!(result.valid);
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_typo_suggests_slug() {
        let result = get_project_validation("growthpie", &registry());
        assert!(!result.valid);
        assert_eq!(result.suggestions, vec!["growthepie"]);
    }

    #[test]
    fn test_display_name_and_case() {
        assert_eq!(suggest_projects("Compound", &registry()).first().map(String::as_str), Some("compound-finance"));
        assert_eq!(suggest_projects("UNISWAP", &registry()), vec!["uniswap"]);
    }

    #[test]
    fn test_containment_band() {
        let projects = registry();
        let aave = &projects[2];
        // "aave" vs "aave protocol": slug exact would be 100, so use a longer query
        let score = score_project("aave v3", aave);
        assert!(score >= 80.0 && score <= 100.0, "score {score}");
    }

    #[test]
    fn test_similar_projects_by_domain_and_tokens() {
        let projects = registry();
        assert_eq!(find_similar_projects("uniswap.org", &projects), vec!["Uniswap"]);
        assert_eq!(find_similar_projects("Aave Protocol v3", &projects), vec!["Aave Protocol"]);
        assert!(find_similar_projects("", &projects).is_empty());
    }

    #[test]
    fn test_website_domain() {
        assert_eq!(website_domain("https://www.growthepie.xyz/fundamentals").as_deref(), Some("growthepie"));
        assert_eq!(website_domain("app.uniswap.org").as_deref(), Some("uniswap"));
        assert_eq!(github_slug("https://github.com/growthepie/gtp").as_deref(), Some("growthepie"));
    }
}
