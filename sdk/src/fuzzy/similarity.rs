//! String similarity primitives shared by every matcher.

use std::collections::HashSet;

/// Token overlap at or above this ratio counts as a match.
pub const TOKEN_OVERLAP_THRESHOLD: f64 = 0.7;

/// Classic edit distance with unit insert/delete/substitute costs.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut matrix = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        matrix[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[a.len()][b.len()]
}

/// `1 - distance / max(len)`, in `0.0..=1.0`. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / max_len as f64
}

/// Shorter length over longer length.
pub fn length_ratio(a: &str, b: &str) -> f64 {
    let (la, lb) = (a.chars().count(), b.chars().count());
    let max_len = la.max(lb);
    if max_len == 0 {
        return 0.0;
    }
    la.min(lb) as f64 / max_len as f64
}

/// Lowercased alphanumeric runs.
pub fn tokenize(value: &str) -> HashSet<String> {
    value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Shared tokens relative to the smaller token set.
pub fn token_overlap(a: &str, b: &str) -> f64 {
    let (ta, tb) = (tokenize(a), tokenize(b));
    let smaller = ta.len().min(tb.len());
    if smaller == 0 {
        return 0.0;
    }
    ta.intersection(&tb).count() as f64 / smaller as f64
}

pub fn tokens_overlap(a: &str, b: &str) -> bool {
    token_overlap(a, b) >= TOKEN_OVERLAP_THRESHOLD
}
