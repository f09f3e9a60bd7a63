//! Text utilities shared by the heuristic detectors.

use std::collections::HashSet;

/// Lower-cased whitespace-delimited word set of a message.
pub fn word_set(content: &str) -> HashSet<String> {
    content
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity of two word sets.
///
/// Returns 0.0 when either set is empty, so blank messages never count as
/// repeats of each other.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Highest pairwise Jaccard similarity among the given messages.
pub fn max_pairwise_similarity<'a>(contents: impl IntoIterator<Item = &'a str>) -> f64 {
    let sets: Vec<HashSet<String>> = contents.into_iter().map(word_set).collect();
    let mut max = 0.0_f64;
    for (i, left) in sets.iter().enumerate() {
        for right in &sets[i + 1..] {
            max = max.max(jaccard(left, right));
        }
    }
    max
}

/// Truncate a string to a maximum byte length with ellipsis (UTF-8 safe).
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
