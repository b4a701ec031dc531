//! Tiered match scoring and catalog search
//!
//! Tiers are evaluated top to bottom and the first hit wins, so a higher tier
//! always outranks a lower one regardless of label length.

use tracing::debug;

use super::distance::levenshtein_similarity;
use super::Labeled;

/// Exact case-insensitive match
pub const EXACT_SCORE: f64 = 100.0;
/// Label starts with the query
pub const PREFIX_SCORE: f64 = 80.0;
/// Label contains the query
pub const CONTAINS_SCORE: f64 = 60.0;
/// A space/hyphen/underscore separated token starts with the query
pub const WORD_BOUNDARY_SCORE: f64 = 50.0;
/// Multiplier applied to edit-distance similarity
pub const FUZZY_WEIGHT: f64 = 40.0;
/// Similarity must exceed this for a fuzzy match
pub const FUZZY_THRESHOLD: f64 = 0.6;

const WORD_SEPARATORS: &[char] = &[' ', '-', '_'];

/// An entry that matched a query, with its score (always > 0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchMatch<'a, T> {
    pub entry: &'a T,
    pub score: f64,
}

/// Trim and lower-case a query the way scoring expects it
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Score `label` against `query`; 0 means no match
///
/// A blank query scores 0 against everything; `search` handles blank
/// queries separately.
pub fn score_match(query: &str, label: &str) -> f64 {
    let query = normalize_query(query);
    if query.is_empty() {
        return 0.0;
    }
    score_normalized(&query, label)
}

/// Score with an already trimmed and lower-cased query
fn score_normalized(query: &str, label: &str) -> f64 {
    let label = label.to_lowercase();

    if label == query {
        EXACT_SCORE
    } else if label.starts_with(query) {
        PREFIX_SCORE
    } else if label.contains(query) {
        CONTAINS_SCORE
    } else if matches_word_boundary(query, &label) {
        WORD_BOUNDARY_SCORE
    } else {
        let similarity = levenshtein_similarity(query, &label);
        if similarity > FUZZY_THRESHOLD {
            similarity * FUZZY_WEIGHT
        } else {
            0.0
        }
    }
}

/// Whether any separator-delimited token of `label` starts with `query`
fn matches_word_boundary(query: &str, label: &str) -> bool {
    label
        .split(WORD_SEPARATORS)
        .any(|token| token.starts_with(query))
}

/// Score every entry and keep the matches, best first
///
/// A blank query matches nothing here. Use [`search`] for the catalog view,
/// which returns the catalog unchanged for blank queries.
pub fn search_scored<'a, T: Labeled>(query: &str, catalog: &'a [T]) -> Vec<SearchMatch<'a, T>> {
    let query = normalize_query(query);
    if query.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<SearchMatch<'a, T>> = catalog
        .iter()
        .filter_map(|entry| {
            let score = score_normalized(&query, entry.label());
            (score > 0.0).then_some(SearchMatch { entry, score })
        })
        .collect();

    // sort_by is stable: equal scores keep catalog order
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));

    debug!(
        query = %query,
        candidates = catalog.len(),
        matches = matches.len(),
        "Search scored"
    );
    matches
}

/// Filter and order `catalog` by relevance to `query`
///
/// A blank or whitespace-only query returns the catalog unchanged.
pub fn search<T: Labeled + Clone>(query: &str, catalog: &[T]) -> Vec<T> {
    if query.trim().is_empty() {
        return catalog.to_vec();
    }
    search_scored(query, catalog)
        .into_iter()
        .map(|m| m.entry.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[String]) -> Vec<&str> {
        items.iter().map(|s| s.as_str()).collect()
    }

    fn catalog(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tier_scores() {
        assert_eq!(score_match("camera", "Camera"), EXACT_SCORE);
        assert_eq!(score_match("cam", "Camera"), PREFIX_SCORE);
        assert_eq!(score_match("mer", "Camera"), CONTAINS_SCORE);
        let fuzzy = score_match("calculater", "Calculator");
        assert!((fuzzy - 0.9 * FUZZY_WEIGHT).abs() < 1e-9);
        assert_eq!(score_match("xyz", "Camera"), 0.0);
    }

    #[test]
    fn test_query_is_trimmed_and_case_folded() {
        assert_eq!(score_match("  CAMERA ", "camera"), EXACT_SCORE);
    }

    #[test]
    fn test_blank_query_scores_zero() {
        assert_eq!(score_match("   ", "Camera"), 0.0);
    }

    #[test]
    fn test_word_boundary_tokens() {
        assert!(matches_word_boundary("gal", "photo gallery"));
        assert!(matches_word_boundary("not", "quick-notes"));
        assert!(matches_word_boundary("pad", "my_pad"));
        assert!(!matches_word_boundary("allery", "photo gallery"));
    }

    #[test]
    fn test_substring_inside_word_is_contains_tier() {
        // "gal" is both a token prefix and a substring; contains is checked first
        assert_eq!(score_match("gal", "Photo Gallery"), CONTAINS_SCORE);
    }

    #[test]
    fn test_exact_beats_prefix_regardless_of_length() {
        let items = catalog(&["abcdef", "Ab"]);
        let results = search("ab", &items);
        assert_eq!(labels(&results), vec!["Ab", "abcdef"]);
        assert_eq!(score_match("ab", "Ab"), 100.0);
        assert_eq!(score_match("ab", "abcdef"), 80.0);
    }

    #[test]
    fn test_tier_dominance_ordering() {
        let items = catalog(&["Tools", "Xtools-pro", "Toolsmith", "tools", "Toolz"]);
        let scored = search_scored("tools", &items);
        let order: Vec<&str> = scored.iter().map(|m| m.entry.as_str()).collect();
        // exact (stable between "Tools" and "tools"), prefix, contains, fuzzy
        assert_eq!(
            order,
            vec!["Tools", "tools", "Toolsmith", "Xtools-pro", "Toolz"]
        );
        assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_calendar_scenario_keeps_input_order() {
        let items = catalog(&["Calculator", "Calendar", "Camera"]);
        let scored = search_scored("cal", &items);

        // "Camera" only shares "ca" and is too far for a fuzzy match
        assert_eq!(scored.len(), 2);
        assert!(scored.iter().all(|m| m.score == PREFIX_SCORE));
        assert_eq!(*scored[0].entry, "Calculator");
        assert_eq!(*scored[1].entry, "Calendar");
    }

    #[test]
    fn test_all_results_have_positive_score() {
        let items = catalog(&["Maps", "Mail", "Messages", "Music", "Weather", "Clock"]);
        for query in ["m", "ma", "mail", "mesages", "zz", "clok"] {
            let scored = search_scored(query, &items);
            assert!(scored.iter().all(|m| m.score > 0.0), "query {:?}", query);
            assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }

    #[test]
    fn test_blank_query_is_identity() {
        let items = catalog(&["Zebra", "Apple", "Mango"]);
        assert_eq!(search("", &items), items);
        assert_eq!(search("   \t", &items), items);
    }

    #[test]
    fn test_no_match_is_excluded() {
        let items = catalog(&["Weather", "Clock"]);
        assert!(search("spreadsheet", &items).is_empty());
    }

    #[test]
    fn test_fuzzy_threshold_is_exclusive() {
        // distance 2 over length 5 → similarity exactly 0.6, not a match
        assert_eq!(score_match("abcde", "abcxy"), 0.0);
        // distance 1 over length 5 → 0.8
        assert!((score_match("abcde", "abcdx") - 0.8 * FUZZY_WEIGHT).abs() < 1e-9);
    }

    #[test]
    fn test_empty_label_never_matches_non_blank_query() {
        let items = catalog(&["", "Notes"]);
        let results = search("no", &items);
        assert_eq!(labels(&results), vec!["Notes"]);
    }
}
