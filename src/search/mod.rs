//! Fuzzy search over the app catalog
//!
//! This module provides:
//! - Tiered scoring (exact, prefix, substring, word boundary, edit distance)
//! - Levenshtein distance over Unicode codepoints
//! - Alphabetical grouping and section indices for fast scrolling
//!
//! Everything here is pure and CPU-bound; it is safe to call inline from
//! the refresh pass or a render loop.

mod distance;
mod scoring;
mod sections;

pub use distance::{levenshtein_distance, levenshtein_similarity};
pub use scoring::{
    normalize_query, score_match, search, search_scored, SearchMatch, CONTAINS_SCORE,
    EXACT_SCORE, FUZZY_THRESHOLD, FUZZY_WEIGHT, PREFIX_SCORE, WORD_BOUNDARY_SCORE,
};
pub use sections::{group_by_first_letter, section_key, sections, EMPTY_LABEL_SECTION};

/// Anything with a display label that search and sectioning can read
pub trait Labeled {
    fn label(&self) -> &str;
}

impl Labeled for String {
    fn label(&self) -> &str {
        self
    }
}

impl Labeled for &str {
    fn label(&self) -> &str {
        self
    }
}

impl<T: Labeled> Labeled for std::sync::Arc<T> {
    fn label(&self) -> &str {
        (**self).label()
    }
}
