//! Edit distance over Unicode codepoints

/// Levenshtein distance between the lower-cased forms of `a` and `b`
///
/// Unit cost for insertion, deletion and substitution. Uses two rolling rows
/// instead of the full table.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    distance_chars(&a, &b)
}

/// Similarity in `[0, 1]`: `1 - distance / max(len(a), len(b))`
///
/// Two empty strings are identical (1.0).
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - distance_chars(&a, &b) as f64 / max_len as f64
}

fn distance_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1) // deletion
                .min(curr[j] + 1) // insertion
                .min(prev[j] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_zero() {
        for s in ["", "a", "Calendar", "日本語", "naïve café"] {
            assert_eq!(levenshtein_distance(s, s), 0, "{:?}", s);
        }
    }

    #[test]
    fn test_empty_strings() {
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("", ""), 0);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ("kitten", "sitting"),
            ("flaw", "lawn"),
            ("camera", "cmaera"),
            ("", "xyz"),
            ("Ünïcode", "unicode"),
        ];
        for (a, b) in pairs {
            assert_eq!(levenshtein_distance(a, b), levenshtein_distance(b, a));
        }
    }

    #[test]
    fn test_classic_examples() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("flaw", "lawn"), 2);
        assert_eq!(levenshtein_distance("calculater", "calculator"), 1);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(levenshtein_distance("CAMERA", "camera"), 0);
        assert_eq!(levenshtein_distance("Maps", "mapz"), 1);
    }

    #[test]
    fn test_counts_codepoints_not_bytes() {
        // Each of these is one codepoint but several UTF-8 bytes
        assert_eq!(levenshtein_distance("é", "e"), 1);
        assert_eq!(levenshtein_distance("日本", "日"), 1);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(levenshtein_similarity("", ""), 1.0);
        assert_eq!(levenshtein_similarity("abc", "abc"), 1.0);
        assert_eq!(levenshtein_similarity("abc", ""), 0.0);
        assert!((levenshtein_similarity("calculater", "calculator") - 0.9).abs() < 1e-12);
    }
}
