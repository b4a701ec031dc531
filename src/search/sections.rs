//! Alphabetical sectioning for the catalog list

use std::collections::BTreeMap;

use super::Labeled;

/// Section key used for labels with no characters
pub const EMPTY_LABEL_SECTION: char = '#';

/// Upper-cased first codepoint of `label`, or `#` when empty
pub fn section_key(label: &str) -> char {
    label
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or(EMPTY_LABEL_SECTION)
}

/// Group entries by section key; keys iterate in sorted order and entries
/// keep their input order within a group
pub fn group_by_first_letter<T: Labeled + Clone>(catalog: &[T]) -> BTreeMap<char, Vec<T>> {
    let mut groups: BTreeMap<char, Vec<T>> = BTreeMap::new();
    for entry in catalog {
        groups
            .entry(section_key(entry.label()))
            .or_default()
            .push(entry.clone());
    }
    groups
}

/// Index of the first entry for each section key, in the caller's order
///
/// The list is not re-sorted; a key that reappears later keeps its first index.
pub fn sections<T: Labeled>(catalog: &[T]) -> BTreeMap<char, usize> {
    let mut sections = BTreeMap::new();
    for (index, entry) in catalog.iter().enumerate() {
        sections.entry(section_key(entry.label())).or_insert(index);
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_section_key() {
        assert_eq!(section_key("camera"), 'C');
        assert_eq!(section_key("Éclair"), 'É');
        assert_eq!(section_key("2048"), '2');
        assert_eq!(section_key(""), '#');
    }

    #[test]
    fn test_group_by_first_letter_sorted_keys() {
        let items = catalog(&["maps", "Calendar", "", "camera", "Mail"]);
        let groups = group_by_first_letter(&items);

        let keys: Vec<char> = groups.keys().copied().collect();
        assert_eq!(keys, vec!['#', 'C', 'M']);
        assert_eq!(groups[&'C'], vec!["Calendar", "camera"]);
        assert_eq!(groups[&'M'], vec!["maps", "Mail"]);
        assert_eq!(groups[&'#'], vec![""]);
    }

    #[test]
    fn test_sections_record_first_index_without_resorting() {
        let items = catalog(&["Camera", "Alarm", "Calendar", "Books"]);
        let sections = sections(&items);

        assert_eq!(sections[&'C'], 0);
        assert_eq!(sections[&'A'], 1);
        assert_eq!(sections[&'B'], 3);
        assert_eq!(sections.len(), 3);
    }

    #[test]
    fn test_sections_empty_catalog() {
        let items: Vec<String> = Vec::new();
        assert!(sections(&items).is_empty());
        assert!(group_by_first_letter(&items).is_empty());
    }
}
