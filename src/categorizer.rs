//! Rule-based app categorization
//!
//! Each catalog entry lands in exactly one [`Category`] by walking a fixed
//! decision chain; the first applicable rule wins:
//!
//! 1. manual override
//! 2. personal/dev package prefix (disabled when empty)
//! 3. platform category hint "game"
//! 4. curated professional/banking package fragments
//! 5. curated utility package fragments
//! 6. system app flag
//! 7. Other
//!
//! The curated tables are data handed in through [`CategoryRules`], so tests
//! and regional builds can swap them without touching the engine.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::catalog::CatalogEntry;
use crate::config::{CategoriesConfig, PROFESSIONAL_KEYWORDS};
use crate::usage_ranker::Scored;

/// Fixed, totally ordered set of categories (declaration order is page order)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Games,
    Professional,
    PersonalDev,
    Utilities,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Games,
        Category::Professional,
        Category::PersonalDev,
        Category::Utilities,
        Category::Other,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Games => "Games",
            Category::Professional => "Professional & Banking",
            Category::PersonalDev => "My Apps",
            Category::Utilities => "Utilities & Tools",
            Category::Other => "Other",
        }
    }

    /// Position of the category in page order
    pub fn order(&self) -> usize {
        *self as usize
    }

    /// Inverse of `order`; unknown positions fall back to Other
    pub fn from_order(order: usize) -> Category {
        Category::ALL
            .get(order)
            .copied()
            .unwrap_or(Category::Other)
    }
}

/// Anything that already carries its category
pub trait Categorized {
    fn category(&self) -> Category;
}

/// Injected rule data for the categorizer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryRules {
    pub personal_dev_prefix: String,
    /// Lower-cased professional package fragments
    pub professional_packages: Vec<String>,
    /// Lower-cased utility package fragments
    pub utility_packages: Vec<String>,
    /// Manual category per package identifier
    pub overrides: HashMap<String, Category>,
}

impl CategoryRules {
    pub fn new(
        personal_dev_prefix: impl Into<String>,
        professional_packages: impl IntoIterator<Item = impl AsRef<str>>,
        utility_packages: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        CategoryRules {
            personal_dev_prefix: personal_dev_prefix.into(),
            professional_packages: lowercase_all(professional_packages),
            utility_packages: lowercase_all(utility_packages),
            overrides: HashMap::new(),
        }
    }

    pub fn from_config(config: &CategoriesConfig) -> Self {
        let mut rules = Self::new(
            config.personal_dev_prefix.clone(),
            &config.professional_packages,
            &config.utility_packages,
        );
        rules.overrides = config.overrides.clone();
        rules
    }

    pub fn with_override(mut self, package: impl Into<String>, category: Category) -> Self {
        self.overrides.insert(package.into(), category);
        self
    }
}

fn lowercase_all(items: impl IntoIterator<Item = impl AsRef<str>>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.as_ref().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Categorizes catalog entries from injected rules
#[derive(Debug, Clone, Default)]
pub struct AppCategorizer {
    rules: CategoryRules,
}

impl AppCategorizer {
    pub fn new(rules: CategoryRules) -> Self {
        AppCategorizer { rules }
    }

    /// Categorizer with the built-in curated tables and no dev prefix
    pub fn with_default_rules() -> Self {
        Self::new(CategoryRules::from_config(&CategoriesConfig::default()))
    }

    pub fn rules(&self) -> &CategoryRules {
        &self.rules
    }

    /// Category for `entry`; total and deterministic
    ///
    /// `manual_override` wins over everything, then the entry's own pinned
    /// category, then the configured per-package override.
    pub fn categorize(&self, entry: &CatalogEntry, manual_override: Option<Category>) -> Category {
        if let Some(category) = manual_override
            .or(entry.manual_category)
            .or_else(|| self.rules.overrides.get(entry.package()).copied())
        {
            return category;
        }

        let package = entry.package();

        if !self.rules.personal_dev_prefix.is_empty()
            && package.starts_with(&self.rules.personal_dev_prefix)
        {
            return Category::PersonalDev;
        }

        if entry
            .category_hint
            .as_deref()
            .is_some_and(|hint| hint.eq_ignore_ascii_case("game"))
        {
            return Category::Games;
        }

        let package_lower = package.to_lowercase();

        if contains_any(&package_lower, &self.rules.professional_packages) {
            return Category::Professional;
        }

        if contains_any(&package_lower, &self.rules.utility_packages) {
            return Category::Utilities;
        }

        if entry.is_system_app {
            return Category::Utilities;
        }

        Category::Other
    }

    /// Curated professional package, or one whose name mentions banking,
    /// finance or trading
    pub fn is_professional_package(&self, package: &str) -> bool {
        let package_lower = package.to_lowercase();
        contains_any(&package_lower, &self.rules.professional_packages)
            || PROFESSIONAL_KEYWORDS
                .iter()
                .any(|keyword| package_lower.contains(keyword))
    }

    pub fn is_utility_package(&self, package: &str) -> bool {
        contains_any(&package.to_lowercase(), &self.rules.utility_packages)
    }
}

fn contains_any(package_lower: &str, fragments: &[String]) -> bool {
    fragments
        .iter()
        .any(|fragment| package_lower.contains(fragment.as_str()))
}

/// Group entries by category, iterating in category order; entries keep
/// their input order within a group
pub fn group_by_category<T: Categorized + Clone>(entries: &[T]) -> BTreeMap<Category, Vec<T>> {
    let mut groups: BTreeMap<Category, Vec<T>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.category()).or_default().push(entry.clone());
    }
    groups
}

/// Stable sort by score, highest first; equal scores keep input order.
/// Uses the IEEE total order so a NaN score cannot break the ordering.
pub fn sort_by_score_descending<T: Scored>(entries: &mut [T]) {
    entries.sort_by(|a, b| b.score().total_cmp(&a.score()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ComponentId, RankedEntry, UserId};

    fn entry(package: &str) -> CatalogEntry {
        CatalogEntry::new(
            ComponentId::new(package, format!("{}.MainActivity", package)),
            UserId(0),
            package,
        )
    }

    fn synthetic_rules() -> CategoryRules {
        CategoryRules::new("dev.me.", ["acme.bank"], ["acme.tools"])
    }

    #[test]
    fn test_category_total_order() {
        assert!(Category::Games < Category::Professional);
        assert!(Category::Professional < Category::PersonalDev);
        assert!(Category::PersonalDev < Category::Utilities);
        assert!(Category::Utilities < Category::Other);
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.order(), i);
            assert_eq!(Category::from_order(i), *category);
        }
        assert_eq!(Category::from_order(99), Category::Other);
    }

    #[test]
    fn test_manual_override_always_wins() {
        let categorizer = AppCategorizer::new(synthetic_rules());
        let game_bank = entry("acme.bank.mobile")
            .with_category_hint("game")
            .with_system_app(true);

        for category in Category::ALL {
            assert_eq!(categorizer.categorize(&game_bank, Some(category)), category);
        }
    }

    #[test]
    fn test_entry_pin_and_config_override() {
        let rules = synthetic_rules().with_override("acme.tools.grep", Category::Games);
        let categorizer = AppCategorizer::new(rules);

        assert_eq!(
            categorizer.categorize(&entry("acme.tools.grep"), None),
            Category::Games
        );
        let pinned = entry("acme.tools.grep").with_manual_category(Category::Other);
        assert_eq!(categorizer.categorize(&pinned, None), Category::Other);
    }

    #[test]
    fn test_personal_dev_prefix() {
        let categorizer = AppCategorizer::new(synthetic_rules());
        let dev = entry("dev.me.tracker").with_category_hint("game");
        assert_eq!(categorizer.categorize(&dev, None), Category::PersonalDev);
    }

    #[test]
    fn test_empty_prefix_disables_rule() {
        let categorizer = AppCategorizer::new(CategoryRules::new("", ["acme.bank"], ["acme.tools"]));
        assert_eq!(categorizer.categorize(&entry("dev.me.tracker"), None), Category::Other);
    }

    #[test]
    fn test_game_hint_beats_curated_lists() {
        let categorizer = AppCategorizer::new(synthetic_rules());
        let e = entry("acme.bank.quest").with_category_hint("game");
        assert_eq!(categorizer.categorize(&e, None), Category::Games);
        let e = entry("org.puzzle").with_category_hint("Game");
        assert_eq!(categorizer.categorize(&e, None), Category::Games);
        let e = entry("org.puzzle").with_category_hint("productivity");
        assert_eq!(categorizer.categorize(&e, None), Category::Other);
    }

    #[test]
    fn test_curated_lists_match_case_insensitive_substrings() {
        let categorizer = AppCategorizer::new(synthetic_rules());
        assert_eq!(
            categorizer.categorize(&entry("com.ACME.Bank.app"), None),
            Category::Professional
        );
        assert_eq!(
            categorizer.categorize(&entry("x.acme.tools.shell"), None),
            Category::Utilities
        );
    }

    #[test]
    fn test_professional_checked_before_utilities() {
        let categorizer =
            AppCategorizer::new(CategoryRules::new("", ["acme"], ["acme.tools"]));
        assert_eq!(
            categorizer.categorize(&entry("acme.tools.x"), None),
            Category::Professional
        );
    }

    #[test]
    fn test_system_app_falls_back_to_utilities() {
        let categorizer = AppCategorizer::new(synthetic_rules());
        let system = entry("org.vendor.thing").with_system_app(true);
        assert_eq!(categorizer.categorize(&system, None), Category::Utilities);
        assert_eq!(
            categorizer.categorize(&entry("org.vendor.thing"), None),
            Category::Other
        );
    }

    #[test]
    fn test_default_rules_use_curated_tables() {
        let categorizer = AppCategorizer::with_default_rules();
        assert_eq!(
            categorizer.categorize(&entry("com.chase.sig.android"), None),
            Category::Professional
        );
        assert_eq!(
            categorizer.categorize(&entry("com.google.android.calculator"), None),
            Category::Utilities
        );
        assert_eq!(
            categorizer.categorize(&entry("org.example.unknown"), None),
            Category::Other
        );
    }

    #[test]
    fn test_categorize_is_deterministic() {
        let categorizer = AppCategorizer::with_default_rules();
        let entries = vec![
            entry("com.slack"),
            entry("org.chess").with_category_hint("game"),
            entry("org.vendor").with_system_app(true),
            entry(""),
        ];
        for e in &entries {
            let first = categorizer.categorize(e, None);
            for _ in 0..5 {
                assert_eq!(categorizer.categorize(e, None), first);
            }
        }
    }

    #[test]
    fn test_is_professional_package_keywords() {
        let categorizer = AppCategorizer::new(synthetic_rules());
        assert!(categorizer.is_professional_package("acme.bank.mobile"));
        assert!(categorizer.is_professional_package("org.localbank.app"));
        assert!(categorizer.is_professional_package("io.FinanceTracker"));
        assert!(categorizer.is_professional_package("io.daytrading"));
        assert!(!categorizer.is_professional_package("io.chess"));
        assert!(categorizer.is_utility_package("ACME.tools.grep"));
        assert!(!categorizer.is_utility_package("io.chess"));
    }

    fn ranked(label: &str, category: Category, usage_rank: f64) -> RankedEntry {
        RankedEntry {
            entry: entry(label),
            category,
            usage_rank,
        }
    }

    #[test]
    fn test_group_by_category_orders_by_rank() {
        let entries = vec![
            ranked("a", Category::Other, 0.0),
            ranked("b", Category::Games, 0.0),
            ranked("c", Category::Utilities, 0.0),
            ranked("d", Category::Games, 0.0),
        ];
        let groups = group_by_category(&entries);

        let keys: Vec<Category> = groups.keys().copied().collect();
        assert_eq!(
            keys,
            vec![Category::Games, Category::Utilities, Category::Other]
        );
        let games: Vec<&str> = groups[&Category::Games]
            .iter()
            .map(|e| e.entry.label.as_str())
            .collect();
        assert_eq!(games, vec!["b", "d"]);
    }

    #[test]
    fn test_sort_by_score_descending_is_stable() {
        let mut entries = vec![
            ranked("low", Category::Other, 0.1),
            ranked("tie1", Category::Other, 0.5),
            ranked("high", Category::Other, 2.0),
            ranked("tie2", Category::Other, 0.5),
        ];
        sort_by_score_descending(&mut entries);
        let order: Vec<&str> = entries.iter().map(|e| e.entry.label.as_str()).collect();
        assert_eq!(order, vec!["high", "tie1", "tie2", "low"]);
    }

    #[test]
    fn test_sort_by_score_descending_orders_around_nan() {
        let mut entries = vec![
            ranked("one", Category::Other, 1.0),
            ranked("nan", Category::Other, f64::NAN),
            ranked("two", Category::Other, 2.0),
            ranked("half", Category::Other, 0.5),
        ];
        sort_by_score_descending(&mut entries);

        let finite: Vec<&str> = entries
            .iter()
            .filter(|e| !e.usage_rank.is_nan())
            .map(|e| e.entry.label.as_str())
            .collect();
        assert_eq!(finite, vec!["two", "one", "half"]);
        let nan_at = entries
            .iter()
            .position(|e| e.usage_rank.is_nan())
            .unwrap();
        assert!(nan_at == 0 || nan_at == entries.len() - 1);
    }
}
