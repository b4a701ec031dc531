//! Catalog data types
//!
//! Entries are immutable once loaded; a reload replaces the whole list.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::categorizer::{Categorized, Category};
use crate::usage_ranker::Scored;
use crate::search::Labeled;

/// Identity of a launchable component: owning package plus activity class
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId {
    pub package: String,
    pub class: String,
}

impl ComponentId {
    pub fn new(package: impl Into<String>, class: impl Into<String>) -> Self {
        ComponentId {
            package: package.into(),
            class: class.into(),
        }
    }

    /// `package/class`, abbreviating the class to `.Suffix` when it lives
    /// inside the package namespace
    pub fn flatten_short(&self) -> String {
        match self.class.strip_prefix(&self.package) {
            Some(rest) if rest.starts_with('.') => format!("{}/{}", self.package, rest),
            _ => format!("{}/{}", self.package, self.class),
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flatten_short())
    }
}

/// User/profile that owns an installed component (work profiles get their own id)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A launchable application as reported by the catalog source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub component: ComponentId,
    #[serde(default)]
    pub user: UserId,
    pub label: String,
    /// Category pinned by the user; wins over every heuristic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_category: Option<Category>,
    #[serde(default)]
    pub is_system_app: bool,
    /// Category reported by the platform, e.g. "game"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_hint: Option<String>,
}

impl CatalogEntry {
    pub fn new(component: ComponentId, user: UserId, label: impl Into<String>) -> Self {
        CatalogEntry {
            component,
            user,
            label: label.into(),
            manual_category: None,
            is_system_app: false,
            category_hint: None,
        }
    }

    pub fn package(&self) -> &str {
        &self.component.package
    }

    pub fn with_category_hint(mut self, hint: impl Into<String>) -> Self {
        self.category_hint = Some(hint.into());
        self
    }

    pub fn with_system_app(mut self, is_system_app: bool) -> Self {
        self.is_system_app = is_system_app;
        self
    }

    pub fn with_manual_category(mut self, category: Category) -> Self {
        self.manual_category = Some(category);
        self
    }
}

impl Labeled for CatalogEntry {
    fn label(&self) -> &str {
        &self.label
    }
}

/// Package change notification delivered by a catalog source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageEvent {
    Added { package: String, user: UserId },
    Removed { package: String, user: UserId },
}

impl PackageEvent {
    pub fn package(&self) -> &str {
        match self {
            PackageEvent::Added { package, .. } | PackageEvent::Removed { package, .. } => package,
        }
    }

    pub fn user(&self) -> UserId {
        match self {
            PackageEvent::Added { user, .. } | PackageEvent::Removed { user, .. } => *user,
        }
    }
}

/// A catalog entry after categorization and ranking, as published for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub category: Category,
    pub usage_rank: f64,
}

impl Labeled for RankedEntry {
    fn label(&self) -> &str {
        &self.entry.label
    }
}

impl Categorized for RankedEntry {
    fn category(&self) -> Category {
        self.category
    }
}

impl Scored for RankedEntry {
    fn score(&self) -> f64 {
        self.usage_rank
    }
}

/// Sort entries case-insensitively by label (stable)
pub fn sort_by_label<T: Labeled>(entries: &mut [T]) {
    entries.sort_by_cached_key(|e| e.label().to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_short_abbreviates_inner_class() {
        let id = ComponentId::new("com.example.mail", "com.example.mail.InboxActivity");
        assert_eq!(id.flatten_short(), "com.example.mail/.InboxActivity");
    }

    #[test]
    fn test_flatten_short_keeps_foreign_class() {
        let id = ComponentId::new("com.example.mail", "org.other.Launcher");
        assert_eq!(id.flatten_short(), "com.example.mail/org.other.Launcher");
        // A shared prefix that is not a package boundary is not abbreviated
        let id = ComponentId::new("com.example", "com.examples.Main");
        assert_eq!(id.flatten_short(), "com.example/com.examples.Main");
    }

    #[test]
    fn test_catalog_entry_json_defaults() {
        let json = r#"{
            "component": { "package": "com.example.chess", "class": "com.example.chess.Main" },
            "label": "Chess",
            "categoryHint": "game"
        }"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.user, UserId(0));
        assert_eq!(entry.package(), "com.example.chess");
        assert_eq!(entry.category_hint.as_deref(), Some("game"));
        assert!(!entry.is_system_app);
        assert!(entry.manual_category.is_none());
    }

    #[test]
    fn test_package_event_accessors() {
        let event = PackageEvent::Removed {
            package: "com.example".into(),
            user: UserId(10),
        };
        assert_eq!(event.package(), "com.example");
        assert_eq!(event.user(), UserId(10));
    }

    #[test]
    fn test_sort_by_label_is_case_insensitive() {
        let mut entries = vec![
            CatalogEntry::new(ComponentId::new("c", "c.Main"), UserId(0), "camera"),
            CatalogEntry::new(ComponentId::new("a", "a.Main"), UserId(0), "Alarm"),
            CatalogEntry::new(ComponentId::new("b", "b.Main"), UserId(0), "browser"),
        ];
        sort_by_label(&mut entries);
        let labels: Vec<_> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Alarm", "browser", "camera"]);
    }
}
