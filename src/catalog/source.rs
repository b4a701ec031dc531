//! Catalog sources
//!
//! The core depends on [`CatalogSource`] only; platform launchers implement it.
//! Two sources ship with the crate: an in-memory one that can emit package
//! events, and a JSON-file one used by the command line.

use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::types::{CatalogEntry, PackageEvent, UserId};
use crate::error::{LauncherError, Result};

/// Callback invoked for every package add/remove notification
pub type PackageListener = Arc<dyn Fn(PackageEvent) + Send + Sync>;

/// Provider of launchable entries plus change notifications
pub trait CatalogSource: Send + Sync {
    /// Load every launchable entry across all users. May block.
    fn load_catalog(&self) -> Result<Vec<CatalogEntry>>;

    /// Register the listener for package events. A second registration
    /// while one is active is ignored.
    fn subscribe(&self, listener: PackageListener);

    /// Drop the active listener, if any
    fn unsubscribe(&self);
}

/// In-memory catalog, mutated explicitly by the host or by tests
#[derive(Default)]
pub struct StaticCatalogSource {
    entries: RwLock<Vec<CatalogEntry>>,
    listener: Mutex<Option<PackageListener>>,
}

impl StaticCatalogSource {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        StaticCatalogSource {
            entries: RwLock::new(entries),
            listener: Mutex::new(None),
        }
    }

    /// Add (or replace) an entry and notify the listener
    pub fn add(&self, entry: CatalogEntry) {
        let event = PackageEvent::Added {
            package: entry.package().to_string(),
            user: entry.user,
        };
        {
            let mut entries = self.entries.write();
            entries.retain(|e| !(e.component == entry.component && e.user == entry.user));
            entries.push(entry);
        }
        self.emit(event);
    }

    /// Remove every entry of `package` for `user` and notify the listener
    pub fn remove(&self, package: &str, user: UserId) {
        self.entries
            .write()
            .retain(|e| !(e.package() == package && e.user == user));
        self.emit(PackageEvent::Removed {
            package: package.to_string(),
            user,
        });
    }

    pub fn has_listener(&self) -> bool {
        self.listener.lock().is_some()
    }

    fn emit(&self, event: PackageEvent) {
        // Clone out of the lock so the listener may call back into the source
        let listener = self.listener.lock().clone();
        match listener {
            Some(listener) => listener(event),
            None => debug!(package = event.package(), "Package event with no listener"),
        }
    }
}

impl CatalogSource for StaticCatalogSource {
    fn load_catalog(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.entries.read().clone())
    }

    fn subscribe(&self, listener: PackageListener) {
        let mut slot = self.listener.lock();
        if slot.is_some() {
            debug!("Catalog listener already registered, ignoring");
            return;
        }
        *slot = Some(listener);
    }

    fn unsubscribe(&self) {
        self.listener.lock().take();
    }
}

/// Catalog read from a JSON array of entries on every load
#[derive(Debug, Clone)]
pub struct JsonCatalogSource {
    path: PathBuf,
}

impl JsonCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonCatalogSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for JsonCatalogSource {
    fn load_catalog(&self) -> Result<Vec<CatalogEntry>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            LauncherError::CatalogUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&content)?;
        info!(
            path = %self.path.display(),
            entry_count = entries.len(),
            "Loaded catalog from JSON"
        );
        Ok(entries)
    }

    fn subscribe(&self, _listener: PackageListener) {
        // A file has no package notifications; callers refresh explicitly
        debug!(path = %self.path.display(), "JSON catalog does not emit package events");
    }

    fn unsubscribe(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComponentId;
    use std::io::Write;

    fn entry(package: &str, label: &str) -> CatalogEntry {
        CatalogEntry::new(
            ComponentId::new(package, format!("{}.Main", package)),
            UserId(0),
            label,
        )
    }

    #[test]
    fn test_static_source_emits_add_and_remove() {
        let source = StaticCatalogSource::new(vec![entry("com.a", "A")]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        source.subscribe(Arc::new(move |event: PackageEvent| sink.lock().push(event)));

        source.add(entry("com.b", "B"));
        source.remove("com.a", UserId(0));

        let events = seen.lock().clone();
        assert_eq!(
            events,
            vec![
                PackageEvent::Added {
                    package: "com.b".into(),
                    user: UserId(0)
                },
                PackageEvent::Removed {
                    package: "com.a".into(),
                    user: UserId(0)
                },
            ]
        );
        let labels: Vec<_> = source
            .load_catalog()
            .unwrap()
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(labels, vec!["B"]);
    }

    #[test]
    fn test_static_source_ignores_second_subscription() {
        let source = StaticCatalogSource::default();
        let first = Arc::new(Mutex::new(0));
        let second = Arc::new(Mutex::new(0));

        let f = Arc::clone(&first);
        source.subscribe(Arc::new(move |_: PackageEvent| *f.lock() += 1));
        let s = Arc::clone(&second);
        source.subscribe(Arc::new(move |_: PackageEvent| *s.lock() += 1));

        source.add(entry("com.a", "A"));
        assert_eq!(*first.lock(), 1);
        assert_eq!(*second.lock(), 0);

        source.unsubscribe();
        assert!(!source.has_listener());
        source.add(entry("com.b", "B"));
        assert_eq!(*first.lock(), 1);
    }

    #[test]
    fn test_remove_is_scoped_to_user() {
        let mut work = entry("com.a", "A (work)");
        work.user = UserId(10);
        let source = StaticCatalogSource::new(vec![entry("com.a", "A"), work]);

        source.remove("com.a", UserId(0));
        let remaining = source.load_catalog().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].user, UserId(10));
    }

    #[test]
    fn test_json_source_loads_entries() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"component":{{"package":"com.a","class":"com.a.Main"}},"label":"Alpha"}}]"#
        )
        .unwrap();

        let source = JsonCatalogSource::new(file.path());
        let entries = source.load_catalog().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "Alpha");
    }

    #[test]
    fn test_json_source_missing_file_is_unavailable() {
        let source = JsonCatalogSource::new("/nonexistent/catalog.json");
        assert!(matches!(
            source.load_catalog(),
            Err(LauncherError::CatalogUnavailable(_))
        ));
    }
}
