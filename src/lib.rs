//! launcher-core - app intelligence for a launcher
//!
//! Ranks installed apps by decayed usage, categorizes them, searches them
//! with tiered fuzzy matching and caches their icons. The host supplies the
//! platform pieces through [`catalog::CatalogSource`],
//! [`usage_ranker::UsageEventSource`] and [`icon_cache::IconSource`].

pub mod catalog;
pub mod categorizer;
pub mod config;
pub mod error;
pub mod icon_cache;
pub mod logging;
pub mod refresh;
pub mod search;
pub mod usage_ranker;

pub use catalog::{CatalogEntry, CatalogSource, ComponentId, PackageEvent, RankedEntry, UserId};
pub use categorizer::{AppCategorizer, Category};
pub use error::{IconError, LauncherError, Result};
pub use icon_cache::{CacheKey, Icon, IconCache, IconSource};
pub use refresh::{CatalogSnapshot, RefreshCoordinator, SnapshotExport};
pub use usage_ranker::{RankMap, UsageEvent, UsageRanker};
