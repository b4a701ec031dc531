//! Catalog module - launchable entries and where they come from
//!
//! - `types` - CatalogEntry, ComponentId, UserId, PackageEvent, RankedEntry
//! - `source` - the CatalogSource boundary plus in-memory and JSON sources

mod source;
mod types;

pub use source::{CatalogSource, JsonCatalogSource, PackageListener, StaticCatalogSource};
pub use types::{sort_by_label, CatalogEntry, ComponentId, PackageEvent, RankedEntry, UserId};
