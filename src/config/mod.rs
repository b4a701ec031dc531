//! Configuration module - ranking, categorization and icon cache settings
//!
//! This module provides functionality for:
//! - Loading configuration from ~/.launcher-core/config.json
//! - Default values for all settings, including the curated package tables
//! - Type definitions for config structures
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions (Config, RankingConfig, etc.)
//! - `loader` - File system loading and validation

mod defaults;
mod loader;
mod types;

pub use defaults::{
    DEFAULT_DECAY, DEFAULT_ICON_CACHE_CAPACITY, DEFAULT_ICON_SIZE_PX, DEFAULT_ICON_WORKERS,
    DEFAULT_LOOKBACK_DAYS,
    DEFAULT_PROFESSIONAL_PACKAGES, DEFAULT_UTILITY_PACKAGES, PROFESSIONAL_KEYWORDS,
};

pub use types::{CategoriesConfig, Config, IconCacheConfig, RankingConfig};

pub use loader::{default_config_path, load_config, load_config_from};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
