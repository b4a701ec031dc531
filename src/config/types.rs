//! Configuration type definitions
//!
//! This module contains all the struct definitions for configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use super::defaults::*;
use crate::categorizer::Category;

// ============================================
// RANKING CONFIG
// ============================================

/// Configuration for usage-decay ranking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankingConfig {
    /// Decay rate applied per second of event age (default: 1e-4)
    #[serde(default = "default_decay")]
    pub decay: f64,
    /// Days of usage history considered per ranking pass (default: 30)
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
}

fn default_decay() -> f64 {
    DEFAULT_DECAY
}
fn default_lookback_days() -> i64 {
    DEFAULT_LOOKBACK_DAYS
}

impl Default for RankingConfig {
    fn default() -> Self {
        RankingConfig {
            decay: DEFAULT_DECAY,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

// ============================================
// CATEGORIES CONFIG
// ============================================

/// Categorization rules data: the dev prefix, curated package tables and
/// per-package manual overrides
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesConfig {
    /// Packages starting with this prefix land in "My Apps" (empty disables the rule)
    #[serde(default = "default_personal_dev_prefix")]
    pub personal_dev_prefix: String,
    /// Professional/banking package fragments
    #[serde(default = "default_professional_packages")]
    pub professional_packages: Vec<String>,
    /// Utility package fragments
    #[serde(default = "default_utility_packages")]
    pub utility_packages: Vec<String>,
    /// Manual category per package identifier
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub overrides: HashMap<String, Category>,
}

fn default_personal_dev_prefix() -> String {
    DEFAULT_PERSONAL_DEV_PREFIX.to_string()
}
pub(crate) fn default_professional_packages() -> Vec<String> {
    DEFAULT_PROFESSIONAL_PACKAGES
        .iter()
        .map(|s| s.to_string())
        .collect()
}
pub(crate) fn default_utility_packages() -> Vec<String> {
    DEFAULT_UTILITY_PACKAGES.iter().map(|s| s.to_string()).collect()
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        CategoriesConfig {
            personal_dev_prefix: default_personal_dev_prefix(),
            professional_packages: default_professional_packages(),
            utility_packages: default_utility_packages(),
            overrides: HashMap::new(),
        }
    }
}

// ============================================
// ICON CACHE CONFIG
// ============================================

/// Configuration for the in-memory icon cache
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IconCacheConfig {
    /// Maximum number of cached icons (default: 256)
    #[serde(default = "default_icon_cache_capacity")]
    pub capacity: usize,
    /// Rendered icon edge length in pixels (default: 96)
    #[serde(default = "default_icon_size_px")]
    pub size_px: u32,
    /// Render worker threads shared by all misses (default: 4)
    #[serde(default = "default_icon_workers")]
    pub workers: usize,
    /// Directory holding per-package PNG icons for the file icon source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

fn default_icon_cache_capacity() -> usize {
    DEFAULT_ICON_CACHE_CAPACITY
}
fn default_icon_size_px() -> u32 {
    DEFAULT_ICON_SIZE_PX
}
fn default_icon_workers() -> usize {
    DEFAULT_ICON_WORKERS
}

impl Default for IconCacheConfig {
    fn default() -> Self {
        IconCacheConfig {
            capacity: DEFAULT_ICON_CACHE_CAPACITY,
            size_px: DEFAULT_ICON_SIZE_PX,
            workers: DEFAULT_ICON_WORKERS,
            directory: None,
        }
    }
}

// ============================================
// MAIN CONFIG
// ============================================

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub categories: CategoriesConfig,
    #[serde(default)]
    pub icons: IconCacheConfig,
}

impl Config {
    /// Returns the manual category configured for a package, if any
    pub fn override_for(&self, package: &str) -> Option<Category> {
        self.categories.overrides.get(package).copied()
    }
}
