//! Configuration loading from file system
//!
//! Reads `~/.launcher-core/config.json`; every field is optional.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use super::defaults::DEFAULT_CONFIG_PATH;
use super::types::Config;

/// Path of the user config file with `~` expanded
pub fn default_config_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).as_ref())
}

/// Load configuration from the default location
///
/// Returns Config::default() if the file is missing or invalid.
#[instrument(name = "load_config")]
pub fn load_config() -> Config {
    let config_path = default_config_path();

    if !config_path.exists() {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        return Config::default();
    }

    match load_config_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!(
                error = %format!("{:#}", e),
                path = %config_path.display(),
                "Failed to load config, using defaults"
            );
            Config::default()
        }
    }
}

/// Load and validate configuration from an explicit path
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config JSON: {}", path.display()))?;

    validate(&config)?;

    info!(
        path = %path.display(),
        decay = config.ranking.decay,
        lookback_days = config.ranking.lookback_days,
        icon_capacity = config.icons.capacity,
        icon_workers = config.icons.workers,
        overrides = config.categories.overrides.len(),
        "Successfully loaded config"
    );
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if !config.ranking.decay.is_finite() || config.ranking.decay < 0.0 {
        anyhow::bail!(
            "ranking.decay must be a finite non-negative number (got {})",
            config.ranking.decay
        );
    }
    if config.ranking.lookback_days < 0 {
        anyhow::bail!(
            "ranking.lookbackDays must not be negative (got {})",
            config.ranking.lookback_days
        );
    }
    if config.icons.capacity == 0 {
        anyhow::bail!("icons.capacity must be at least 1");
    }
    if config.icons.size_px == 0 {
        anyhow::bail!("icons.sizePx must be at least 1");
    }
    if config.icons.workers == 0 {
        anyhow::bail!("icons.workers must be at least 1");
    }
    Ok(())
}
