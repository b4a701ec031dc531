//! launcher-core command line
//!
//! Runs one refresh pass over a JSON catalog (plus optional usage events)
//! and prints the requested view as JSON.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use launcher_core::catalog::{CatalogSource, ComponentId, JsonCatalogSource, UserId};
use launcher_core::config::{load_config, load_config_from};
use launcher_core::icon_cache::{CacheKey, FileIconSource, IconCache};
use launcher_core::logging;
use launcher_core::refresh::RefreshCoordinator;
use launcher_core::usage_ranker::{
    Clock, InMemoryUsageSource, JsonUsageSource, SystemClock, UsageEventSource, UsageRanker,
};

#[derive(Parser)]
#[command(name = "launcher-core")]
#[command(about = "Rank, categorize and search an app catalog", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON array of catalog entries
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    catalog: Option<PathBuf>,

    /// JSON array of usage events
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    events: Option<PathBuf>,

    /// Config file (defaults to ~/.launcher-core/config.json)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog, best matches first
    Search {
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Entries grouped by category
    Categories,

    /// Per-package usage ranks, highest first
    Ranks {
        /// Override the configured lookback window
        #[arg(long)]
        lookback_days: Option<i64>,
    },

    /// Index of the first entry in each alphabetical section
    Sections,

    /// Rank map and category assignments of the refreshed catalog
    Export,

    /// Load one icon through the cache and report its dimensions
    Icon {
        package: String,
        class: String,

        #[arg(long, default_value_t = 0)]
        user: u32,

        /// Icon directory (overrides icons.directory from the config)
        #[arg(long, value_hint = clap::ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IconReport {
    key: String,
    size: u32,
    bytes: usize,
}

#[derive(Serialize)]
struct PackageRank {
    package: String,
    rank: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };

    let usage: Arc<dyn UsageEventSource> = match &cli.events {
        Some(path) => Arc::new(JsonUsageSource::new(path)),
        None => Arc::new(InMemoryUsageSource::new()),
    };

    if let Commands::Ranks { lookback_days } = cli.command {
        let ranker = UsageRanker::with_config(usage, &config.ranking);
        let days = lookback_days.unwrap_or(config.ranking.lookback_days);
        let ranks = ranker
            .ranks(days, SystemClock.now_ms())
            .context("Failed to compute usage ranks")?;

        let mut sorted: Vec<PackageRank> = ranks
            .into_iter()
            .map(|(package, rank)| PackageRank { package, rank })
            .collect();
        sorted.sort_by(|a, b| {
            b.rank
                .total_cmp(&a.rank)
                .then_with(|| a.package.cmp(&b.package))
        });
        return print_json(&sorted);
    }

    if let Commands::Icon {
        package,
        class,
        user,
        dir,
    } = &cli.command
    {
        let directory = dir
            .clone()
            .or_else(|| config.icons.directory.clone())
            .context("No icon directory: pass --dir or set icons.directory")?;
        let source = Arc::new(FileIconSource::new(directory, config.icons.size_px));
        let cache = IconCache::from_config(source, &config.icons)?;
        let key = CacheKey::new(ComponentId::new(package.as_str(), class.as_str()), UserId(*user));
        let icon = cache
            .get(&key)
            .with_context(|| format!("Failed to load icon for {}", key))?;
        return print_json(&IconReport {
            key: key.to_string(),
            size: icon.size(),
            bytes: icon.pixels().len(),
        });
    }

    let catalog_path = cli
        .catalog
        .context("--catalog <FILE> is required for this command")?;
    let catalog: Arc<dyn CatalogSource> = Arc::new(JsonCatalogSource::new(catalog_path));
    let coordinator = RefreshCoordinator::from_config(catalog, usage, &config);
    let snapshot = coordinator.refresh_now();
    info!(
        entry_count = snapshot.entries.len(),
        has_usage_access = snapshot.has_usage_access,
        "Catalog ready"
    );

    match cli.command {
        Commands::Search { query, limit } => {
            let mut results = snapshot.search(&query);
            results.truncate(limit);
            print_json(&results)
        }
        Commands::Categories => {
            let groups: Vec<(&str, Vec<String>)> = snapshot
                .group_by_category()
                .into_iter()
                .map(|(category, entries)| {
                    (
                        category.display_name(),
                        entries.into_iter().map(|e| e.entry.label).collect(),
                    )
                })
                .collect();
            print_json(&groups)
        }
        Commands::Sections => print_json(&snapshot.sections()),
        Commands::Export => print_json(&snapshot.export()),
        Commands::Ranks { .. } | Commands::Icon { .. } => Ok(()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).context("Failed to serialize output")?;
    writeln!(out)?;
    Ok(())
}
