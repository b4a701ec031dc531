//! Catalog refresh coordination
//!
//! One pipeline produces each published snapshot:
//! load catalog → alphabetical pre-sort → rank → categorize → sort by rank.
//! Background refreshes are coalesced so at most one run is active and at
//! most one more is queued behind it.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, RwLock};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::catalog::{sort_by_label, CatalogSource, PackageEvent, RankedEntry};
use crate::categorizer::{
    group_by_category, sort_by_score_descending, AppCategorizer, Category, CategoryRules,
};
use crate::config::Config;
use crate::error::ResultExt;
use crate::logging;
use crate::search;
use crate::usage_ranker::{Clock, RankMap, SystemClock, UsageEventSource, UsageRanker};

/// Refresh passes slower than this are logged as slow
const SLOW_REFRESH_MS: u64 = 250;

/// Immutable result of one refresh pass
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    /// Entries ordered by usage rank, alphabetical among equal ranks
    pub entries: Vec<RankedEntry>,
    pub ranks: RankMap,
    pub has_usage_access: bool,
    /// 0 for the initial empty snapshot, then strictly increasing
    pub generation: u64,
}

/// Serializable view of a snapshot for persistence or inspection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotExport {
    pub ranks: BTreeMap<String, f64>,
    /// Keyed by `package/class@user`, so work-profile clones stay distinct
    pub categories: BTreeMap<String, Category>,
}

impl CatalogSnapshot {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn export(&self) -> SnapshotExport {
        SnapshotExport {
            ranks: self
                .ranks
                .iter()
                .map(|(package, rank)| (package.clone(), *rank))
                .collect(),
            categories: self
                .entries
                .iter()
                .map(|e| {
                    let key = format!("{}@{}", e.entry.component.flatten_short(), e.entry.user);
                    (key, e.category)
                })
                .collect(),
        }
    }

    /// Relevance-ordered matches; a blank query returns the ranked list
    pub fn search(&self, query: &str) -> Vec<RankedEntry> {
        search::search(query, &self.entries)
    }

    pub fn group_by_category(&self) -> BTreeMap<Category, Vec<RankedEntry>> {
        group_by_category(&self.entries)
    }

    pub fn sections(&self) -> BTreeMap<char, usize> {
        search::sections(&self.entries)
    }
}

#[derive(Debug, Default)]
struct RefreshState {
    running: bool,
    pending: bool,
    /// Bumped each time a run (with its queued passes) completes
    settled: u64,
}

/// Drives the refresh pipeline and owns the published snapshot
pub struct RefreshCoordinator {
    catalog: Arc<dyn CatalogSource>,
    ranker: UsageRanker,
    categorizer: AppCategorizer,
    clock: Arc<dyn Clock>,
    snapshot: RwLock<Arc<CatalogSnapshot>>,
    generation: AtomicU64,
    state: Mutex<RefreshState>,
    idle: Condvar,
}

impl RefreshCoordinator {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        ranker: UsageRanker,
        categorizer: AppCategorizer,
        clock: Arc<dyn Clock>,
    ) -> Self {
        RefreshCoordinator {
            catalog,
            ranker,
            categorizer,
            clock,
            snapshot: RwLock::new(Arc::new(CatalogSnapshot::default())),
            generation: AtomicU64::new(0),
            state: Mutex::new(RefreshState::default()),
            idle: Condvar::new(),
        }
    }

    /// Wire a coordinator from loaded configuration using the system clock
    pub fn from_config(
        catalog: Arc<dyn CatalogSource>,
        usage: Arc<dyn UsageEventSource>,
        config: &Config,
    ) -> Self {
        Self::new(
            catalog,
            UsageRanker::with_config(usage, &config.ranking),
            AppCategorizer::new(CategoryRules::from_config(&config.categories)),
            Arc::new(SystemClock),
        )
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.snapshot.read())
    }

    pub fn search(&self, query: &str) -> Vec<RankedEntry> {
        self.snapshot().search(query)
    }

    /// Subscribe to package events and kick off the first refresh
    pub fn start(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        self.catalog.subscribe(Arc::new(move |event: PackageEvent| {
            let Some(coordinator) = weak.upgrade() else {
                return;
            };
            info!(
                package = event.package(),
                user = event.user().0,
                "Package change, scheduling refresh"
            );
            coordinator.request_refresh();
        }));
        self.request_refresh();
    }

    pub fn stop(&self) {
        self.catalog.unsubscribe();
    }

    /// Schedule a background refresh
    ///
    /// Returns `true` when a new run was started, `false` when the request
    /// was folded into the run already in progress.
    pub fn request_refresh(self: &Arc<Self>) -> bool {
        {
            let mut state = self.state.lock();
            if state.running {
                state.pending = true;
                debug!("Refresh already running, queued one more pass");
                return false;
            }
            state.running = true;
        }

        let coordinator = Arc::clone(self);
        let spawned = std::thread::Builder::new()
            .name("catalog-refresh".to_string())
            .spawn(move || {
                coordinator.run_until_settled();
            });

        match spawned {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Failed to spawn refresh thread");
                let mut state = self.state.lock();
                state.running = false;
                state.pending = false;
                self.idle.notify_all();
                false
            }
        }
    }

    /// Refresh synchronously and return the resulting snapshot
    ///
    /// Runs the pipeline on the calling thread when nothing else is running.
    /// Otherwise a pass is queued behind the active run and this call blocks
    /// until that pass has published, so two runs never overlap.
    pub fn refresh_now(&self) -> Arc<CatalogSnapshot> {
        {
            let mut state = self.state.lock();
            if state.running {
                state.pending = true;
                let settled = state.settled;
                debug!("Refresh already running, waiting for the queued pass");
                while state.settled == settled {
                    self.idle.wait(&mut state);
                }
                drop(state);
                return self.snapshot();
            }
            state.running = true;
        }
        self.run_until_settled()
    }

    /// Block until no background refresh is running; `false` on timeout
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        while state.running {
            if self.idle.wait_until(&mut state, deadline).timed_out() {
                return !state.running;
            }
        }
        true
    }

    /// Caller must have set `running`; clears it once no pass is pending
    fn run_until_settled(&self) -> Arc<CatalogSnapshot> {
        loop {
            let snapshot = self.run_pipeline();

            let mut state = self.state.lock();
            if state.pending {
                state.pending = false;
                continue;
            }
            state.running = false;
            state.settled += 1;
            self.idle.notify_all();
            return snapshot;
        }
    }

    #[instrument(name = "catalog_refresh", skip(self))]
    fn run_pipeline(&self) -> Arc<CatalogSnapshot> {
        let started = Instant::now();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut catalog = self.catalog.load_catalog().warn_on_err().unwrap_or_default();
        sort_by_label(&mut catalog);

        // Ranks must be complete before the display sort
        let now_ms = self.clock.now_ms();
        let has_usage_access = self.ranker.has_access(now_ms);
        let ranks = self.ranker.ranks_default(now_ms).log_err().unwrap_or_default();

        let mut entries: Vec<RankedEntry> = catalog
            .into_iter()
            .map(|entry| {
                let category = self.categorizer.categorize(&entry, None);
                let usage_rank = ranks.get(entry.package()).copied().unwrap_or(0.0);
                RankedEntry {
                    entry,
                    category,
                    usage_rank,
                }
            })
            .collect();
        sort_by_score_descending(&mut entries);

        let snapshot = Arc::new(CatalogSnapshot {
            entries,
            ranks,
            has_usage_access,
            generation,
        });
        self.publish(&snapshot);

        let duration_ms = started.elapsed().as_millis() as u64;
        info!(
            generation,
            entry_count = snapshot.entries.len(),
            ranked_packages = snapshot.ranks.len(),
            has_usage_access,
            duration_ms,
            "Catalog refreshed"
        );
        logging::log_perf("catalog_refresh", duration_ms, SLOW_REFRESH_MS);
        snapshot
    }

    fn publish(&self, snapshot: &Arc<CatalogSnapshot>) {
        let mut current = self.snapshot.write();
        // Generations only move forward
        if snapshot.generation > current.generation {
            *current = Arc::clone(snapshot);
        }
    }
}
