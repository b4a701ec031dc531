//! Usage-decay ranking
//!
//! Turns a stream of "activity resumed" events into a relevance score per
//! package. Every event contributes `exp(-decay * age_seconds)`; contributions
//! for the same package are summed. Scores are rebuilt from scratch on every
//! pass, so there is no stored state to go stale.
//!
//! `now` is always passed in explicitly; the refresh coordinator reads it
//! from a [`Clock`].

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::{RankingConfig, DEFAULT_DECAY, DEFAULT_LOOKBACK_DAYS};
use crate::error::{LauncherError, Result};

/// Milliseconds in a day for lookback calculations
pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Window probed by `has_access`
const ACCESS_PROBE_WINDOW_MS: i64 = 60_000;

/// Relevance score per package identifier; absent means 0
pub type RankMap = HashMap<String, f64>;

/// Anything carrying a usage score that can be sorted on
pub trait Scored {
    fn score(&self) -> f64;
}

/// Kind of a usage event; only `ActivityResumed` contributes to ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageEventKind {
    ActivityResumed,
    ActivityPaused,
    Other,
}

/// A single usage event as reported by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEvent {
    /// Missing for some platform events; such events are dropped
    #[serde(default)]
    pub package: Option<String>,
    /// Unix timestamp in milliseconds
    pub timestamp_ms: i64,
    #[serde(default = "default_event_kind")]
    pub kind: UsageEventKind,
}

fn default_event_kind() -> UsageEventKind {
    UsageEventKind::ActivityResumed
}

impl UsageEvent {
    pub fn resumed(package: impl Into<String>, timestamp_ms: i64) -> Self {
        UsageEvent {
            package: Some(package.into()),
            timestamp_ms,
            kind: UsageEventKind::ActivityResumed,
        }
    }
}

/// Queryable usage history
pub trait UsageEventSource: Send + Sync {
    /// Events with `start_ms <= timestamp <= end_ms`, oldest first.
    /// Returns `UsageUnavailable` when the host denies access.
    fn query_events(&self, start_ms: i64, end_ms: i64) -> Result<Vec<UsageEvent>>;
}

/// Source of the current time in Unix milliseconds
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for deterministic passes
#[derive(Debug, Default)]
pub struct FixedClock {
    now_ms: AtomicI64,
}

impl FixedClock {
    pub fn new(now_ms: i64) -> Self {
        FixedClock {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Weight of a single event of the given age
///
/// Strictly decreasing in `age_seconds` for any positive decay.
pub fn decay_weight(age_seconds: f64, decay: f64) -> f64 {
    (-decay * age_seconds).exp()
}

/// Computes rank maps from a usage event source
#[derive(Clone)]
pub struct UsageRanker {
    source: Arc<dyn UsageEventSource>,
    decay: f64,
    lookback_days: i64,
}

impl UsageRanker {
    pub fn new(source: Arc<dyn UsageEventSource>) -> Self {
        UsageRanker {
            source,
            decay: DEFAULT_DECAY,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }

    pub fn with_config(source: Arc<dyn UsageEventSource>, config: &RankingConfig) -> Self {
        UsageRanker {
            source,
            decay: config.decay,
            lookback_days: config.lookback_days,
        }
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    pub fn lookback_days(&self) -> i64 {
        self.lookback_days
    }

    /// Whether the usage history is queryable at all
    ///
    /// Probes the last minute for at least one resumed event. Denied access
    /// or an empty window both read as `false`; this never fails.
    pub fn has_access(&self, now_ms: i64) -> bool {
        let start = now_ms.saturating_sub(ACCESS_PROBE_WINDOW_MS);
        match self.source.query_events(start, now_ms) {
            Ok(events) => events
                .iter()
                .any(|e| e.kind == UsageEventKind::ActivityResumed),
            Err(e) => {
                debug!(error = %e, "Usage access probe failed");
                false
            }
        }
    }

    /// Ranks with the configured lookback window
    pub fn ranks_default(&self, now_ms: i64) -> Result<RankMap> {
        self.ranks(self.lookback_days, now_ms)
    }

    /// Compute the rank map over `[now - lookback_days, now]`
    ///
    /// An unavailable source yields an empty map. Only a negative lookback is
    /// rejected, since that is a caller bug rather than missing data.
    #[instrument(name = "usage_ranks", skip(self))]
    pub fn ranks(&self, lookback_days: i64, now_ms: i64) -> Result<RankMap> {
        if lookback_days < 0 {
            return Err(LauncherError::InvalidLookback(lookback_days));
        }

        let start = now_ms.saturating_sub(lookback_days.saturating_mul(MS_PER_DAY));
        let events = match self.source.query_events(start, now_ms) {
            Ok(events) => events,
            Err(e) => {
                warn!(error = %e, "Usage events unavailable, ranking disabled");
                return Ok(RankMap::new());
            }
        };

        let ranks = fold_events(&events, start, now_ms, self.decay);
        info!(
            event_count = events.len(),
            package_count = ranks.len(),
            lookback_days = lookback_days,
            "Computed usage ranks"
        );
        Ok(ranks)
    }
}

/// Sum decayed weights per package for events inside `[start_ms, now_ms]`
fn fold_events(events: &[UsageEvent], start_ms: i64, now_ms: i64, decay: f64) -> RankMap {
    let now_seconds = now_ms as f64 / 1000.0;
    let mut ranks = RankMap::new();

    for event in events {
        if event.kind != UsageEventKind::ActivityResumed {
            continue;
        }
        if event.timestamp_ms < start_ms || event.timestamp_ms > now_ms {
            continue;
        }
        let Some(package) = event.package.as_deref() else {
            continue;
        };
        let age_seconds = now_seconds - event.timestamp_ms as f64 / 1000.0;
        *ranks.entry(package.to_string()).or_insert(0.0) += decay_weight(age_seconds, decay);
    }

    ranks
}

/// Recorded usage history held in memory
///
/// Hosts feed it from their own event stream; `prune_before` keeps it
/// bounded to the lookback window.
#[derive(Debug)]
pub struct InMemoryUsageSource {
    events: Mutex<Vec<UsageEvent>>,
    available: AtomicBool,
}

impl Default for InMemoryUsageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUsageSource {
    pub fn new() -> Self {
        InMemoryUsageSource {
            events: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    pub fn with_events(events: Vec<UsageEvent>) -> Self {
        let source = Self::new();
        for event in events {
            source.record_event(event);
        }
        source
    }

    /// Record a resumed event for `package`
    pub fn record(&self, package: &str, timestamp_ms: i64) {
        self.record_event(UsageEvent::resumed(package, timestamp_ms));
    }

    /// Record an arbitrary event, keeping the list ordered by timestamp
    pub fn record_event(&self, event: UsageEvent) {
        let mut events = self.events.lock();
        let idx = events.partition_point(|e| e.timestamp_ms <= event.timestamp_ms);
        events.insert(idx, event);
    }

    /// Simulate the host granting or revoking usage access
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Drop events older than `cutoff_ms`; returns how many were removed
    pub fn prune_before(&self, cutoff_ms: i64) -> usize {
        let mut events = self.events.lock();
        let before = events.len();
        events.retain(|e| e.timestamp_ms >= cutoff_ms);
        before - events.len()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl UsageEventSource for InMemoryUsageSource {
    fn query_events(&self, start_ms: i64, end_ms: i64) -> Result<Vec<UsageEvent>> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(LauncherError::UsageUnavailable(
                "usage access not granted".to_string(),
            ));
        }
        Ok(self
            .events
            .lock()
            .iter()
            .filter(|e| e.timestamp_ms >= start_ms && e.timestamp_ms <= end_ms)
            .cloned()
            .collect())
    }
}

/// Usage history exported to a JSON array of events
#[derive(Debug, Clone)]
pub struct JsonUsageSource {
    path: PathBuf,
}

impl JsonUsageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonUsageSource { path: path.into() }
    }
}

impl UsageEventSource for JsonUsageSource {
    fn query_events(&self, start_ms: i64, end_ms: i64) -> Result<Vec<UsageEvent>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            LauncherError::UsageUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        let mut events: Vec<UsageEvent> = serde_json::from_str(&content)?;
        events.retain(|e| e.timestamp_ms >= start_ms && e.timestamp_ms <= end_ms);
        events.sort_by_key(|e| e.timestamp_ms);
        Ok(events)
    }
}
