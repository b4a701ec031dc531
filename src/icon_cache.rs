//! Bounded icon cache keyed by component and user.
//!
//! Lookups that hit return the shared `Arc<Icon>` and refresh recency.
//! Misses are queued to a fixed pool of render threads; concurrent misses for
//! the same key wait on the one in-flight render instead of starting their
//! own. Failed or panicking renders are never cached, so a later call retries.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::any::Any;
use std::fmt;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use crate::catalog::{ComponentId, UserId};
use crate::config::{IconCacheConfig, DEFAULT_ICON_WORKERS};
use crate::error::{IconError, LauncherError, Result};

/// Cache key: one icon per (component, user) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub component: ComponentId,
    pub user: UserId,
}

impl CacheKey {
    pub fn new(component: ComponentId, user: UserId) -> Self {
        CacheKey { component, user }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.component.flatten_short(), self.user)
    }
}

/// Square RGBA8 bitmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    size: u32,
    pixels: Vec<u8>,
}

impl Icon {
    /// Wrap raw RGBA pixels; the buffer must hold exactly `size * size * 4` bytes
    pub fn from_rgba(size: u32, pixels: Vec<u8>) -> std::result::Result<Self, IconError> {
        let expected = (size as usize) * (size as usize) * 4;
        if size == 0 || pixels.len() != expected {
            return Err(IconError::Decode {
                path: format!("<{}x{} buffer>", size, size),
                message: format!("expected {} bytes, got {}", expected, pixels.len()),
            });
        }
        Ok(Icon { size, pixels })
    }

    /// Single-colour icon, used for placeholders
    pub fn solid(size: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take((size as usize) * (size as usize) * 4)
            .collect();
        Icon { size, pixels }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Produces the bitmap for a component. Called off the caller's thread.
pub trait IconSource: Send + Sync {
    fn render_icon(
        &self,
        component: &ComponentId,
        user: UserId,
    ) -> std::result::Result<Icon, IconError>;
}

type RenderOutcome = std::result::Result<Arc<Icon>, IconError>;
type Waiters = Vec<async_channel::Sender<RenderOutcome>>;

struct Shared {
    entries: Mutex<LruCache<CacheKey, Arc<Icon>>>,
    in_flight: Mutex<HashMap<CacheKey, Waiters>>,
    source: Arc<dyn IconSource>,
}

impl Shared {
    /// Run the source, turning a panic into a `Worker` error
    fn render(&self, key: &CacheKey) -> RenderOutcome {
        let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
            self.source.render_icon(&key.component, key.user)
        }));
        match rendered {
            Ok(result) => result.map(Arc::new),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(key = %key, panic = %message, "Icon source panicked");
                Err(IconError::Worker(format!("render panicked: {}", message)))
            }
        }
    }

    fn store(&self, key: &CacheKey, icon: &Arc<Icon>) {
        let mut entries = self.entries.lock();
        if let Some((evicted, _)) = entries.push(key.clone(), Arc::clone(icon)) {
            if &evicted != key {
                debug!(evicted = %evicted, cache_size = entries.len(), "Evicted least recently used icon");
            }
        }
    }

    fn finish(&self, key: &CacheKey, outcome: RenderOutcome) {
        if let Ok(icon) = &outcome {
            self.store(key, icon);
        }
        let waiters = self.in_flight.lock().remove(key).unwrap_or_default();
        debug!(key = %key, waiters = waiters.len(), ok = outcome.is_ok(), "Icon render finished");
        for waiter in waiters {
            // A receiver dropped by an abandoned prefetch is fine to ignore
            let _ = waiter.try_send(outcome.clone());
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Pull keys off the job queue until every sender is gone
fn render_loop(shared: Arc<Shared>, jobs: async_channel::Receiver<CacheKey>) {
    while let Ok(key) = jobs.recv_blocking() {
        let outcome = shared.render(&key);
        shared.finish(&key, outcome);
    }
    debug!("Icon render worker exiting");
}

/// LRU icon cache with per-key request coalescing
pub struct IconCache {
    shared: Arc<Shared>,
    jobs: async_channel::Sender<CacheKey>,
    capacity: usize,
    workers: usize,
}

impl IconCache {
    pub fn new(source: Arc<dyn IconSource>, capacity: usize) -> Result<Self> {
        Self::with_workers(source, capacity, DEFAULT_ICON_WORKERS)
    }

    /// Cache backed by `workers` render threads. The threads exit once the
    /// cache is dropped and the queued renders have drained.
    pub fn with_workers(
        source: Arc<dyn IconSource>,
        capacity: usize,
        workers: usize,
    ) -> Result<Self> {
        let cap = NonZeroUsize::new(capacity).ok_or(LauncherError::InvalidCapacity)?;
        if workers == 0 {
            return Err(LauncherError::Config(
                "icon cache needs at least one render worker".to_string(),
            ));
        }

        let shared = Arc::new(Shared {
            entries: Mutex::new(LruCache::new(cap)),
            in_flight: Mutex::new(HashMap::new()),
            source,
        });
        let (jobs, queue) = async_channel::unbounded();
        for index in 0..workers {
            let shared = Arc::clone(&shared);
            let queue = queue.clone();
            std::thread::Builder::new()
                .name(format!("icon-render-{}", index))
                .spawn(move || render_loop(shared, queue))?;
        }
        debug!(capacity, workers, "Icon cache started");

        Ok(IconCache {
            shared,
            jobs,
            capacity,
            workers,
        })
    }

    pub fn from_config(source: Arc<dyn IconSource>, config: &IconCacheConfig) -> Result<Self> {
        Self::with_workers(source, config.capacity, config.workers)
    }

    /// Return the icon for `key`, queueing a render on a miss.
    /// Blocks until the (possibly shared) render finishes.
    #[instrument(skip_all, fields(key = %key))]
    pub fn get(&self, key: &CacheKey) -> std::result::Result<Arc<Icon>, IconError> {
        if let Some(icon) = self.get_cached(key) {
            return Ok(icon);
        }
        let receiver = self.request(key);
        receiver
            .recv_blocking()
            .unwrap_or_else(|_| Err(IconError::Worker("render worker exited".to_string())))
    }

    /// Cached icon only; refreshes recency on a hit
    pub fn get_cached(&self, key: &CacheKey) -> Option<Arc<Icon>> {
        self.shared.entries.lock().get(key).cloned()
    }

    /// Start populating `key` without waiting for the result
    pub fn prefetch(&self, key: &CacheKey) {
        if !self.contains(key) {
            drop(self.request(key));
        }
    }

    /// Presence check that leaves recency untouched
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.shared.entries.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.shared.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Drop every cached icon. Renders already in flight still land afterwards.
    pub fn clear(&self) {
        self.shared.entries.lock().clear();
        debug!("Icon cache cleared");
    }

    fn request(&self, key: &CacheKey) -> async_channel::Receiver<RenderOutcome> {
        let (sender, receiver) = async_channel::bounded(1);

        // The in-flight lock is held across the cache re-check so a render
        // finishing in between cannot be missed.
        let mut in_flight = self.shared.in_flight.lock();
        if let Some(icon) = self.shared.entries.lock().get(key).cloned() {
            let _ = sender.try_send(Ok(icon));
            return receiver;
        }

        let start_render = match in_flight.entry(key.clone()) {
            Entry::Occupied(mut pending) => {
                pending.get_mut().push(sender);
                debug!(key = %key, waiters = pending.get().len(), "Joined in-flight icon render");
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(vec![sender]);
                true
            }
        };
        drop(in_flight);

        if start_render {
            if let Err(e) = self.jobs.try_send(key.clone()) {
                warn!(key = %key, error = %e, "Icon render queue closed");
                self.shared
                    .finish(key, Err(IconError::Worker("render queue closed".to_string())));
            }
        }
        receiver
    }
}

/// Reads `<dir>/<package>/<class>.png`, falling back to `<dir>/<package>.png`,
/// and scales the result to a square of `size_px`.
pub struct FileIconSource {
    directory: PathBuf,
    size_px: u32,
}

impl FileIconSource {
    pub fn new(directory: impl Into<PathBuf>, size_px: u32) -> Self {
        FileIconSource {
            directory: directory.into(),
            size_px: size_px.max(1),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn candidates(&self, component: &ComponentId) -> [PathBuf; 2] {
        [
            self.directory
                .join(&component.package)
                .join(format!("{}.png", component.class)),
            self.directory.join(format!("{}.png", component.package)),
        ]
    }
}

impl IconSource for FileIconSource {
    fn render_icon(
        &self,
        component: &ComponentId,
        user: UserId,
    ) -> std::result::Result<Icon, IconError> {
        let Some(path) = self.candidates(component).into_iter().find(|p| p.is_file()) else {
            return Err(IconError::NotFound {
                component: component.flatten_short(),
                user: user.0,
            });
        };

        let decode_err = |message: String| IconError::Decode {
            path: path.display().to_string(),
            message,
        };
        let bytes = std::fs::read(&path).map_err(|e| decode_err(e.to_string()))?;
        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
            .map_err(|e| decode_err(e.to_string()))?;
        let scaled = decoded
            .resize_exact(
                self.size_px,
                self.size_px,
                image::imageops::FilterType::Triangle,
            )
            .to_rgba8();

        debug!(path = %path.display(), size = self.size_px, "Decoded icon");
        Icon::from_rgba(self.size_px, scaled.into_raw())
    }
}
