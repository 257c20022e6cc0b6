//! In-memory table cache with a fixed time-to-live
//!
//! Tables are keyed by [`FetchTarget`]. Within one TTL window a target is
//! fetched at most once, however many callers ask for it.
//!
//! # Entry States
//!
//! | State | `get` behaviour |
//! |-------|-----------------|
//! | Absent | fetch, store, return |
//! | Fresh | return stored table |
//! | Stale (`now - fetched_at >= ttl`) | fetch, replace, return |
//!
//! A failed fetch stores nothing: a previous entry stays as it was and the
//! next `get` fetches again.

pub mod clock;

pub use clock::{Clock, SystemClock};

use crate::catalog::FetchTarget;
use crate::error::{DashError, DashResult};
use crate::fetch::TableSource;
use crate::table::Table;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Stored result of one successful fetch; replaced whole on refresh
#[derive(Debug, Clone)]
pub struct CachedEntry {
    pub target: FetchTarget,
    pub table: Arc<Table>,
    pub fetched_at: DateTime<Utc>,
}

/// A table handed out by the cache
#[derive(Debug, Clone)]
pub struct Loaded {
    pub table: Arc<Table>,
    pub fetched_at: DateTime<Utc>,
    /// True when served without fetching
    pub cached: bool,
}

/// Counters since the cache was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub fetches: u64,
    pub failures: u64,
}

type Slot = Arc<Mutex<Option<CachedEntry>>>;

/// TTL cache in front of a [`TableSource`]
pub struct FreshnessCache<S, C = SystemClock> {
    source: S,
    clock: C,
    ttl: Duration,
    slots: Mutex<HashMap<FetchTarget, Slot>>,
    hits: AtomicU64,
    fetches: AtomicU64,
    failures: AtomicU64,
}

impl<S: TableSource> FreshnessCache<S, SystemClock> {
    pub fn new(source: S, ttl: std::time::Duration) -> Self {
        Self::with_clock(source, ttl, SystemClock)
    }
}

impl<S: TableSource, C: Clock> FreshnessCache<S, C> {
    pub fn with_clock(source: S, ttl: std::time::Duration, clock: C) -> Self {
        Self {
            source,
            clock,
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
            slots: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            fetches: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Table for `target`, fetching it if absent or stale
    pub fn get(&self, target: &FetchTarget) -> DashResult<Arc<Table>> {
        self.load(target).map(|loaded| loaded.table)
    }

    /// Like [`get`](Self::get), also reporting when and how the table was obtained
    pub fn load(&self, target: &FetchTarget) -> DashResult<Loaded> {
        let slot = self.slot(target)?;
        // Held across the fetch so concurrent callers for one key wait for it
        let mut entry = lock(&slot)?;

        let now = self.clock.now();
        if let Some(current) = entry.as_ref() {
            if now - current.fetched_at < self.ttl {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for {}", target);
                return Ok(Loaded {
                    table: Arc::clone(&current.table),
                    fetched_at: current.fetched_at,
                    cached: true,
                });
            }
            debug!("Cache entry for {} is stale", target);
        }

        self.fetch_into(&mut entry, target)
    }

    /// Fetch `target` now, fresh or not.
    ///
    /// The stored entry is replaced only when the fetch succeeds.
    pub fn reload(&self, target: &FetchTarget) -> DashResult<Loaded> {
        let slot = self.slot(target)?;
        let mut entry = lock(&slot)?;
        self.fetch_into(&mut entry, target)
    }

    fn fetch_into(&self, entry: &mut Option<CachedEntry>, target: &FetchTarget) -> DashResult<Loaded> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let table = match self.source.fetch(target) {
            Ok(table) => Arc::new(table),
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!("Fetch failed for {}: {}", target, e);
                return Err(e);
            }
        };

        let fetched_at = self.clock.now();
        *entry = Some(CachedEntry {
            target: target.clone(),
            table: Arc::clone(&table),
            fetched_at,
        });
        debug!("Cached {} for {}s", target, self.ttl.num_seconds());

        Ok(Loaded {
            table,
            fetched_at,
            cached: false,
        })
    }

    /// Stored entry for `target` regardless of freshness
    pub fn peek(&self, target: &FetchTarget) -> Option<CachedEntry> {
        let slot = self.slots.lock().ok()?.get(target).cloned()?;
        let entry = slot.lock().ok()?;
        entry.clone()
    }

    /// Drop the entry for `target`; returns whether one existed.
    ///
    /// The slot itself stays in place so a fetch in flight for the same
    /// target is still shared with later callers.
    pub fn invalidate(&self, target: &FetchTarget) -> DashResult<bool> {
        let slot = lock(&self.slots)?.get(target).cloned();
        let existed = match slot {
            Some(slot) => {
                let mut entry = lock(&slot)?;
                entry.take().is_some()
            }
            None => false,
        };
        if existed {
            debug!("Invalidated {}", target);
        }
        Ok(existed)
    }

    /// Drop every entry
    pub fn clear(&self) -> DashResult<()> {
        for slot in self.all_slots()? {
            lock(&slot)?.take();
        }
        Ok(())
    }

    /// Number of targets with a stored table
    pub fn len(&self) -> usize {
        self.all_slots()
            .map(|slots| {
                slots
                    .iter()
                    .filter(|slot| slot.lock().map(|e| e.is_some()).unwrap_or(false))
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Snapshot of every slot, taken without holding the map lock afterwards
    fn all_slots(&self) -> DashResult<Vec<Slot>> {
        Ok(lock(&self.slots)?.values().cloned().collect())
    }

    fn slot(&self, target: &FetchTarget) -> DashResult<Slot> {
        let mut slots = lock(&self.slots)?;
        Ok(Arc::clone(slots.entry(target.clone()).or_default()))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> DashResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| DashError::Internal("table cache lock poisoned".to_string()))
}
