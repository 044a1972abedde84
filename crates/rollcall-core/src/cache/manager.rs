use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::models::Roster;
use crate::source::{LoadError, RosterSource};
use crate::utils::format_age;

/// Consider the roster stale after 1 hour unless configured otherwise.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// A loaded roster and when it was loaded. Replaced wholesale, never mutated.
#[derive(Debug)]
pub struct CacheEntry {
    pub value: Arc<Roster>,
    pub loaded_at: Instant,
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(value: Roster) -> Self {
        Self {
            value: Arc::new(value),
            loaded_at: Instant::now(),
            cached_at: Utc::now(),
        }
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.loaded_at.elapsed() < ttl
    }

    pub fn age_minutes(&self) -> u64 {
        self.loaded_at.elapsed().as_secs() / 60
    }

    pub fn age_display(&self) -> String {
        format_age(self.age_minutes())
    }
}

/// Time-bounded cache in front of a `RosterSource`.
///
/// At most one reload runs at a time. Callers that find the cache stale wait
/// on the reload lock and, once they hold it, take the outcome of any load
/// that finished while they waited: the new roster, or the same error. A
/// burst of lookups against a cold cache therefore reaches the source once
/// whether that load succeeds or fails. Failures are never cached for callers
/// that arrive after the load has finished, and a failed reload leaves the
/// previous entry (or its absence) as is.
pub struct RosterCache {
    source: Arc<dyn RosterSource>,
    ttl: Duration,
    entry: RwLock<Option<Arc<CacheEntry>>>,
    reload_lock: Mutex<()>,
    // Bumped on invalidate so a load that started earlier is not stored.
    generation: AtomicU64,
    // Number of loads that have finished, successful or not.
    completed_loads: AtomicU64,
    // Most recent failed load, tagged with its completed_loads number.
    last_failure: RwLock<Option<(u64, LoadError)>>,
}

impl RosterCache {
    pub fn new(source: Arc<dyn RosterSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entry: RwLock::new(None),
            reload_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
            completed_loads: AtomicU64::new(0),
            last_failure: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached roster if fresh, otherwise reload it from the source.
    pub async fn get(&self) -> Result<Arc<Roster>, LoadError> {
        if let Some(roster) = self.fresh_value() {
            debug!("Returning roster from cache");
            return Ok(roster);
        }

        let seen_loads = self.completed_loads.load(Ordering::SeqCst);
        let _reload = self.reload_lock.lock().await;

        if let Some(roster) = self.fresh_value() {
            debug!("Roster was reloaded while waiting");
            return Ok(roster);
        }
        if let Some(err) = self.failure_since(seen_loads) {
            debug!(error = %err, "Reload failed while waiting");
            return Err(err);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        info!(source = %self.source.describe(), "Loading roster");
        let loaded = self.source.load().await;
        let load_number = self.completed_loads.fetch_add(1, Ordering::SeqCst) + 1;

        let roster = match loaded {
            Ok(roster) => {
                *self.last_failure.write().unwrap_or_else(PoisonError::into_inner) = None;
                roster
            }
            Err(err) => {
                *self.last_failure.write().unwrap_or_else(PoisonError::into_inner) =
                    Some((load_number, err.clone()));
                return Err(err);
            }
        };
        info!(
            sheets = roster.sheet_count(),
            records = roster.record_count(),
            "Roster loaded"
        );

        let entry = Arc::new(CacheEntry::new(roster));
        let value = Arc::clone(&entry.value);
        let mut slot = self.write_entry();
        if self.generation.load(Ordering::SeqCst) == generation {
            *slot = Some(entry);
        } else {
            debug!("Cache invalidated during load, not storing roster");
        }
        Ok(value)
    }

    /// Drop the cached roster so the next `get` reloads it.
    pub fn invalidate(&self) {
        let mut slot = self.write_entry();
        self.generation.fetch_add(1, Ordering::SeqCst);
        *slot = None;
        info!("Roster cache invalidated");
    }

    /// True when there is no entry or it has outlived the TTL.
    pub fn is_stale(&self) -> bool {
        self.current_entry()
            .map(|e| !e.is_fresh(self.ttl))
            .unwrap_or(true)
    }

    /// Human-readable age of the cached roster, or None if nothing is cached.
    pub fn cached_age(&self) -> Option<String> {
        self.current_entry().map(|e| e.age_display())
    }

    pub fn cached_at(&self) -> Option<DateTime<Utc>> {
        self.current_entry().map(|e| e.cached_at)
    }

    fn current_entry(&self) -> Option<Arc<CacheEntry>> {
        self.entry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn fresh_value(&self) -> Option<Arc<Roster>> {
        self.current_entry()
            .filter(|e| e.is_fresh(self.ttl))
            .map(|e| Arc::clone(&e.value))
    }

    /// The error from a load that finished after `seen_loads`, if the most
    /// recent load failed.
    fn failure_since(&self, seen_loads: u64) -> Option<LoadError> {
        self.last_failure
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|(load_number, _)| *load_number > seen_loads)
            .map(|(_, err)| err.clone())
    }

    fn write_entry(&self) -> RwLockWriteGuard<'_, Option<Arc<CacheEntry>>> {
        self.entry.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for RosterCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RosterCache")
            .field("source", &self.source.describe())
            .field("ttl", &self.ttl)
            .field("cached_at", &self.cached_at())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
