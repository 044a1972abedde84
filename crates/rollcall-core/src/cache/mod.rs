//! In-memory roster caching.
//!
//! This module provides the `RosterCache`, which holds the most recently
//! loaded roster and reloads it from the configured source once it is
//! older than the TTL or after an explicit invalidation.

pub mod manager;

pub use manager::{CacheEntry, RosterCache, DEFAULT_TTL_SECS};
