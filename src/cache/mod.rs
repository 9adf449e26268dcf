//! Cache Module
//!
//! Bounded in-memory memoization of API responses with per-entry TTL,
//! a total byte budget, and soonest-expiry-first eviction.

use std::time::Duration;

mod entry;
mod key;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use key::cache_key;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default total size budget for live entries
pub const DEFAULT_MAX_BYTES: usize = 2 * 1024 * 1024; // 2 MiB

/// Default entry time to live
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600); // 1 hour
