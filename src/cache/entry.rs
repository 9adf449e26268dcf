//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and size metadata.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Absolute time after which the entry is treated as absent
    pub expires_at: DateTime<Utc>,
    /// UTF-8 byte length of the value's serialized form, computed at insertion
    pub size: usize,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` from now.
    pub fn new(value: Value, ttl: Duration) -> Self {
        let size = compute_size(&value);
        Self {
            value,
            expires_at: expiry_from_now(ttl),
            size,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time; every read operation treats expired entries as
    /// absent.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining TTL, clamped at zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        (self.expires_at - Utc::now()).to_std().unwrap_or(Duration::ZERO)
    }
}

// == Utility Functions ==
/// Returns the absolute expiry `ttl` from now, saturating at the maximum
/// representable timestamp instead of overflowing.
pub(crate) fn expiry_from_now(ttl: Duration) -> DateTime<Utc> {
    let delta = chrono::Duration::from_std(ttl)
        .unwrap_or_else(|_| chrono::Duration::milliseconds(i64::MAX / 2));
    Utc::now()
        .checked_add_signed(delta)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Computes the size of a value as the UTF-8 byte length of its JSON text.
///
/// A failure here is logged and treated as size 0 so a single
/// unserializable payload cannot block all caching.
pub(crate) fn compute_size(value: &Value) -> usize {
    match serde_json::to_string(value) {
        Ok(text) => text.len(),
        Err(err) => {
            error!("Error computing entry size: {}", err);
            0
        }
    }
}
