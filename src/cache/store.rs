//! Cache Store Module
//!
//! Bounded, expiring memoization store for API responses. Combines HashMap
//! storage with per-entry TTL and a total byte budget enforced by
//! soonest-expiry-first eviction.
//!
//! Reads return independent deep copies of stored values; mutating a
//! returned value never affects the stored entry. Values must round-trip
//! through JSON, so payloads with non-serializable members are unsafe to
//! cache.

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use crate::cache::entry::{compute_size, expiry_from_now};
use crate::cache::{CacheEntry, CacheStats};
use crate::config::Config;

// == Cache Store ==
/// Main cache storage with TTL expiration and size-bounded eviction.
///
/// Operations are synchronous and single-turn; callers sharing the store
/// across tasks wrap it in `Arc<Mutex<CacheStore>>`.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Total size budget for live entries in bytes
    max_bytes: usize,
    /// Default TTL for entries without explicit TTL
    default_ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with the given byte budget and default TTL.
    pub fn new(max_bytes: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_bytes,
            default_ttl,
        }
    }

    /// Creates a CacheStore from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.cache_max_bytes,
            Duration::from_millis(config.cache_default_ttl_ms),
        )
    }

    // == Get ==
    /// Retrieves a deep copy of the value stored under `key`.
    ///
    /// Returns `None` if the key is absent or expired; an expired entry is
    /// physically removed as a side effect.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        match self.entries.get(key) {
            Some(entry) => {
                if entry.is_expired() {
                    debug!("Cache expired: {}", key);
                    self.entries.remove(key);
                    self.stats.record_expiration();
                    self.stats.record_miss();
                    self.stats.set_total_entries(self.entries.len());
                    None
                } else {
                    self.stats.record_hit();
                    // Value::clone is a full structural copy
                    Some(entry.value.clone())
                }
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Get Typed ==
    /// Retrieves and decodes the value stored under `key`.
    ///
    /// A value that fails to decode into `T` is logged and degraded to
    /// `None`; decoding never raises to the caller.
    pub fn get_as<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(err) => {
                error!("Error decoding cached value for '{}': {}", key, err);
                None
            }
        }
    }

    // == Get All ==
    /// Returns a deep clone of the entire store, for diagnostic use.
    pub fn get_all(&self) -> HashMap<String, CacheEntry> {
        self.entries.clone()
    }

    // == Set ==
    /// Stores a value under `key`, expiring `ttl` (or the default TTL) from now.
    ///
    /// Expired entries are purged first, then the soonest-expiring entries
    /// are evicted one at a time until the new entry fits the byte budget.
    /// Writing always succeeds: an entry larger than the whole budget is
    /// still written after evicting everything else.
    pub fn set(&mut self, key: &str, value: Value, ttl: Option<Duration>) {
        debug!("Cache add: {}", key);

        // Remove outdated entries before adding
        self.cleanup_expired();

        let entry = CacheEntry::new(value, ttl.unwrap_or(self.default_ttl));

        while self.total_size() + entry.size > self.max_bytes {
            if !self.evict_oldest() {
                break;
            }
        }

        self.entries.insert(key.to_string(), entry);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Replace ==
    /// Deletes a family of keys before delegating to [`set`](Self::set).
    ///
    /// A non-empty `prefix` removes every entry whose key contains it as a
    /// substring (not just a prefix match); an empty `prefix` removes only
    /// the exact `key`. Used to invalidate cached list views when a new
    /// canonical one replaces them.
    pub fn replace(&mut self, key: &str, prefix: &str, value: Value, ttl: Option<Duration>) {
        if !prefix.is_empty() {
            let matching: Vec<String> = self
                .entries
                .keys()
                .filter(|k| k.contains(prefix))
                .cloned()
                .collect();

            for k in matching {
                debug!("Cache replace, removing: {}", k);
                self.entries.remove(&k);
            }
        } else {
            self.entries.remove(key);
        }

        self.set(key, value, ttl);
    }

    // == Update ==
    /// Shallow-merges `partial` into the entry under `key`.
    ///
    /// Top-level keys of `partial` overwrite the stored object's keys (not a
    /// deep merge); a non-object on either side replaces the stored value
    /// outright. The entry's expiry is preserved unless a new `ttl` is
    /// supplied. Behaves as [`set`](Self::set) when the key is absent.
    pub fn update(&mut self, key: &str, partial: Value, ttl: Option<Duration>) {
        match self.entries.remove(key) {
            Some(existing) => {
                debug!("Cache update: {}", key);

                let merged = merge_shallow(existing.value, partial);
                let size = compute_size(&merged);

                // Budget check is relative to the old entry's removed size
                while self.total_size() + size > self.max_bytes {
                    if !self.evict_oldest() {
                        break;
                    }
                }

                let expires_at = match ttl {
                    Some(ttl) => expiry_from_now(ttl),
                    None => existing.expires_at,
                };

                self.entries.insert(
                    key.to_string(),
                    CacheEntry {
                        value: merged,
                        expires_at,
                        size,
                    },
                );
                self.stats.set_total_entries(self.entries.len());
            }
            None => self.set(key, partial, ttl),
        }
    }

    // == Remove ==
    /// Deletes the entry under `key`; no-op when absent.
    pub fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            debug!("Cache remove: {}", key);
            self.stats.set_total_entries(self.entries.len());
        }
    }

    // == Clear ==
    /// Deletes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
        self.stats.set_total_bytes(0);
    }

    // == Dispose ==
    /// Releases the store at process teardown. Equivalent to [`clear`](Self::clear).
    pub fn dispose(&mut self) {
        self.clear();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired.len();

        for key in expired {
            debug!("Cache expired: {}", key);
            self.entries.remove(&key);
            self.stats.record_expiration();
        }

        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats.set_total_bytes(self.total_size());
        stats
    }

    // == Total Size ==
    /// Sum of the computed sizes of all stored entries in bytes.
    pub fn total_size(&self) -> usize {
        self.entries.values().map(|entry| entry.size).sum()
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Evict Oldest ==
    /// Removes the entry with the soonest expiry timestamp.
    ///
    /// Eviction order is oldest-by-expiry, not least-recently-used: data
    /// closest to expiring leaves first even if it was read most recently.
    /// Returns false when there was nothing to evict.
    fn evict_oldest(&mut self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.expires_at)
            .map(|(key, _)| key.clone());

        match oldest {
            Some(key) => {
                debug!("Cache evicted: {}", key);
                self.entries.remove(&key);
                self.stats.record_eviction();
                true
            }
            None => false,
        }
    }
}

// == Merge ==
/// Shallow merge with object-spread semantics: top-level keys of `patch`
/// overwrite `base`'s. A non-object patch (or base) replaces the value.
fn merge_shallow(base: Value, patch: Value) -> Value {
    match (base, patch) {
        (Value::Object(mut base_map), Value::Object(patch_map)) => {
            for (k, v) in patch_map {
                base_map.insert(k, v);
            }
            Value::Object(base_map)
        }
        (_, patch) => patch,
    }
}
