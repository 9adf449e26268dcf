//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the store's TTL, budget, and merge properties.

use std::time::Duration;

use proptest::prelude::*;
use serde_json::{json, Value};

use crate::cache::CacheStore;

// == Test Configuration ==
const TEST_MAX_BYTES: usize = 64 * 1024;
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates valid cache keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,32}".prop_map(|s| s)
}

/// Generates JSON payloads of the shapes the service layer caches
fn valid_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,64}".prop_map(Value::String),
        any::<i64>().prop_map(|n| json!(n)),
        ("[a-z]{1,16}", any::<u32>()).prop_map(|(name, qty)| json!({ "name": name, "qty": qty })),
    ]
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Value },
    Get { key: String },
    Remove { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Remove { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of set calls, the sum of live entry sizes stays
    // within the configured byte budget after every call.
    #[test]
    fn prop_size_budget_invariant(
        entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..100
        )
    ) {
        // Small budget so eviction is exercised; every generated value is
        // individually smaller than the budget, so the invariant must hold
        let max_bytes = 256;
        let mut store = CacheStore::new(max_bytes, TEST_TTL);

        for (key, value) in entries {
            store.set(&key, value, None);
            prop_assert!(
                store.total_size() <= max_bytes,
                "Live size {} exceeds budget {}",
                store.total_size(),
                max_bytes
            );
        }
    }

    // For any valid key-value pair, storing then retrieving (before
    // expiration) returns a value equal to what was stored.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = CacheStore::new(TEST_MAX_BYTES, TEST_TTL);

        store.set(&key, value.clone(), None);

        prop_assert_eq!(store.get(&key), Some(value), "Round-trip value mismatch");
    }

    // For any key in the cache, a remove makes a subsequent get return None.
    #[test]
    fn prop_remove_deletes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = CacheStore::new(TEST_MAX_BYTES, TEST_TTL);

        store.set(&key, value, None);
        prop_assert!(store.get(&key).is_some(), "Key should exist before remove");

        store.remove(&key);
        prop_assert!(store.get(&key).is_none(), "Key should not exist after remove");
    }

    // For any key, storing V1 then V2 results in get returning V2.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let mut store = CacheStore::new(TEST_MAX_BYTES, TEST_TTL);

        store.set(&key, value1, None);
        store.set(&key, value2.clone(), None);

        prop_assert_eq!(store.get(&key), Some(value2), "Overwrite should return new value");
        prop_assert_eq!(store.len(), 1, "Should have exactly one entry after overwrite");
    }

    // Replace with a non-empty prefix removes every key containing it as a
    // substring and leaves the rest untouched.
    #[test]
    fn prop_replace_substring_semantics(
        keys in prop::collection::hash_set(valid_key_strategy(), 1..20),
        fragment in "[a-zA-Z0-9_]{1,4}",
        new_key in valid_key_strategy(),
        value in valid_value_strategy()
    ) {
        let mut store = CacheStore::new(TEST_MAX_BYTES, TEST_TTL);

        for key in &keys {
            store.set(key, json!(1), None);
        }

        store.replace(&new_key, &fragment, value.clone(), None);

        for key in &keys {
            if key == &new_key {
                continue;
            }
            if key.contains(&fragment) {
                prop_assert!(
                    store.get(key).is_none(),
                    "Key '{}' containing '{}' should have been removed",
                    key,
                    fragment
                );
            } else {
                prop_assert!(
                    store.get(key).is_some(),
                    "Key '{}' without '{}' should survive",
                    key,
                    fragment
                );
            }
        }

        prop_assert_eq!(store.get(&new_key), Some(value));
    }

    // Update on an existing object entry merges top-level keys and keeps
    // the original expiry; on a missing key it behaves as set.
    #[test]
    fn prop_update_merge_preserves_expiry(
        key in valid_key_strategy(),
        name in "[a-z]{1,16}",
        email in "[a-z]{1,8}@[a-z]{1,8}\\.com"
    ) {
        let mut store = CacheStore::new(TEST_MAX_BYTES, TEST_TTL);

        store.set(&key, json!({ "name": name }), Some(Duration::from_secs(1)));
        let original_expiry = store.get_all()[&key].expires_at;

        store.update(&key, json!({ "email": email }), None);

        prop_assert_eq!(
            store.get(&key),
            Some(json!({ "name": name, "email": email }))
        );
        prop_assert_eq!(store.get_all()[&key].expires_at, original_expiry);
    }

    // Hit and miss counters reflect exactly the get outcomes observed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = CacheStore::new(TEST_MAX_BYTES, TEST_TTL);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(&key, value, None);
                }
                CacheOp::Get { key } => {
                    match store.get(&key) {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                }
                CacheOp::Remove { key } => {
                    store.remove(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, store.len(), "Total entries mismatch");
    }
}
