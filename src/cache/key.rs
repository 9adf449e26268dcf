//! Cache Key Module
//!
//! Builds the composite keys the service layer uses to memoize API
//! responses. Callers must reproduce this format exactly to get cache hits.

use std::fmt::Write;

use serde_json::Value;

// == Cache Key ==
/// Builds a composite cache key: `prefix + method + "{v1}{v2}..."`.
///
/// Parameters are appended in slice order. Names starting with `_` are
/// hidden parameters (abort signals, request metadata) and are excluded
/// from the key. String values are interpolated without surrounding quotes
/// so a `"525"` parameter and a `525` parameter produce the same key text.
pub fn cache_key(prefix: &str, method: &str, params: &[(&str, &Value)]) -> String {
    let mut key = format!("{}{}", prefix, method);

    for (name, value) in params {
        if name.starts_with('_') {
            continue;
        }

        match value {
            Value::String(text) => {
                let _ = write!(key, "{{{}}}", text);
            }
            other => {
                let _ = write!(key, "{{{}}}", other);
            }
        }
    }

    key
}
