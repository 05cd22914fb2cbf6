//! Uniform response envelope — the wire contract every client parses.
//!
//! Success: `{success: true, data, ...extra}`.
//! Error: `{success: false, data: null, error: {message, stack}}`.
//! Paginated: success with `metadata.pagination` in the extras.

use serde::Serialize;
use serde_json::{json, Value};

pub fn success<T: Serialize>(data: T) -> Value {
    json!({ "success": true, "data": data })
}

/// Success envelope with extra top-level fields merged in (not nested under
/// `data`).
pub fn success_with<T: Serialize>(data: T, extra: Value) -> Value {
    let mut body = success(data);
    if let (Some(obj), Value::Object(extra)) = (body.as_object_mut(), extra) {
        for (key, value) in extra {
            obj.insert(key, value);
        }
    }
    body
}

pub fn error_body(message: &str, stack: &str) -> Value {
    json!({
        "success": false,
        "data": Value::Null,
        "error": { "message": message, "stack": stack },
    })
}

/// Paginated listing: `{data: T[], metadata: {pagination: {total, page, limit}}}`.
pub fn paginated<T: Serialize>(data: &[T], total: i64, page: i64, limit: i64) -> Value {
    success_with(
        data,
        json!({
            "metadata": {
                "pagination": { "total": total, "page": page, "limit": limit },
            },
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_wraps_data() {
        let body = success(json!({"token": "abc"}));
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["token"], "abc");
    }

    #[test]
    fn extras_merge_at_the_top_level() {
        let body = success_with(json!([1, 2]), json!({"metadata": {"hint": "x"}}));
        assert_eq!(body["success"], true);
        assert_eq!(body["metadata"]["hint"], "x");
        assert!(body["data"].is_array());
    }

    #[test]
    fn error_carries_message_and_stack() {
        let body = error_body("Invalid credentials", "Invalid credentials");
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        assert_eq!(body["error"]["message"], "Invalid credentials");
    }

    #[test]
    fn pagination_nests_under_metadata() {
        let body = paginated(&[json!({"id": 1})], 42, 2, 10);
        assert_eq!(body["metadata"]["pagination"]["total"], 42);
        assert_eq!(body["metadata"]["pagination"]["page"], 2);
        assert_eq!(body["metadata"]["pagination"]["limit"], 10);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }
}
