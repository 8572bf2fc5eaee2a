//! Navigation of Junos JSON replies.
//!
//! Junos renders every element as an array, and every leaf as
//! `[{"data": "<value>"}]`:
//!
//! ```json
//! {"bgp-information": [{"bgp-peer": [{"peer-state": [{"data": "Established"}]}]}]}
//! ```
//!
//! The helpers here accept both that shape and the flattened one some releases
//! and proxies produce (plain objects, plain strings), so the normalizer never
//! has to care.

use serde_json::Value;

/// The first element under `key`.
pub fn child<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    match node.get(key)? {
        Value::Array(items) => items.first(),
        other => Some(other),
    }
}

/// Every element under `key`; empty when the key is absent.
pub fn children<'a>(node: &'a Value, key: &str) -> &'a [Value] {
    match node.get(key) {
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => std::slice::from_ref(other),
        None => &[],
    }
}

/// Follows `keys`, taking the first element at each step.
pub fn path<'a>(node: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(node, |current, key| child(current, key))
}

/// Text of the leaf under `key`.
pub fn leaf<'a>(node: &'a Value, key: &str) -> Option<&'a str> {
    match child(node, key)? {
        Value::String(s) => Some(s.as_str()),
        other => other.get("data")?.as_str(),
    }
}

/// Whether the element under `key` is present at all, even if empty.
pub fn has(node: &Value, key: &str) -> bool {
    node.get(key).is_some()
}

/// Numeric leaf under `key`. Junos reports counters as strings.
pub fn leaf_u64(node: &Value, key: &str) -> Option<u64> {
    match child(node, key)? {
        Value::Number(n) => n.as_u64(),
        _ => leaf(node, key)?.trim().parse().ok(),
    }
}

/// The message of an error reply, if the payload is one.
///
/// Covers both `{"error": [{"message": ..}]}` and `{"xnm:error": [..]}`.
pub fn error_message(node: &Value) -> Option<String> {
    ["error", "xnm:error", "rpc-error"]
        .iter()
        .filter_map(|key| child(node, key))
        .find_map(|err| {
            leaf(err, "message")
                .or_else(|| leaf(err, "error-message"))
                .map(|m| m.trim().to_string())
        })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
