//! Canonical JSON encoding for deterministic serialization.
//!
//! Rules:
//! - No whitespace between tokens
//! - Object keys sorted lexicographically by byte comparison, at every
//!   nesting level
//! - Number and string tokens use serde_json's compact forms (shortest
//!   round-trip floats, minimal escaping)
//!
//! The canonical encoding is the linchpin of the whole protocol: the same
//! logical payload must serialize to the same bytes, on any implementation,
//! in any language. Any change to the separators or the sort rule is a
//! breaking protocol change. Golden byte vectors live in the testkit.

use serde_json::{Map, Value};

/// Encode a JSON value to canonical bytes.
pub fn to_canonical_bytes(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    write_value(&mut buf, value);
    buf
}

/// Recursively encode a JSON value.
fn write_value(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => buf.extend_from_slice(b"null"),
        Value::Bool(true) => buf.extend_from_slice(b"true"),
        Value::Bool(false) => buf.extend_from_slice(b"false"),
        Value::Number(n) => buf.extend_from_slice(n.to_string().as_bytes()),
        Value::String(s) => write_string(buf, s),
        Value::Array(items) => write_array(buf, items),
        Value::Object(map) => write_object(buf, map),
    }
}

/// Encode a string token with serde_json's escaping.
fn write_string(buf: &mut Vec<u8>, s: &str) {
    let token = serde_json::to_string(s).expect("string encoding is infallible");
    buf.extend_from_slice(token.as_bytes());
}

/// Encode an array. Element order is preserved.
fn write_array(buf: &mut Vec<u8>, items: &[Value]) {
    buf.push(b'[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        write_value(buf, item);
    }
    buf.push(b']');
}

/// Encode an object with keys sorted by byte comparison.
fn write_object(buf: &mut Vec<u8>, map: &Map<String, Value>) {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

    buf.push(b'{');
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        write_string(buf, key);
        buf.push(b':');
        write_value(buf, value);
    }
    buf.push(b'}');
}
