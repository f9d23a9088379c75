//! Canonical fingerprint of JSON request bodies
//!
//! Bodies are decoded to a JSON object and re-encoded with every object's
//! keys in lexicographic order before hashing, so key order in the original
//! payload never changes the fingerprint. Numbers are compared by value:
//! `100`, `100.0` and `1e2` share one canonical spelling. Bodies that are not
//! a JSON object are hashed verbatim.

use serde_json::{Map, Number, Value};
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the canonical form of `input`; `""` for empty input
pub fn canonical_hash(input: &[u8]) -> String {
    if input.is_empty() {
        return String::new();
    }

    match serde_json::from_slice::<Map<String, Value>>(input) {
        Ok(object) => sha256_hex(canonical_json(&Value::Object(object)).as_bytes()),
        Err(_) => sha256_hex(input),
    }
}

/// Fingerprint of an already-structured body; `null` hashes to `""`
pub fn hash_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Object(_) => sha256_hex(canonical_json(value).as_bytes()),
        other => sha256_hex(other.to_string().as_bytes()),
    }
}

/// Compact JSON with object keys sorted at every depth
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Number(n) => out.push_str(&canonical_number(n)),
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Largest magnitude at which every integer is exactly representable as f64
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Integral values within the exact f64 range print as integers, everything
/// else in its f64 form
fn canonical_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INT => format!("{}", f as i64),
        Some(f) => Number::from_f64(f)
            .map(|n| n.to_string())
            .unwrap_or_else(|| n.to_string()),
        None => n.to_string(),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
