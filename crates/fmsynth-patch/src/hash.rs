//! Canonical patch hashing.
//!
//! Two patches with the same parameters hash identically regardless of key
//! order or whitespace in the file they came from:
//!
//! ```text
//! patch_hash = hex(BLAKE3(canonical_json(patch)))
//! ```

use serde_json::Value;

use crate::error::PatchResult;
use crate::patch::Patch;

/// Computes the canonical BLAKE3 hash of a patch.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
///
/// # Example
/// ```
/// use fmsynth_patch::{Patch, canonical_patch_hash};
///
/// let hash = canonical_patch_hash(&Patch::default()).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn canonical_patch_hash(patch: &Patch) -> PatchResult<String> {
    let value = patch.to_value()?;
    Ok(canonical_value_hash(&value))
}

/// Computes the canonical BLAKE3 hash of a JSON value.
pub fn canonical_value_hash(value: &Value) -> String {
    blake3_hash(canonicalize_json(value).as_bytes())
}

/// Canonicalizes a JSON value.
///
/// Object keys are sorted lexicographically, there is no whitespace between
/// tokens, and integer-valued floats are written without a fraction so that
/// `1` and `1.0` hash the same.
pub fn canonicalize_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(n)),
        Value::String(s) => write_string(s, out),
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
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => format!("{}", f),
        None => "null".to_string(),
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\x20' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Computes a BLAKE3 hash of arbitrary data as lowercase hex.
pub fn blake3_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{AdsrParams, OperatorParams};
    use serde_json::json;

    #[test]
    fn test_canonical_patch_hash_stable() {
        let patch = Patch::default();
        let hash1 = canonical_patch_hash(&patch).unwrap();
        let hash2 = canonical_patch_hash(&patch.clone()).unwrap();
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert!(hash1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_parameter_change_changes_hash() {
        let patch = Patch::default();
        let mut edited = patch.clone();
        edited.operators.insert(1, OperatorParams::ratio(1.0, 0.5));
        assert_ne!(
            canonical_patch_hash(&patch).unwrap(),
            canonical_patch_hash(&edited).unwrap()
        );

        let mut enveloped = patch.clone();
        enveloped.envelope = Some(AdsrParams::new(0.0, 0.0, 1.0, 0.0));
        assert_ne!(
            canonical_patch_hash(&patch).unwrap(),
            canonical_patch_hash(&enveloped).unwrap()
        );
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let a = json!({"b": 1, "a": [1.0, 2.5], "c": {"y": null, "x": true}});
        let b = json!({"c": {"x": true, "y": null}, "a": [1, 2.5], "b": 1.0});
        assert_eq!(canonicalize_json(&a), r#"{"a":[1,2.5],"b":1,"c":{"x":true,"y":null}}"#);
        assert_eq!(canonical_value_hash(&a), canonical_value_hash(&b));
    }

    #[test]
    fn test_string_escaping() {
        let value = json!({"k": "a\"b\\c\n\u{1}"});
        assert_eq!(canonicalize_json(&value), r#"{"k":"a\"b\\c\n\u0001"}"#);
    }
}
