//! Deterministic witness identifiers for construction violations.
//!
//! The same failure (law, tower, offending elements) always yields the same
//! id, across runs and processes.
//!
//! The id is `v1_` followed by the unpadded lowercase base32hex SHA-256 of
//! the key `{schema, law, lawRef, context}`, serialized compactly with
//! sorted keys.

use crate::error::{Law, Violation};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Compute a witness id from the canonical witness key fields.
pub fn compute_witness_id(law: Law, context: Option<&Value>) -> String {
    let key = canonical_witness_key(law, context);
    let hash = Sha256::digest(canonical(&key).as_bytes());
    format!("v1_{}", base32hex_lower(&hash))
}

/// Build a [`Violation`] with its witness id filled in.
///
/// The context records the claimed tower and the offending elements, so the
/// id changes exactly when one of those does.
pub fn violation(
    law: Law,
    tower: impl Into<String>,
    elements: Vec<String>,
    description: impl Into<String>,
) -> Violation {
    let tower = tower.into();
    let context = serde_json::json!({
        "tower": tower,
        "elements": elements,
    });
    Violation {
        witness_id: compute_witness_id(law, Some(&context)),
        law,
        tower,
        elements,
        description: description.into(),
    }
}

fn canonical_witness_key(law: Law, context: Option<&Value>) -> Value {
    serde_json::json!({
        "schema": 1,
        "law": law,
        "lawRef": law.law_ref(),
        "context": context.cloned().unwrap_or(Value::Null),
    })
}

/// Compact JSON with object keys sorted at every depth.
fn canonical(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let body: Vec<String> = items.iter().map(canonical).collect();
            format!("[{}]", body.join(","))
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let body: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), canonical(v)))
                .collect();
            format!("{{{}}}", body.join(","))
        }
        scalar => scalar.to_string(),
    }
}

/// RFC 4648 base32hex, lowercase, unpadded.
fn base32hex_lower(data: &[u8]) -> String {
    const ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";
    let total = data.len() * 8;
    (0..total.div_ceil(5))
        .map(|i| {
            let idx = (i * 5..i * 5 + 5).fold(0usize, |acc, bit| {
                let set = bit < total && data[bit / 8] & (0x80 >> (bit % 8)) != 0;
                (acc << 1) | usize::from(set)
            });
            ALPHABET[idx] as char
        })
        .collect()
}
