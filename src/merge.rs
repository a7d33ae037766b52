//! Overlay merge: combine two value trees where the authoritative side
//! wins except at `Missing`, which defers to the base.
//!
//! This is the algebra that layers sparse command-line overrides (built
//! with `set(..., build = true)`) over a full file-sourced value. Mappings
//! union their keys and recurse where both sides have the key; sequences
//! and tuples are padded to the longer length with `Missing` and merged
//! element-wise, so an override can replace a single index without
//! restating the rest of the list.

use crate::value::{Map, Value};

/// Deep-merge `authoritative` over `base`.
///
/// - `Missing` in `authoritative` yields `base`'s value at that position.
/// - Mapping × mapping: union of keys, recursing where both sides agree.
/// - Sequence/tuple × same kind: pad the shorter with `Missing`, merge by
///   index. Positions absent from both sides stay `Missing` in the output
///   (validation decides what that means).
/// - Any other authoritative value replaces base wholesale — authoritative
///   always wins at a shape mismatch.
pub fn merge(authoritative: Value, base: Value) -> Value {
    match authoritative {
        Value::Missing => base,
        Value::Map(auth) => {
            let mut merged = match base {
                Value::Map(m) => m,
                _ => Map::new(),
            };
            for (key, value) in auth {
                let below = merged.remove(&key).unwrap_or(Value::Missing);
                merged.insert(key, merge(value, below));
            }
            Value::Map(merged)
        }
        Value::Seq(auth) => Value::Seq(merge_elements(auth, base_elements(base))),
        Value::Tuple(auth) => Value::Tuple(merge_elements(auth, base_elements(base))),
        scalar => scalar,
    }
}

/// Base elements for an element-wise merge; a non-list base is discarded
/// (the authoritative list wins wholesale).
fn base_elements(base: Value) -> Vec<Value> {
    match base {
        Value::Seq(items) | Value::Tuple(items) => items,
        _ => Vec::new(),
    }
}

fn merge_elements(mut auth: Vec<Value>, mut base: Vec<Value>) -> Vec<Value> {
    let len = auth.len().max(base.len());
    auth.resize(len, Value::Missing);
    base.resize(len, Value::Missing);
    auth.into_iter()
        .zip(base)
        .map(|(a, b)| merge(a, b))
        .collect()
}
