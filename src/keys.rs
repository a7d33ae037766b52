//! Mapping-key normalization and filtering.
//!
//! File-sourced values arrive with whatever keys the format allowed.
//! Before merge/validation, keys are canonicalized (letter-flanked hyphens
//! become underscores, so `pool-size` and `pool_size` address the same
//! field) and keys that are not valid identifiers are dropped entirely —
//! the conventional way for a config file to carry private helper entries
//! (e.g. a leading-underscore key) the schema should never see.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::Value;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Za-z][A-Za-z0-9_-]*$").expect("identifier regex"));

/// True iff `key` is a valid mapping key: starts with a letter, continues
/// with letters, digits, underscores, or hyphens.
pub fn is_valid_identifier(key: &str) -> bool {
    IDENTIFIER.is_match(key)
}

/// Replace every hyphen flanked by letters on both sides with an
/// underscore. Leading/trailing hyphens and hyphens next to digits are
/// left alone. A single pass handles runs like `a-b-c`, so the result is
/// a fixed point: normalizing twice changes nothing.
pub fn normalize_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len());
    for (i, &c) in chars.iter().enumerate() {
        let flanked = c == '-'
            && i > 0
            && chars[i - 1].is_ascii_alphabetic()
            && chars.get(i + 1).is_some_and(|n| n.is_ascii_alphabetic());
        out.push(if flanked { '_' } else { c });
    }
    out
}

/// Recursively normalize every mapping key in a tree.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Map(m) => Value::Map(
            m.into_iter()
                .map(|(k, v)| (normalize_key(&k), normalize_keys(v)))
                .collect(),
        ),
        Value::Seq(items) => Value::Seq(items.into_iter().map(normalize_keys).collect()),
        Value::Tuple(items) => Value::Tuple(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Recursively rebuild mapping nodes keeping only valid-identifier keys.
/// Sequence and tuple elements are recursed into but never dropped — only
/// mapping keys are filtered.
pub fn strip_invalid_keys(value: Value) -> Value {
    match value {
        Value::Map(m) => Value::Map(
            m.into_iter()
                .filter(|(k, _)| is_valid_identifier(k))
                .map(|(k, v)| (k, strip_invalid_keys(v)))
                .collect(),
        ),
        Value::Seq(items) => Value::Seq(items.into_iter().map(strip_invalid_keys).collect()),
        Value::Tuple(items) => Value::Tuple(items.into_iter().map(strip_invalid_keys).collect()),
        other => other,
    }
}
