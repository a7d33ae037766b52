//! The generic nested value model all other modules operate on.
//!
//! A [`Value`] is a parsed-but-untyped configuration tree: scalars,
//! sequences, fixed-arity tuples, and string-keyed mappings. The extra
//! [`Missing`](Value::Missing) variant marks "no value supplied here" — it
//! appears transiently inside merge inputs and sparse override trees and is
//! resolved away by merge/validation.
//!
//! File-format adapters hand us their output as `serde_json::Value`; the
//! conversion in this module is the only JSON coupling in the crate. JSON
//! cannot express tuples, so arrays always land as [`Value::Seq`] —
//! adapters for formats that can distinguish the two build `Value::Tuple`
//! directly.

use std::collections::BTreeMap;

/// A string-keyed mapping node. Key order is not significant.
pub type Map = BTreeMap<String, Value>;

/// A nested configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value supplied at this position. Never a legitimate final value;
    /// merge and validation resolve it away (or reject it).
    Missing,
    /// An explicit null, distinct from `Missing`: the source said "nothing".
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Variable-length ordered sequence.
    Seq(Vec<Value>),
    /// Fixed-arity ordered tuple. Behaves like `Seq` for path operations;
    /// schema validation enforces exact arity.
    Tuple(Vec<Value>),
    Map(Map),
}

impl Value {
    /// Human-readable kind name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Missing => "missing",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Seq(_) => "sequence",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "mapping",
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Convert to a `serde_json::Value` for serde-based consumers.
    ///
    /// `Missing` renders as JSON null: residual gaps that survived merge
    /// (positions absent from every input) are the only place it can still
    /// occur, and adapters have no sentinel to map it to.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Missing | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Value::from(*f),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Seq(items) | Value::Tuple(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(m) => serde_json::Value::Object(
                m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Seq(items)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // u64 above i64::MAX or a float; either way f64 is the
                    // closest thing our scalar set has.
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::map;

    #[test]
    fn kind_names() {
        assert_eq!(Value::Missing.kind(), "missing");
        assert_eq!(Value::Int(1).kind(), "integer");
        assert_eq!(Value::Seq(vec![]).kind(), "sequence");
        assert_eq!(Value::Tuple(vec![]).kind(), "tuple");
        assert_eq!(Value::Map(Map::new()).kind(), "mapping");
    }

    #[test]
    fn seq_and_tuple_are_distinct() {
        assert_ne!(Value::Seq(vec![Value::Int(1)]), Value::Tuple(vec![Value::Int(1)]));
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::Str("x".into()).as_str(), Some("x"));
        assert_eq!(Value::Int(7).as_str(), None);
        assert_eq!(Value::Tuple(vec![Value::Int(1)]).as_seq().unwrap().len(), 1);
    }

    #[test]
    fn from_json_scalars() {
        let v = Value::from(serde_json::json!({"a": 1, "b": [true, null], "c": 1.5}));
        assert_eq!(
            v,
            Value::Map(map(&[
                ("a", Value::Int(1)),
                ("b", Value::Seq(vec![Value::Bool(true), Value::Null])),
                ("c", Value::Float(1.5)),
            ]))
        );
    }

    #[test]
    fn json_arrays_are_sequences_not_tuples() {
        let v = Value::from(serde_json::json!([1, 2]));
        assert!(matches!(v, Value::Seq(_)));
    }

    #[test]
    fn to_json_renders_missing_as_null() {
        let v = Value::Seq(vec![Value::Int(1), Value::Missing]);
        assert_eq!(v.to_json(), serde_json::json!([1, null]));
    }

    #[test]
    fn to_json_round_trips_a_mapping() {
        let v = Value::Map(map(&[("a", Value::Int(1)), ("b", Value::Str("x".into()))]));
        assert_eq!(v.to_json(), serde_json::json!({"a": 1, "b": "x"}));
    }
}
