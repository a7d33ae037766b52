//! Schema definitions: expected shape and coercion rules for a value tree.
//!
//! A [`Schema`] is a tree mirroring the value it describes. Leaf variables
//! are [`Required`](Schema::Required) or [`Optional`](Schema::Optional)
//! (carrying a default); composite nodes describe mappings, sequences
//! (one element schema repeated), and fixed-arity tuples. A leaf's "type"
//! is either a [`Coerce`] rule or, recursively, a nested schema — in that
//! case the wrapper decides whether the variable itself is present and
//! validation recurses into the nested shape.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Signature for custom coercion closures: convert or reject, with a
/// human-readable description of what was expected on rejection.
pub type CoerceFn = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// A rule converting a raw value to its schema-declared target type.
#[derive(Clone)]
pub enum Coerce {
    /// Identity: accept anything as-is.
    Any,
    Str,
    Int,
    Float,
    Bool,
    /// Membership in a fixed set of values.
    OneOf(Vec<Value>),
    /// A named custom conversion.
    With(&'static str, CoerceFn),
}

impl Coerce {
    /// What this rule produces, for error messages.
    pub fn describe(&self) -> String {
        match self {
            Coerce::Any => "any".into(),
            Coerce::Str => "string".into(),
            Coerce::Int => "integer".into(),
            Coerce::Float => "float".into(),
            Coerce::Bool => "bool".into(),
            Coerce::OneOf(options) => {
                let rendered: Vec<String> =
                    options.iter().map(|v| v.to_json().to_string()).collect();
                format!("one of [{}]", rendered.join(", "))
            }
            Coerce::With(name, _) => (*name).into(),
        }
    }

    /// Apply the rule. `Err` carries the expected-type description.
    pub fn apply(&self, value: &Value) -> Result<Value, String> {
        let reject = || Err(self.describe());
        match self {
            Coerce::Any => Ok(value.clone()),
            Coerce::Str => match value {
                Value::Str(_) => Ok(value.clone()),
                Value::Bool(b) => Ok(Value::Str(b.to_string())),
                Value::Int(i) => Ok(Value::Str(i.to_string())),
                Value::Float(f) => Ok(Value::Str(f.to_string())),
                _ => reject(),
            },
            Coerce::Int => match value {
                Value::Int(_) => Ok(value.clone()),
                Value::Float(f) if f.is_finite() => Ok(Value::Int(f.trunc() as i64)),
                Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
                Value::Str(s) => match s.trim().parse::<i64>() {
                    Ok(i) => Ok(Value::Int(i)),
                    Err(_) => reject(),
                },
                _ => reject(),
            },
            Coerce::Float => match value {
                Value::Float(_) => Ok(value.clone()),
                Value::Int(i) => Ok(Value::Float(*i as f64)),
                Value::Bool(b) => Ok(Value::Float(f64::from(u8::from(*b)))),
                Value::Str(s) => match s.trim().parse::<f64>() {
                    Ok(f) => Ok(Value::Float(f)),
                    Err(_) => reject(),
                },
                _ => reject(),
            },
            Coerce::Bool => match value {
                Value::Bool(_) => Ok(value.clone()),
                Value::Str(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
                Value::Str(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
                _ => reject(),
            },
            Coerce::OneOf(options) => {
                if options.contains(value) {
                    Ok(value.clone())
                } else {
                    reject()
                }
            }
            Coerce::With(_, f) => f(value),
        }
    }
}

impl fmt::Debug for Coerce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coerce::OneOf(options) => f.debug_tuple("OneOf").field(options).finish(),
            Coerce::With(name, _) => f.debug_tuple("With").field(name).finish(),
            other => write!(f, "{}", other.describe()),
        }
    }
}

/// Membership coercion over a fixed option set.
pub fn one_of<I, V>(options: I) -> Coerce
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Coerce::OneOf(options.into_iter().map(Into::into).collect())
}

/// A leaf variable's type: a coercion rule, or a nested schema standing
/// in for one.
#[derive(Debug, Clone)]
pub enum SchemaType {
    Coerce(Coerce),
    Nested(Box<Schema>),
}

/// A required/optional variable: its type and an optional description.
#[derive(Debug, Clone)]
pub struct Variable {
    pub ty: SchemaType,
    pub help: Option<String>,
}

/// The expected shape of a value tree.
#[derive(Debug, Clone)]
pub enum Schema {
    /// Must be supplied; validation fails on an absent value.
    Required(Variable),
    /// May be absent; the default is substituted and then itself coerced
    /// and validated, never injected raw.
    Optional(Variable, Value),
    /// A mapping with a fixed key set. Value keys outside it are dropped.
    Map(BTreeMap<String, Schema>),
    /// A variable-length sequence. Holds the schema of every element —
    /// exactly one entry; empty means untyped passthrough.
    Seq(Vec<Schema>),
    /// A fixed-arity tuple, one schema per position.
    Tuple(Vec<Schema>),
}

impl Schema {
    pub fn required(coerce: Coerce) -> Schema {
        Schema::Required(Variable {
            ty: SchemaType::Coerce(coerce),
            help: None,
        })
    }

    pub fn optional(coerce: Coerce, default: impl Into<Value>) -> Schema {
        Schema::Optional(
            Variable {
                ty: SchemaType::Coerce(coerce),
                help: None,
            },
            default.into(),
        )
    }

    /// A required variable whose type is a nested schema.
    pub fn required_nested(inner: Schema) -> Schema {
        Schema::Required(Variable {
            ty: SchemaType::Nested(Box::new(inner)),
            help: None,
        })
    }

    /// An optional variable whose type is a nested schema. An absent value
    /// is replaced by the default, which is then validated against `inner`.
    pub fn optional_nested(inner: Schema, default: impl Into<Value>) -> Schema {
        Schema::Optional(
            Variable {
                ty: SchemaType::Nested(Box::new(inner)),
                help: None,
            },
            default.into(),
        )
    }

    /// Attach a long description to a `Required`/`Optional` leaf.
    /// No effect on composite nodes.
    pub fn help(mut self, text: impl Into<String>) -> Schema {
        match &mut self {
            Schema::Required(var) | Schema::Optional(var, _) => var.help = Some(text.into()),
            _ => {}
        }
        self
    }

    pub fn map<K, I>(entries: I) -> Schema
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        Schema::Map(entries.into_iter().map(|(k, s)| (k.into(), s)).collect())
    }

    /// A sequence whose every element matches `element`.
    pub fn seq(element: Schema) -> Schema {
        Schema::Seq(vec![element])
    }

    /// A sequence with no element schema: contents pass through untyped.
    pub fn untyped_seq() -> Schema {
        Schema::Seq(Vec::new())
    }

    pub fn tuple(positions: impl IntoIterator<Item = Schema>) -> Schema {
        Schema::Tuple(positions.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::seq;

    #[test]
    fn int_coercion() {
        assert_eq!(Coerce::Int.apply(&Value::from("123")), Ok(Value::Int(123)));
        assert_eq!(Coerce::Int.apply(&Value::Float(1.9)), Ok(Value::Int(1)));
        assert_eq!(Coerce::Int.apply(&Value::Bool(true)), Ok(Value::Int(1)));
        assert!(Coerce::Int.apply(&Value::from("a")).is_err());
        assert!(Coerce::Int.apply(&seq(&[])).is_err());
    }

    #[test]
    fn float_coercion() {
        assert_eq!(Coerce::Float.apply(&Value::Int(2)), Ok(Value::Float(2.0)));
        assert_eq!(Coerce::Float.apply(&Value::from("1.5")), Ok(Value::Float(1.5)));
        assert!(Coerce::Float.apply(&Value::Null).is_err());
    }

    #[test]
    fn str_coercion_renders_scalars() {
        assert_eq!(Coerce::Str.apply(&Value::Int(5)), Ok(Value::from("5")));
        assert_eq!(Coerce::Str.apply(&Value::Bool(false)), Ok(Value::from("false")));
        assert!(Coerce::Str.apply(&seq(&[])).is_err());
    }

    #[test]
    fn bool_coercion_parses_strings_case_insensitively() {
        assert_eq!(Coerce::Bool.apply(&Value::from("TRUE")), Ok(Value::Bool(true)));
        assert_eq!(Coerce::Bool.apply(&Value::from("false")), Ok(Value::Bool(false)));
        assert!(Coerce::Bool.apply(&Value::from("yes")).is_err());
        assert!(Coerce::Bool.apply(&Value::Int(1)).is_err());
    }

    #[test]
    fn any_passes_containers_through() {
        let v = seq(&[Value::Int(1)]);
        assert_eq!(Coerce::Any.apply(&v), Ok(v));
    }

    #[test]
    fn one_of_membership() {
        let c = one_of(["fast", "slow"]);
        assert_eq!(c.apply(&Value::from("fast")), Ok(Value::from("fast")));
        let err = c.apply(&Value::from("medium")).unwrap_err();
        assert!(err.contains("fast") && err.contains("slow"));
    }

    #[test]
    fn custom_coercion_runs_closure() {
        let lower = Coerce::With(
            "lowercase string",
            Arc::new(|v: &Value| match v {
                Value::Str(s) => Ok(Value::Str(s.to_lowercase())),
                _ => Err("lowercase string".into()),
            }),
        );
        assert_eq!(lower.apply(&Value::from("ReD")), Ok(Value::from("red")));
        assert_eq!(lower.apply(&Value::Int(1)), Err("lowercase string".into()));
    }

    #[test]
    fn help_attaches_to_leaves_only() {
        let s = Schema::required(Coerce::Int).help("a port");
        match s {
            Schema::Required(var) => assert_eq!(var.help.as_deref(), Some("a port")),
            other => panic!("expected required leaf, got: {other:?}"),
        }

        let composite = Schema::map([("a", Schema::required(Coerce::Int))]).help("ignored");
        assert!(matches!(composite, Schema::Map(_)));
    }
}
