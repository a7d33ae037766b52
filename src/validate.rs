//! The validation engine: match a [`Schema`] against a [`Value`], coercing
//! types, substituting defaults, dropping unknown mapping keys, adjusting
//! sequence/tuple lengths, and reporting path-qualified errors.
//!
//! Two phases:
//!
//! 1. An up-front scan flattens the schema to its required leaves and
//!    checks each path against the value. Every absent required field is
//!    collected into a single aggregate error rather than failing on the
//!    first one found.
//! 2. Recursive dispatch by schema node kind. Each recursive step that
//!    fails prepends its path component to the error on unwind, so the
//!    final path reads left-to-right from the validation root to the
//!    failing node.
//!
//! Validation is a pure function over two immutable trees. Recursion depth
//! is bounded explicitly ([`MAX_DEPTH`]) so adversarially nested input
//! fails with a structured error instead of exhausting the stack.

use crate::error::{PathError, ValidationError, ValidationErrorKind};
use crate::path::{self, Path, Segment};
use crate::schema::{Schema, SchemaType, Variable};
use crate::value::{Map, Value};

/// Maximum nesting depth validation will recurse into.
pub const MAX_DEPTH: usize = 128;

/// Validate `value` against `schema`, producing the coerced result tree.
pub fn validate(schema: &Schema, value: Value) -> Result<Value, ValidationError> {
    let mut missing = Vec::new();
    let mut prefix = Vec::new();
    collect_missing(schema, &value, &mut prefix, &mut missing);
    if !missing.is_empty() {
        return Err(ValidationErrorKind::MissingFields(missing).into());
    }

    validate_node(schema, value, 0)
}

/// Record the path of every required leaf the value does not supply.
///
/// Optional subtrees are skipped (absence means "use the default"), as are
/// sequence contents (element count is unknown until validation). A value
/// of the wrong shape along the way is not "missing" — phase 2 reports it
/// as the shape mismatch it is.
fn collect_missing(schema: &Schema, root: &Value, prefix: &mut Vec<Segment>, out: &mut Vec<Path>) {
    match schema {
        Schema::Required(var) => {
            if prefix.is_empty() {
                // A coerce-typed required root is reported by phase 2
                // directly; a nested composite still contributes its own
                // required leaves to the aggregate report.
                if let SchemaType::Nested(inner) = &var.ty {
                    collect_missing(inner, root, prefix, out);
                }
                return;
            }
            let at = Path::from(prefix.clone());
            match path::get(root, &at) {
                Ok(v) if v.is_missing() => out.push(at),
                Ok(_) => {
                    if let SchemaType::Nested(inner) = &var.ty {
                        collect_missing(inner, root, prefix, out);
                    }
                }
                Err(PathError::KeyNotFound { .. } | PathError::IndexOutOfRange { .. }) => {
                    out.push(at)
                }
                Err(_) => {}
            }
        }
        Schema::Optional(_, _) | Schema::Seq(_) => {}
        Schema::Map(entries) => {
            for (key, child) in entries {
                prefix.push(Segment::Field(key.clone()));
                collect_missing(child, root, prefix, out);
                prefix.pop();
            }
        }
        Schema::Tuple(positions) => {
            for (i, child) in positions.iter().enumerate() {
                prefix.push(Segment::Index(i as i64));
                collect_missing(child, root, prefix, out);
                prefix.pop();
            }
        }
    }
}

/// Dispatch in fixed precedence: Required, Optional, Map, Seq, Tuple.
fn validate_node(schema: &Schema, value: Value, depth: usize) -> Result<Value, ValidationError> {
    if depth > MAX_DEPTH {
        return Err(ValidationErrorKind::DepthLimit(MAX_DEPTH).into());
    }
    match schema {
        Schema::Required(var) => validate_variable(var, value, depth),
        Schema::Optional(var, default) => {
            let value = if value.is_missing() {
                default.clone()
            } else {
                value
            };
            validate_variable(var, value, depth)
        }
        Schema::Map(entries) => validate_map(entries, value, depth),
        Schema::Seq(elements) => validate_seq(elements, value, depth),
        Schema::Tuple(positions) => validate_tuple(positions, value, depth),
    }
}

fn validate_variable(var: &Variable, value: Value, depth: usize) -> Result<Value, ValidationError> {
    if value.is_missing() {
        return Err(ValidationErrorKind::MissingRequired.into());
    }
    match &var.ty {
        SchemaType::Coerce(coerce) => {
            coerce.apply(&value).map_err(|expected| {
                ValidationErrorKind::Coercion {
                    value: value.to_json().to_string(),
                    kind: value.kind(),
                    expected,
                }
                .into()
            })
        }
        SchemaType::Nested(inner) => validate_node(inner, value, depth + 1),
    }
}

/// Result contains exactly the schema's keys; value keys outside the
/// schema are dropped without error.
fn validate_map(
    entries: &std::collections::BTreeMap<String, Schema>,
    value: Value,
    depth: usize,
) -> Result<Value, ValidationError> {
    // An absent mapping validates as empty: any required content was
    // already reported by the aggregate scan, optionals fill from defaults.
    let mut supplied = match value {
        Value::Missing => Map::new(),
        Value::Map(m) => m,
        other => {
            return Err(ValidationErrorKind::ShapeMismatch {
                expected: "mapping",
                found: other.kind(),
            }
            .into());
        }
    };

    let mut result = Map::new();
    for (key, child_schema) in entries {
        let child = supplied.remove(key).unwrap_or(Value::Missing);
        let validated =
            validate_node(child_schema, child, depth + 1).map_err(|e| e.at_field(key))?;
        result.insert(key.clone(), validated);
    }
    Ok(Value::Map(result))
}

fn validate_seq(elements: &[Schema], value: Value, depth: usize) -> Result<Value, ValidationError> {
    if elements.len() > 1 {
        return Err(ValidationErrorKind::InvalidSchema(format!(
            "sequence schema contains {} element definitions; expected one",
            elements.len()
        ))
        .into());
    }
    // No element schema means untyped passthrough of whatever is present.
    let fallback = Schema::required(crate::schema::Coerce::Any);
    let element_schema = elements.first().unwrap_or(&fallback);

    let items = match value {
        Value::Missing => Vec::new(),
        Value::Seq(items) => items,
        other => {
            return Err(ValidationErrorKind::ShapeMismatch {
                expected: "sequence",
                found: other.kind(),
            }
            .into());
        }
    };

    let mut result = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let validated =
            validate_node(element_schema, item, depth + 1).map_err(|e| e.at_index(i))?;
        result.push(validated);
    }
    Ok(Value::Seq(result))
}

fn validate_tuple(
    positions: &[Schema],
    value: Value,
    depth: usize,
) -> Result<Value, ValidationError> {
    let mut items = match value {
        Value::Missing => vec![Value::Missing; positions.len()],
        Value::Tuple(items) => items,
        // A sequence is accepted where a tuple is expected: values built
        // from command-line paths like '--a[1]' cannot tell the two apart.
        Value::Seq(items) => items,
        other => {
            return Err(ValidationErrorKind::ShapeMismatch {
                expected: "tuple",
                found: other.kind(),
            }
            .into());
        }
    };

    if items.len() > positions.len() {
        return Err(ValidationErrorKind::ArityMismatch {
            expected: positions.len(),
            found: items.len(),
        }
        .into());
    }
    items.resize(positions.len(), Value::Missing);

    let mut result = Vec::with_capacity(positions.len());
    for (i, (schema, item)) in positions.iter().zip(items).enumerate() {
        let validated = validate_node(schema, item, depth + 1).map_err(|e| e.at_index(i))?;
        result.push(validated);
    }
    Ok(Value::Tuple(result))
}
