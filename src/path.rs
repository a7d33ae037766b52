//! Path addressing: parse `.field[index]` expressions and get/set against
//! a [`Value`] tree.
//!
//! A [`Path`] is an ordered list of [`Segment`]s — normalized field names
//! and signed integer indices. `.field` introduces a field component,
//! `[n]` an index component; the empty string is the empty path (the node
//! itself). Negative indices count from the end and are resolved against
//! the container length at the moment of application, not at parse time,
//! since intermediate `set` calls can extend the container mid-path.
//!
//! [`set`] is functional: it consumes the root and returns the new root.
//! With `build = true` it creates absent intermediates (a mapping for a
//! field segment, a `Missing`-padded sequence for an index segment), which
//! is how sparse override trees are grown from nothing.

use std::fmt;
use std::str::FromStr;

use crate::error::PathError;
use crate::keys;
use crate::value::{Map, Value};

/// One step of a path: a mapping field or a sequence/tuple index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    /// Signed: negative indices resolve from the end at application time.
    Index(i64),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => write!(f, ".{name}"),
            Segment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// An ordered list of segments addressing a location in a [`Value`] tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The empty path, addressing the node itself.
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    /// Prepend a segment; used when rewriting error paths on unwind.
    pub fn prepend(&mut self, segment: Segment) {
        self.0.insert(0, segment);
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Path(segments)
    }
}

impl fmt::Display for Path {
    /// Renders dotted/bracketed, without the leading dot: `a.b[0].c`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => write!(f, "{name}")?,
                other => write!(f, "{other}")?,
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, PathError> {
        let mut segments = Vec::new();
        let mut rest = s;

        while !rest.is_empty() {
            let offset = s.len() - rest.len();
            let syntax_error = || PathError::Syntax {
                input: s.to_string(),
                rest: rest.to_string(),
                offset,
            };

            if let Some(after) = rest.strip_prefix('.') {
                let end = after
                    .find(['.', '['])
                    .unwrap_or(after.len());
                let raw = &after[..end];
                if !keys::is_valid_identifier(raw) {
                    return Err(syntax_error());
                }
                segments.push(Segment::Field(keys::normalize_key(raw)));
                rest = &after[end..];
            } else if let Some(after) = rest.strip_prefix('[') {
                let Some(end) = after.find(']') else {
                    return Err(syntax_error());
                };
                let index: i64 = after[..end].parse().map_err(|_| syntax_error())?;
                segments.push(Segment::Index(index));
                rest = &after[end + 1..];
            } else {
                return Err(syntax_error());
            }
        }

        Ok(Path(segments))
    }
}

/// Render the not-yet-consumed tail of a path for error messages.
fn render_remaining(segments: &[Segment]) -> String {
    segments.iter().map(Segment::to_string).collect()
}

/// Resolve a possibly-negative index against the current container length.
/// `extend = true` allows a nonnegative index past the end (`set` pads);
/// `extend = false` requires it in range (`get` never extends).
fn resolve_index(index: i64, len: usize, extend: bool) -> Result<usize, PathError> {
    let out_of_range = PathError::IndexOutOfRange { index, len };
    if index >= 0 {
        let idx = index as usize;
        if idx < len || extend {
            Ok(idx)
        } else {
            Err(out_of_range)
        }
    } else {
        let resolved = len as i64 + index;
        if resolved >= 0 {
            Ok(resolved as usize)
        } else {
            Err(out_of_range)
        }
    }
}

/// Retrieve the value a path addresses. Never modifies or extends anything.
pub fn get<'a>(value: &'a Value, path: &Path) -> Result<&'a Value, PathError> {
    let mut current = value;
    for (i, segment) in path.0.iter().enumerate() {
        current = match (current, segment) {
            (Value::Map(m), Segment::Field(key)) => {
                m.get(key).ok_or_else(|| PathError::KeyNotFound { key: key.clone() })?
            }
            (Value::Seq(items) | Value::Tuple(items), Segment::Index(index)) => {
                &items[resolve_index(*index, items.len(), false)?]
            }
            (v @ (Value::Map(_) | Value::Seq(_) | Value::Tuple(_)), segment) => {
                return Err(PathError::TypeMismatch {
                    segment: segment.to_string(),
                    kind: v.kind(),
                });
            }
            (v, _) => {
                return Err(PathError::PathTooDeep {
                    kind: v.kind(),
                    remaining: render_remaining(&path.0[i..]),
                });
            }
        };
    }
    Ok(current)
}

/// Build-mode get: like [`get`], but absent mapping keys along the path are
/// created as empty mappings. Sequences are still never extended.
pub fn get_or_insert<'a>(value: &'a mut Value, path: &Path) -> Result<&'a mut Value, PathError> {
    let mut current = value;
    for (i, segment) in path.0.iter().enumerate() {
        current = match (current, segment) {
            (Value::Map(m), Segment::Field(key)) => {
                m.entry(key.clone()).or_insert_with(|| Value::Map(Map::new()))
            }
            (Value::Seq(items) | Value::Tuple(items), Segment::Index(index)) => {
                let idx = resolve_index(*index, items.len(), false)?;
                &mut items[idx]
            }
            (v @ (Value::Map(_) | Value::Seq(_) | Value::Tuple(_)), segment) => {
                return Err(PathError::TypeMismatch {
                    segment: segment.to_string(),
                    kind: v.kind(),
                });
            }
            (v, _) => {
                return Err(PathError::PathTooDeep {
                    kind: v.kind(),
                    remaining: render_remaining(&path.0[i..]),
                });
            }
        };
    }
    Ok(current)
}

/// Set the value a path addresses, returning the new root.
///
/// With `build`, absent intermediates are created: a mapping for a field
/// segment, a `Missing`-padded sequence for an index segment. Sequences
/// and tuples shorter than `index + 1` are extended with `Missing` padding
/// regardless of `build` — setting past the end of a tuple extends it too;
/// schema validation enforces tuple arity later. Without `build`, an
/// absent mapping key fails `KeyNotFound` even at the final segment.
pub fn set(value: Value, path: &Path, new_value: Value, build: bool) -> Result<Value, PathError> {
    set_at(value, &path.0, new_value, build)
}

fn set_at(value: Value, segments: &[Segment], new_value: Value, build: bool) -> Result<Value, PathError> {
    let Some((segment, rest)) = segments.split_first() else {
        return Ok(new_value);
    };

    match (value, segment) {
        (Value::Map(mut m), Segment::Field(key)) => {
            let child = match m.remove(key) {
                Some(child) => child,
                None if build => Value::Missing,
                None => return Err(PathError::KeyNotFound { key: key.clone() }),
            };
            m.insert(key.clone(), set_at(child, rest, new_value, build)?);
            Ok(Value::Map(m))
        }
        (Value::Seq(items), Segment::Index(index)) => {
            set_element(items, *index, rest, new_value, build).map(Value::Seq)
        }
        (Value::Tuple(items), Segment::Index(index)) => {
            set_element(items, *index, rest, new_value, build).map(Value::Tuple)
        }
        // Build creates containers only where nothing was supplied; it
        // never overwrites an existing scalar mid-path.
        (Value::Missing, Segment::Field(_)) if build => {
            set_at(Value::Map(Map::new()), segments, new_value, build)
        }
        (Value::Missing, Segment::Index(_)) if build => {
            set_at(Value::Seq(Vec::new()), segments, new_value, build)
        }
        (v @ (Value::Map(_) | Value::Seq(_) | Value::Tuple(_)), segment) => {
            Err(PathError::TypeMismatch {
                segment: segment.to_string(),
                kind: v.kind(),
            })
        }
        (v, _) => Err(PathError::PathTooDeep {
            kind: v.kind(),
            remaining: render_remaining(segments),
        }),
    }
}

fn set_element(
    mut items: Vec<Value>,
    index: i64,
    rest: &[Segment],
    new_value: Value,
    build: bool,
) -> Result<Vec<Value>, PathError> {
    let idx = resolve_index(index, items.len(), true)?;
    if idx >= items.len() {
        items.resize(idx + 1, Value::Missing);
    }
    let child = std::mem::replace(&mut items[idx], Value::Missing);
    items[idx] = set_at(child, rest, new_value, build)?;
    Ok(items)
}
