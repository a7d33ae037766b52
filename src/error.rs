//! Error types for path addressing, override parsing, and validation.
//!
//! All errors are plain returned values — nothing here is fatal, retried,
//! or swallowed. Validation errors carry the full path from the validation
//! root to the failing node, built up by prepending one segment per
//! recursion level as the error propagates upward.

use thiserror::Error;

use crate::path::{Path, Segment};

/// Failure while parsing or applying a [`Path`](crate::path::Path).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("unable to parse path at '{rest}' (offset {offset} in '{input}')")]
    Syntax {
        input: String,
        rest: String,
        offset: usize,
    },

    #[error("key not found: '{key}'")]
    KeyNotFound { key: String },

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("cannot apply {segment} to a {kind}")]
    TypeMismatch {
        segment: String,
        kind: &'static str,
    },

    #[error("path continues past terminal {kind} node (remaining: '{remaining}')")]
    PathTooDeep {
        kind: &'static str,
        remaining: String,
    },
}

/// Failure while turning `--key value` override tokens into a value tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverrideError {
    #[error("arguments must be of the form '--key value' or '--key=value', got '{token}'")]
    BadToken { token: String },

    #[error("found key '--{key}' but no value")]
    MissingValue { key: String },

    #[error(transparent)]
    Path(#[from] PathError),
}

/// What went wrong during schema validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationErrorKind {
    /// Aggregate report: every required leaf absent from the value,
    /// collected before structural validation starts.
    #[error("missing required fields: {}", .0.iter().map(Path::to_string).collect::<Vec<_>>().join(", "))]
    MissingFields(Vec<Path>),

    #[error("missing required argument")]
    MissingRequired,

    #[error("failed to coerce {kind} value '{value}' to {expected}")]
    Coercion {
        value: String,
        kind: &'static str,
        expected: String,
    },

    #[error("schema calls for {expected}; found {found} instead")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("tuple schema has arity {expected} but value has {found} elements")]
    ArityMismatch { expected: usize, found: usize },

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("value nesting exceeds the depth limit ({0})")]
    DepthLimit(usize),
}

/// A validation failure and the path from the validation root to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub path: Path,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind) -> Self {
        ValidationError {
            kind,
            path: Path::root(),
        }
    }

    /// Prepend a mapping-field segment; called as the error unwinds out of
    /// a recursive step so the final path reads root-to-failure.
    pub fn at_field(mut self, key: &str) -> Self {
        self.path.prepend(Segment::Field(key.to_string()));
        self
    }

    /// Prepend a sequence/tuple index segment.
    pub fn at_index(mut self, index: usize) -> Self {
        self.path.prepend(Segment::Index(index as i64));
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} ({})", self.kind, self.path)
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationErrorKind> for ValidationError {
    fn from(kind: ValidationErrorKind) -> Self {
        ValidationError::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_error_formats() {
        let err = PathError::KeyNotFound { key: "database".into() };
        assert!(err.to_string().contains("database"));

        let err = PathError::IndexOutOfRange { index: 5, len: 2 };
        let msg = err.to_string();
        assert!(msg.contains('5') && msg.contains('2'));
    }

    #[test]
    fn validation_error_includes_path() {
        let err = ValidationError::new(ValidationErrorKind::MissingRequired)
            .at_field("b")
            .at_field("a");
        assert_eq!(err.to_string(), "missing required argument (a.b)");
    }

    #[test]
    fn validation_error_at_root_omits_path() {
        let err = ValidationError::new(ValidationErrorKind::MissingRequired);
        assert_eq!(err.to_string(), "missing required argument");
    }

    #[test]
    fn index_segments_render_bracketed() {
        let err = ValidationError::new(ValidationErrorKind::MissingRequired)
            .at_index(2)
            .at_field("servers");
        assert_eq!(err.to_string(), "missing required argument (servers[2])");
    }

    #[test]
    fn aggregate_missing_fields_lists_every_path() {
        let a: Path = ".a".parse().unwrap();
        let bc: Path = ".b.c".parse().unwrap();
        let err = ValidationError::new(ValidationErrorKind::MissingFields(vec![a, bc]));
        assert_eq!(err.to_string(), "missing required fields: a, b.c");
    }

    #[test]
    fn override_error_formats() {
        let err = OverrideError::BadToken { token: "port".into() };
        assert!(err.to_string().contains("--key value"));
    }
}
