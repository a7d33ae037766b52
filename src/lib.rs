//! Nested-value configuration kernel: path addressing, overlay merge, and
//! schema validation over a generic value tree.
//!
//! Specfig separates the *shape* a program expects its configuration to
//! have (a [`Schema`]) from the *values* actually supplied (a [`Value`]),
//! merges values from multiple sources with defined precedence, and
//! validates the merged result — producing either a fully-coerced
//! configuration tree or an error naming the exact path that failed.
//!
//! ```
//! use specfig::{merge, overrides_to_value, validate, Coerce, Schema, Value};
//!
//! let schema = Schema::map([
//!     ("host", Schema::optional(Coerce::Str, "localhost")),
//!     ("port", Schema::required(Coerce::Int)),
//! ]);
//!
//! // A file adapter produced the base layer...
//! let file: Value = serde_json::json!({ "host": "web1", "port": 3000 }).into();
//! // ...and override tokens produce a sparse layer on top.
//! let cli = overrides_to_value(&["--port", "9999"]).unwrap();
//!
//! let config = validate(&schema, merge(cli, file)).unwrap();
//! assert_eq!(config.to_json(), serde_json::json!({ "host": "web1", "port": 9999 }));
//! ```
//!
//! # The value model
//!
//! A [`Value`] is an untyped tree: scalars, variable-length sequences,
//! fixed-arity tuples, and string-keyed mappings, plus a `Missing`
//! sentinel marking "no value supplied here". `Missing` is what makes
//! layering work — an override layer only states the positions it wants
//! to change, and everything else defers to the layer below. It never
//! survives into a validated result: validation either rejects it
//! (required) or replaces it (optional defaults).
//!
//! # Layering
//!
//! Every layer is **sparse**. [`merge`] overlays an authoritative tree
//! over a base tree: authoritative positions win, `Missing` positions
//! fall through, mappings union and recurse, and lists merge element-wise
//! after `Missing`-padding the shorter side — so `--servers[1].port 9090`
//! can override one field of one list element without restating the rest.
//! Chain calls right-to-left for more than two layers:
//! `merge(cli, merge(env, file))`.
//!
//! # Paths
//!
//! [`Path`] expressions address positions in a tree: `.field` components
//! and `[index]` components, with negative indices counted from the end
//! at the moment of application. [`set`] with `build = true` grows absent
//! intermediate containers, which is how [`overrides_to_value`] turns
//! flat `--key value` tokens into a nested sparse tree.
//!
//! # Validation
//!
//! [`validate`] walks schema and value together: coercing leaf values
//! ([`Coerce`]), substituting optional defaults (which are themselves
//! coerced and validated, never injected raw), dropping mapping keys the
//! schema doesn't name, padding short tuples, and rejecting long ones.
//! Before the structural walk, every required leaf is checked up front so
//! a config missing five fields reports all five in one error. Errors
//! carry the full path from the validation root to the failing node:
//! `failed to coerce string value '"x"' to integer (servers[1].port)`.
//!
//! # What this crate does not do
//!
//! No I/O, no global state, no file formats. Adapters parse YAML/JSON/
//! whatever into a `serde_json::Value` and convert it with
//! `Value::from`; environment variables arrive as plain scalar values;
//! where the "current configuration" lives is the caller's business.

pub mod error;
pub mod keys;
pub mod merge;
pub mod overrides;
pub mod path;
pub mod schema;
pub mod validate;
pub mod value;

#[cfg(test)]
mod fixtures;

pub use error::{OverrideError, PathError, ValidationError, ValidationErrorKind};
pub use merge::merge;
pub use overrides::overrides_to_value;
pub use path::{get, get_or_insert, set, Path, Segment};
pub use schema::{one_of, Coerce, Schema};
pub use validate::validate;
pub use value::{Map, Value};
