//! Convert `--key value` / `--key=value` override tokens into a sparse
//! value tree ready for [`merge`](crate::merge::merge).
//!
//! Each key is a path expression without the leading dot (`database.url`,
//! `servers[0].host`, `items[-1]`); each value token is parsed as a JSON
//! literal, falling back to a plain string (`--port 3000` is an integer,
//! `--host web1` a string, `--tags '["a","b"]'` a list). Keys are applied
//! with `set(..., build = true)` onto an initially empty mapping, so the
//! result is sparse: unset positions stay absent (or `Missing` inside
//! list padding) and fall through to the base layer at merge time.
//!
//! No argv access happens here — callers pass the tokens, which keeps the
//! conversion pure and testable with synthetic data.

use crate::error::OverrideError;
use crate::path::{self, Path};
use crate::value::{Map, Value};

/// Build a value tree from override tokens. Later tokens win over earlier
/// ones targeting the same path.
pub fn overrides_to_value<S: AsRef<str>>(tokens: &[S]) -> Result<Value, OverrideError> {
    let mut result = Value::Map(Map::new());
    let mut rest = tokens;
    while let Some((key, value, remaining)) = next_pair(rest)? {
        let at: Path = format!(".{key}").parse().map_err(OverrideError::Path)?;
        result = path::set(result, &at, parse_literal(&value), true)?;
        rest = remaining;
    }
    Ok(result)
}

/// Pop the next key-value pair off the token list.
#[allow(clippy::type_complexity)]
fn next_pair<S: AsRef<str>>(tokens: &[S]) -> Result<Option<(String, String, &[S])>, OverrideError> {
    let Some((first, rest)) = tokens.split_first() else {
        return Ok(None);
    };
    let first = first.as_ref();
    let Some(key) = first.strip_prefix("--") else {
        return Err(OverrideError::BadToken {
            token: first.to_string(),
        });
    };

    if let Some((key, value)) = key.split_once('=') {
        Ok(Some((key.to_string(), value.to_string(), rest)))
    } else {
        let Some((value, remaining)) = rest.split_first() else {
            return Err(OverrideError::MissingValue {
                key: key.to_string(),
            });
        };
        Ok(Some((
            key.to_string(),
            value.as_ref().to_string(),
            remaining,
        )))
    }
}

/// Parse a value token as a JSON literal; anything unparseable is a string.
fn parse_literal(token: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(token) {
        Ok(json) => Value::from(json),
        Err(_) => Value::Str(token.to_string()),
    }
}
