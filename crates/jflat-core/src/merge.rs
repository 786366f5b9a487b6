//! The tree merger: fold an arbitrary collection of parsed statements back
//! into one JSON value.
//!
//! Statements are applied left to right in the caller's order (typically
//! input line order). Intermediate containers are created on demand, sparse
//! array indices are padded with `null`, and re-assignment of the same path
//! simply overwrites — last writer wins — so a grepped or hand-edited subset
//! of lines still merges. What does NOT merge is a shape contradiction: a
//! path position asserted as both scalar and container (or array and object)
//! aborts the whole merge with [`MergeError::TypeConflict`], since a
//! partially merged tree has no well-defined meaning. `null` placeholders
//! are the one exception — they may be promoted to either container kind.

use std::fmt::Write as _;

use serde_json::{Map, Number, Value};

use crate::error::MergeError;
use crate::statement::{key_must_be_quoted, Statement, Statements, Token, TokenKind};

/// Fold `statements` into a single value.
///
/// The result is the raw merged tree: every statement's root name appears as
/// a top-level object key. Use [`collapse_root`] afterwards to strip the
/// synthetic root label the walker adds.
pub fn merge(statements: &Statements) -> Result<Value, MergeError> {
    let mut root = Value::Object(Map::new());
    for statement in statements {
        apply(&mut root, statement)?;
    }
    Ok(root)
}

/// Top-level collapsing: if `value` is an object whose only key is
/// `root_name`, unwrap it. The forward direction prefixes every statement
/// with a constant root label purely for readability on the wire; the label
/// is not real document structure.
pub fn collapse_root(mut value: Value, root_name: &str) -> Value {
    let single = matches!(&value, Value::Object(map) if map.len() == 1 && map.contains_key(root_name));
    if single {
        if let Value::Object(map) = &mut value {
            if let Some(inner) = map.remove(root_name) {
                return inner;
            }
        }
    }
    value
}

/// One step of a statement's path: an object key or an array index.
enum Segment {
    Key(String),
    Index(usize),
}

fn apply(root: &mut Value, statement: &Statement) -> Result<(), MergeError> {
    let (segments, value) = decompose(statement)?;
    debug_assert!(!segments.is_empty(), "statements always carry a root segment");

    // `path` always names the container currently being entered, for
    // diagnostics; it trails one segment behind the cursor.
    let mut path = String::new();
    let mut current = root;
    for (i, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Key(key) => {
                let map = require_object(current, &path)?;
                push_key(&mut path, key, i == 0);
                current = map.entry(key.clone()).or_insert(Value::Null);
            }
            Segment::Index(index) => {
                let items = require_array(current, &path)?;
                // `usize::MAX` lexes as a numeric key but has no slot: the
                // required length `index + 1` is not representable.
                let needed = index.checked_add(1).ok_or_else(|| MergeError::InvalidIndex {
                    text: index.to_string(),
                })?;
                if items.len() < needed {
                    items.resize(needed, Value::Null);
                }
                let _ = write!(path, "[{index}]");
                current = &mut items[*index];
            }
        }
    }

    // A bare path reference has no value; it only ensures the path exists.
    if let Some(value) = value {
        *current = value;
    }
    Ok(())
}

/// Split a statement into its path segments and (optional) decoded value,
/// dropping the punctuation tokens.
fn decompose(statement: &Statement) -> Result<(Vec<Segment>, Option<Value>), MergeError> {
    let mut segments = Vec::new();
    let mut value = None;
    for token in statement.tokens() {
        match token.kind {
            TokenKind::Bare | TokenKind::QuotedKey => {
                segments.push(Segment::Key(token.text.clone()));
            }
            TokenKind::NumericKey => {
                let index = token
                    .text
                    .parse::<usize>()
                    .map_err(|_| MergeError::InvalidIndex {
                        text: token.text.clone(),
                    })?;
                segments.push(Segment::Index(index));
            }
            TokenKind::Dot
            | TokenKind::LBrace
            | TokenKind::RBrace
            | TokenKind::Equals
            | TokenKind::Semi => {}
            TokenKind::EmptyArray
            | TokenKind::EmptyObject
            | TokenKind::String
            | TokenKind::Number
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => value = Some(decode_value(token)?),
        }
    }
    Ok((segments, value))
}

fn decode_value(token: &Token) -> Result<Value, MergeError> {
    match token.kind {
        TokenKind::EmptyArray => Ok(Value::Array(Vec::new())),
        TokenKind::EmptyObject => Ok(Value::Object(Map::new())),
        TokenKind::String => Ok(Value::String(token.text.clone())),
        TokenKind::Number => serde_json::from_str::<Number>(&token.text)
            .map(Value::Number)
            .map_err(|_| MergeError::InvalidLiteral {
                text: token.text.clone(),
            }),
        TokenKind::True => Ok(Value::Bool(true)),
        TokenKind::False => Ok(Value::Bool(false)),
        TokenKind::Null => Ok(Value::Null),
        _ => unreachable!("decode_value only sees value tokens"),
    }
}

/// Borrow `node` as an object, promoting a `null` placeholder in place.
fn require_object<'a>(
    node: &'a mut Value,
    path: &str,
) -> Result<&'a mut Map<String, Value>, MergeError> {
    if node.is_null() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => Ok(map),
        other => Err(MergeError::TypeConflict {
            path: path.to_string(),
            wanted: "an object",
            found: type_name(other),
        }),
    }
}

/// Borrow `node` as an array, promoting a `null` placeholder in place.
fn require_array<'a>(node: &'a mut Value, path: &str) -> Result<&'a mut Vec<Value>, MergeError> {
    if node.is_null() {
        *node = Value::Array(Vec::new());
    }
    match node {
        Value::Array(items) => Ok(items),
        other => Err(MergeError::TypeConflict {
            path: path.to_string(),
            wanted: "an array",
            found: type_name(other),
        }),
    }
}

fn push_key(path: &mut String, key: &str, is_root: bool) {
    if is_root {
        path.push_str(key);
    } else if key_must_be_quoted(key) {
        let quoted = serde_json::to_string(key).unwrap_or_else(|_| format!("\"{key}\""));
        let _ = write!(path, "[{quoted}]");
    } else {
        path.push('.');
        path.push_str(key);
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
