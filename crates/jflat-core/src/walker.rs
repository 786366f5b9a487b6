//! The value walker: turn a parsed JSON value into the full ordered set of
//! assignment statements describing it.
//!
//! Depth-first pre-order: every container emits its own `= {};` / `= [];`
//! statement before its children, so the container's existence survives even
//! if every child line is later grepped away. Traversal order follows the
//! value's native order (`preserve_order` keeps object keys in document
//! order), which makes a single unsorted run deterministic; byte-identical
//! output across runs is the sorter's job.

use serde_json::Value;

use crate::statement::{Statement, Statements, Token};

/// Produce the statements for `value`, rooted at the bare identifier
/// `root_name` (conventionally [`crate::ROOT`]).
///
/// Pure and infallible: every value a standard JSON parse can produce walks
/// cleanly (`serde_json::Number` cannot hold NaN or Infinity).
pub fn walk(root_name: &str, value: &Value) -> Statements {
    walk_with_prefix(&Statement::root(root_name), value)
}

/// Like [`walk`], but under a caller-supplied path prefix.
///
/// Streaming mode uses this to file line `i`'s document under `json[i]`:
///
/// ```
/// use jflat_core::{walk_with_prefix, Statement};
///
/// let prefix = Statement::root("json").with_index(2);
/// let ss = walk_with_prefix(&prefix, &serde_json::json!({"ok": true}));
/// assert!(ss.contains("json[2] = {};"));
/// assert!(ss.contains("json[2].ok = true;"));
/// ```
pub fn walk_with_prefix(prefix: &Statement, value: &Value) -> Statements {
    debug_assert!(prefix.is_path(), "walk prefix must be a bare path");
    let mut out = Statements::new();
    walk_value(prefix, value, &mut out);
    out
}

fn walk_value(prefix: &Statement, value: &Value, out: &mut Statements) {
    match value {
        Value::Object(map) => {
            out.add(prefix.with_value(Token::empty_object()));
            for (key, child) in map {
                walk_value(&prefix.with_key(key), child, out);
            }
        }
        Value::Array(items) => {
            out.add(prefix.with_value(Token::empty_array()));
            for (index, child) in items.iter().enumerate() {
                walk_value(&prefix.with_index(index), child, out);
            }
        }
        leaf => out.add(prefix.with_value(leaf_token(leaf))),
    }
}

/// The value token for a leaf. Numbers keep `serde_json`'s rendering of the
/// original literal, so `1` and `1.0` stay distinct through a round trip.
fn leaf_token(value: &Value) -> Token {
    match value {
        Value::Null => Token::null(),
        Value::Bool(b) => Token::bool(*b),
        Value::Number(n) => Token::number(&n.to_string()),
        Value::String(s) => Token::string(s),
        Value::Array(_) | Value::Object(_) => unreachable!("containers handled in walk_value"),
    }
}
