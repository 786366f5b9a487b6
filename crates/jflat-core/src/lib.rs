//! # jflat-core
//!
//! A reversible, line-oriented textual encoding of JSON: the forward
//! direction flattens a JSON value into discrete `path = value;` assignment
//! statements (greppable, one fact per line), and the reverse direction
//! merges such statements — possibly filtered, reordered, or hand-edited —
//! back into a single JSON value.
//!
//! ## Quick start
//!
//! ```rust
//! use jflat_core::{flatten, unflatten};
//!
//! let flat = flatten(r#"{"name":"Ada","scores":[95,87]}"#).unwrap();
//! assert_eq!(
//!     flat,
//!     "json = {};\n\
//!      json.name = \"Ada\";\n\
//!      json.scores = [];\n\
//!      json.scores[0] = 95;\n\
//!      json.scores[1] = 87;\n"
//! );
//!
//! // Any subset of the lines merges back; the full set round-trips.
//! let back = unflatten(&flat).unwrap();
//! let value: serde_json::Value = serde_json::from_str(&back).unwrap();
//! assert_eq!(value, serde_json::json!({"name":"Ada","scores":[95,87]}));
//! ```
//!
//! ## Modules
//!
//! - [`statement`] — typed tokens, statements, ordered statement collections
//! - [`walker`] — JSON value → statements (depth-first pre-order)
//! - [`lexer`] — statement text (or JSON token-array form) → tokens
//! - [`parser`] — tokens → validated statement
//! - [`merge`] — statements → one merged JSON value
//! - [`error`] — per-stage error types
//!
//! The core is pure: no I/O, no shared state, no suspension points.
//! Flag parsing, file/URL input, streaming line scanning, and ANSI color
//! live in the `jflat-cli` crate.

pub mod error;
pub mod lexer;
pub mod merge;
pub mod parser;
pub mod statement;
pub mod walker;

pub use error::{JflatError, LexError, MergeError, ParseError, Result, WalkError};
pub use lexer::{lex, lex_json};
pub use merge::{collapse_root, merge};
pub use parser::parse;
pub use statement::{key_must_be_quoted, Statement, Statements, Token, TokenKind};
pub use walker::{walk, walk_with_prefix};

use serde_json::Value;

/// The conventional root label the forward direction prefixes every
/// statement with, and the reverse direction collapses away.
pub const ROOT: &str = "json";

/// Flatten a JSON document into sorted statement text, one per line.
pub fn flatten(json: &str) -> Result<String> {
    let value: Value = serde_json::from_str(json)?;
    let mut statements = walker::walk(ROOT, &value);
    statements.sort();
    Ok(statements.to_string())
}

/// Like [`flatten`], but each line is the statement's JSON token-array form.
pub fn flatten_json_form(json: &str) -> Result<String> {
    let value: Value = serde_json::from_str(json)?;
    let mut statements = walker::walk(ROOT, &value);
    statements.sort();
    let mut out = String::new();
    for statement in &statements {
        out.push_str(&statement.to_json_form()?);
        out.push('\n');
    }
    Ok(out)
}

/// Merge statement text (one statement per line, blank lines ignored) back
/// into pretty-printed JSON, collapsing the [`ROOT`] label.
pub fn unflatten(input: &str) -> Result<String> {
    unflatten_lines(input, lexer::lex)
}

/// Like [`unflatten`], for input in the JSON token-array form.
pub fn unflatten_json_form(input: &str) -> Result<String> {
    unflatten_lines(input, lexer::lex_json)
}

fn unflatten_lines(
    input: &str,
    lex_line: fn(&str) -> std::result::Result<Vec<Token>, LexError>,
) -> Result<String> {
    let mut statements = Statements::new();
    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        statements.add(parser::parse(lex_line(line)?)?);
    }
    let merged = merge::merge(&statements)?;
    let value = merge::collapse_root(merged, ROOT);
    Ok(serde_json::to_string_pretty(&value)?)
}
