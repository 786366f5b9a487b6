//! Error types for the flatten/unflatten pipeline.
//!
//! Each pipeline stage has its own error enum so that callers (the CLI in
//! particular) can map failures to distinct exit codes. [`JflatError`] is the
//! umbrella type returned by the crate-level convenience functions.

use crate::statement::TokenKind;
use thiserror::Error;

/// Errors from scanning one line of statement text into tokens.
///
/// Columns are 1-based character positions within the offending line.
#[derive(Error, Debug, PartialEq)]
pub enum LexError {
    /// A character that cannot start or continue any token at this position.
    #[error("unexpected character {ch:?} at column {col}")]
    UnexpectedChar { ch: char, col: usize },

    /// A quoted key or string literal with no closing `"`.
    #[error("unterminated string starting at column {col}")]
    UnterminatedString { col: usize },

    /// A backslash escape that is not part of JSON string syntax.
    #[error("invalid escape sequence at column {col}")]
    InvalidEscape { col: usize },

    /// A `[` path segment with no matching `]`.
    #[error("unclosed bracket at column {col}")]
    UnclosedBracket { col: usize },

    /// The line ended in the middle of a token.
    #[error("unexpected end of statement")]
    UnexpectedEnd,

    /// The `=` was present but no value literal followed it.
    #[error("missing value after '='")]
    MissingValue,

    /// The statement did not end with `;`.
    #[error("missing ';' terminator")]
    MissingTerminator,

    /// The JSON token-array form did not parse as a token array.
    #[error("invalid JSON token form: {0}")]
    JsonForm(String),
}

/// Errors from validating a token sequence against the statement grammar.
#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    /// The token sequence was empty.
    #[error("empty statement")]
    EmptyPath,

    /// A token of the wrong kind at the given 0-based position.
    #[error("unexpected {kind:?} token at position {pos}")]
    UnexpectedToken { pos: usize, kind: TokenKind },

    /// The value literal was not followed by `;`.
    #[error("missing ';' terminator")]
    MissingTerminator,
}

/// Errors from folding statements into a single JSON value.
#[derive(Error, Debug, PartialEq)]
pub enum MergeError {
    /// A path position is asserted as two incompatible shapes, e.g. a scalar
    /// later addressed as an array. The merge aborts: a partially merged tree
    /// has no well-defined meaning.
    #[error("statement addresses {path} as {wanted} but it is already {found}")]
    TypeConflict {
        path: String,
        wanted: &'static str,
        found: &'static str,
    },

    /// A numeric-key token whose text is not a representable array index.
    /// Unreachable through the lexer for sane indices, but the JSON token
    /// form can carry arbitrary text under a `numeric_key` tag.
    #[error("{text:?} is not a valid array index")]
    InvalidIndex { text: String },

    /// A number token whose text is not a JSON number literal. As with
    /// [`MergeError::InvalidIndex`], only reachable via the JSON token form.
    #[error("{text:?} is not a valid JSON number")]
    InvalidLiteral { text: String },
}

/// Errors from walking a value into statements.
///
/// Reserved: `serde_json::Number` cannot represent NaN or Infinity, so the
/// walker is infallible for any value produced by a standard JSON parse. The
/// variant keeps the failure taxonomy complete for callers embedding numeric
/// types that are not JSON-representable.
#[derive(Error, Debug, PartialEq)]
pub enum WalkError {
    #[error("number {0} cannot be represented in JSON")]
    NonFiniteNumber(f64),
}

/// Any failure from the crate-level flatten/unflatten entry points.
#[derive(Error, Debug)]
pub enum JflatError {
    /// The input was not valid JSON (flatten path), or the merged value could
    /// not be re-encoded (unflatten path).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("merge error: {0}")]
    Merge(#[from] MergeError),

    #[error("walk error: {0}")]
    Walk(#[from] WalkError),
}

/// Convenience alias used throughout jflat-core.
pub type Result<T> = std::result::Result<T, JflatError>;
