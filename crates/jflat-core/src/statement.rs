//! The statement data model: typed tokens, statements, and ordered
//! statement collections.
//!
//! A statement is one path-to-value fact in token form, e.g. the token
//! sequence rendering as `json.users[0].name = "Ada";`. The same model backs
//! both textual surface forms: the human-readable line above and the JSON
//! token-array form (`[{"bare":"json"},{"dot":"."},...]`) used for machine
//! round-tripping.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The closed set of token kinds. Every consumer (lexer, parser, merger,
/// renderer) matches exhaustively so that adding a kind forces each site to
/// be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier usable as a root name or dotted field name.
    Bare,
    /// A string literal used as an object key inside brackets.
    QuotedKey,
    /// A non-negative integer used as an array index inside brackets.
    NumericKey,
    LBrace,
    RBrace,
    Dot,
    Equals,
    Semi,
    /// The `[]` literal marking an (initially) empty array.
    EmptyArray,
    /// The `{}` literal marking an (initially) empty object.
    EmptyObject,
    String,
    Number,
    True,
    False,
    Null,
}

/// One typed token. `text` is the semantic payload, not the rendered form:
/// `QuotedKey` and `String` hold the raw (unescaped) text and are re-escaped
/// on render, `Number` holds the original literal (preserving `1` vs `1.0`),
/// punctuation holds its canonical character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            text: text.into(),
            kind,
        }
    }

    pub fn bare(name: &str) -> Self {
        Token::new(TokenKind::Bare, name)
    }

    pub fn quoted_key(key: &str) -> Self {
        Token::new(TokenKind::QuotedKey, key)
    }

    pub fn numeric_key(index: usize) -> Self {
        Token::new(TokenKind::NumericKey, index.to_string())
    }

    pub fn string(text: &str) -> Self {
        Token::new(TokenKind::String, text)
    }

    /// A number token carrying the literal's original textual form.
    pub fn number(literal: &str) -> Self {
        Token::new(TokenKind::Number, literal)
    }

    pub fn bool(value: bool) -> Self {
        if value {
            Token::new(TokenKind::True, "true")
        } else {
            Token::new(TokenKind::False, "false")
        }
    }

    pub fn null() -> Self {
        Token::new(TokenKind::Null, "null")
    }

    pub fn empty_array() -> Self {
        Token::new(TokenKind::EmptyArray, "[]")
    }

    pub fn empty_object() -> Self {
        Token::new(TokenKind::EmptyObject, "{}")
    }

    pub(crate) fn dot() -> Self {
        Token::new(TokenKind::Dot, ".")
    }

    pub(crate) fn lbrace() -> Self {
        Token::new(TokenKind::LBrace, "[")
    }

    pub(crate) fn rbrace() -> Self {
        Token::new(TokenKind::RBrace, "]")
    }

    pub(crate) fn equals() -> Self {
        Token::new(TokenKind::Equals, "=")
    }

    pub(crate) fn semi() -> Self {
        Token::new(TokenKind::Semi, ";")
    }

    /// True for the kinds that may appear after `=` in a statement.
    pub fn is_value(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::EmptyArray
                | TokenKind::EmptyObject
                | TokenKind::String
                | TokenKind::Number
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::QuotedKey | TokenKind::String => {
                let quoted = serde_json::to_string(self.text.as_str()).map_err(|_| fmt::Error)?;
                f.write_str(&quoted)
            }
            TokenKind::Equals => f.write_str(" = "),
            _ => f.write_str(&self.text),
        }
    }
}

/// Decide whether an object key needs `["quoted"]` bracket syntax.
///
/// A key is a valid bare path segment iff it is non-empty, starts with an
/// ASCII letter or underscore, and continues with ASCII letters, digits, or
/// underscores. Everything else (empty, leading digit, punctuation,
/// whitespace, non-ASCII) must be quoted.
pub fn key_must_be_quoted(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return true,
    }
    chars.any(|c| !(c.is_ascii_alphanumeric() || c == '_'))
}

/// One path-to-value fact as an ordered, non-empty token sequence.
///
/// Statements are built outward from [`Statement::root`]: path segments are
/// appended with [`with_key`](Statement::with_key) /
/// [`with_index`](Statement::with_index), and the assignment tail with
/// [`with_value`](Statement::with_value). A statement without the tail is a
/// bare path reference, used only as a walk prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    tokens: Vec<Token>,
}

impl Statement {
    /// A statement holding just the root name, e.g. `json`.
    pub fn root(name: &str) -> Self {
        debug_assert!(!key_must_be_quoted(name), "root name must be a bare identifier");
        Statement {
            tokens: vec![Token::bare(name)],
        }
    }

    pub(crate) fn from_tokens(tokens: Vec<Token>) -> Self {
        debug_assert!(!tokens.is_empty(), "statements are never empty");
        Statement { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Extend the path with an object key: `.key` if the key is a valid bare
    /// identifier, `["key"]` otherwise.
    pub fn with_key(&self, key: &str) -> Statement {
        debug_assert!(self.is_path(), "cannot extend a completed statement");
        let mut next = self.clone();
        if key_must_be_quoted(key) {
            next.tokens.push(Token::lbrace());
            next.tokens.push(Token::quoted_key(key));
            next.tokens.push(Token::rbrace());
        } else {
            next.tokens.push(Token::dot());
            next.tokens.push(Token::bare(key));
        }
        next
    }

    /// Extend the path with an array index: `[i]`.
    pub fn with_index(&self, index: usize) -> Statement {
        debug_assert!(self.is_path(), "cannot extend a completed statement");
        let mut next = self.clone();
        next.tokens.push(Token::lbrace());
        next.tokens.push(Token::numeric_key(index));
        next.tokens.push(Token::rbrace());
        next
    }

    /// Complete the statement with ` = <value>;`.
    pub fn with_value(&self, value: Token) -> Statement {
        debug_assert!(self.is_path(), "statements carry exactly one assignment");
        debug_assert!(value.is_value(), "assignment needs a value token");
        let mut next = self.clone();
        next.tokens.push(Token::equals());
        next.tokens.push(value);
        next.tokens.push(Token::semi());
        next
    }

    /// True when the statement is a bare path reference (no `=` yet).
    pub fn is_path(&self) -> bool {
        self.tokens.iter().all(|t| t.kind != TokenKind::Equals)
    }

    /// Render as one JSON array of tagged token objects, e.g.
    /// `[{"bare":"json"},{"equals":"="},{"empty_object":"{}"},{"semi":";"}]`.
    pub fn to_json_form(&self) -> Result<String> {
        let wire: Vec<WireToken> = self.tokens.iter().map(WireToken::from).collect();
        Ok(serde_json::to_string(&wire)?)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            token.fmt(f)?;
        }
        Ok(())
    }
}

/// An ordered collection of statements with O(1) append. Duplicates are
/// permitted; the merger resolves them last-writer-wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statements(Vec<Statement>);

impl Statements {
    pub fn new() -> Self {
        Statements(Vec::new())
    }

    pub fn add(&mut self, statement: Statement) {
        self.0.push(statement);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.0.iter()
    }

    /// Stable sort by rendered text form. Object key iteration order in the
    /// source value is not a semantic the grammar encodes, so sorting is what
    /// makes repeated runs on the same input byte-identical.
    pub fn sort(&mut self) {
        self.0.sort_by_cached_key(|s| s.to_string());
    }

    /// True if any statement renders exactly as `text`. Test helper.
    pub fn contains(&self, text: &str) -> bool {
        self.0.iter().any(|s| s.to_string() == text)
    }
}

impl IntoIterator for Statements {
    type Item = Statement;
    type IntoIter = std::vec::IntoIter<Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Statements {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Statement> for Statements {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        Statements(iter.into_iter().collect())
    }
}

impl Extend<Statement> for Statements {
    fn extend<I: IntoIterator<Item = Statement>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl fmt::Display for Statements {
    /// One statement per line, each line terminated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.0 {
            writeln!(f, "{statement}")?;
        }
        Ok(())
    }
}

/// Wire representation of one token in the JSON token-array form: an
/// externally tagged object whose tag names the kind and whose payload is the
/// token text. Punctuation payloads are accepted but normalized back to the
/// canonical character on the way in.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum WireToken {
    Bare(String),
    QuotedKey(String),
    NumericKey(String),
    #[serde(rename = "lbrace")]
    LBrace(String),
    #[serde(rename = "rbrace")]
    RBrace(String),
    Dot(String),
    Equals(String),
    Semi(String),
    EmptyArray(String),
    EmptyObject(String),
    String(String),
    Number(String),
    True(String),
    False(String),
    Null(String),
}

impl From<&Token> for WireToken {
    fn from(token: &Token) -> Self {
        let text = token.text.clone();
        match token.kind {
            TokenKind::Bare => WireToken::Bare(text),
            TokenKind::QuotedKey => WireToken::QuotedKey(text),
            TokenKind::NumericKey => WireToken::NumericKey(text),
            TokenKind::LBrace => WireToken::LBrace(text),
            TokenKind::RBrace => WireToken::RBrace(text),
            TokenKind::Dot => WireToken::Dot(text),
            TokenKind::Equals => WireToken::Equals(text),
            TokenKind::Semi => WireToken::Semi(text),
            TokenKind::EmptyArray => WireToken::EmptyArray(text),
            TokenKind::EmptyObject => WireToken::EmptyObject(text),
            TokenKind::String => WireToken::String(text),
            TokenKind::Number => WireToken::Number(text),
            TokenKind::True => WireToken::True(text),
            TokenKind::False => WireToken::False(text),
            TokenKind::Null => WireToken::Null(text),
        }
    }
}

impl From<WireToken> for Token {
    fn from(wire: WireToken) -> Self {
        match wire {
            WireToken::Bare(text) => Token::new(TokenKind::Bare, text),
            WireToken::QuotedKey(text) => Token::new(TokenKind::QuotedKey, text),
            WireToken::NumericKey(text) => Token::new(TokenKind::NumericKey, text),
            WireToken::LBrace(_) => Token::lbrace(),
            WireToken::RBrace(_) => Token::rbrace(),
            WireToken::Dot(_) => Token::dot(),
            WireToken::Equals(_) => Token::equals(),
            WireToken::Semi(_) => Token::semi(),
            WireToken::EmptyArray(_) => Token::empty_array(),
            WireToken::EmptyObject(_) => Token::empty_object(),
            WireToken::String(text) => Token::new(TokenKind::String, text),
            WireToken::Number(text) => Token::new(TokenKind::Number, text),
            WireToken::True(_) => Token::bool(true),
            WireToken::False(_) => Token::bool(false),
            WireToken::Null(_) => Token::null(),
        }
    }
}
