//! The statement parser: validate a token sequence against the statement
//! grammar and package it as a [`Statement`].
//!
//! Lexing already constrains the human-readable form, but the JSON
//! token-array form can carry any token sequence, so the parser re-checks
//! shape for both: one leading `Bare` root, correctly alternating path
//! segments, at most one `=` followed by exactly one value token and `;`.
//! A sequence with no `=` at all is accepted as a bare path reference.

use crate::error::ParseError;
use crate::statement::{Statement, Token, TokenKind};

/// Validate `tokens` and build the statement.
pub fn parse(tokens: Vec<Token>) -> Result<Statement, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyPath);
    }
    expect(&tokens, 0, TokenKind::Bare)?;

    let mut pos = 1;
    while pos < tokens.len() {
        match tokens[pos].kind {
            TokenKind::Dot => {
                expect(&tokens, pos + 1, TokenKind::Bare)?;
                pos += 2;
            }
            TokenKind::LBrace => {
                match kind_at(&tokens, pos + 1) {
                    Some(TokenKind::NumericKey) | Some(TokenKind::QuotedKey) => {}
                    _ => return unexpected(&tokens, pos + 1),
                }
                expect(&tokens, pos + 2, TokenKind::RBrace)?;
                pos += 3;
            }
            TokenKind::Equals => {
                return finish_assignment(tokens, pos);
            }
            _ => return unexpected(&tokens, pos),
        }
    }

    // No `=`: a bare path reference.
    Ok(Statement::from_tokens(tokens))
}

/// Check the ` = <value>;` tail beginning at the `Equals` token.
fn finish_assignment(tokens: Vec<Token>, equals_pos: usize) -> Result<Statement, ParseError> {
    let value_pos = equals_pos + 1;
    match tokens.get(value_pos) {
        Some(token) if token.is_value() => {}
        Some(_) => return unexpected(&tokens, value_pos),
        None => return Err(ParseError::MissingTerminator),
    }
    match kind_at(&tokens, value_pos + 1) {
        Some(TokenKind::Semi) => {}
        Some(_) => return unexpected(&tokens, value_pos + 1),
        None => return Err(ParseError::MissingTerminator),
    }
    if tokens.len() > value_pos + 2 {
        return unexpected(&tokens, value_pos + 2);
    }
    Ok(Statement::from_tokens(tokens))
}

fn kind_at(tokens: &[Token], pos: usize) -> Option<TokenKind> {
    tokens.get(pos).map(|t| t.kind)
}

fn expect(tokens: &[Token], pos: usize, want: TokenKind) -> Result<(), ParseError> {
    match kind_at(tokens, pos) {
        Some(kind) if kind == want => Ok(()),
        Some(_) => unexpected(tokens, pos),
        None => Err(ParseError::MissingTerminator),
    }
}

fn unexpected<T>(tokens: &[Token], pos: usize) -> Result<T, ParseError> {
    // Report the offending token, or the last one if the sequence ran out.
    let pos = pos.min(tokens.len().saturating_sub(1));
    Err(ParseError::UnexpectedToken {
        pos,
        kind: tokens[pos].kind,
    })
}
