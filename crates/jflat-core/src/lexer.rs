//! The statement lexer: scan one line of text into typed tokens.
//!
//! Two surface forms share the statement model and differ only here:
//!
//! - The human-readable form, `root(.bare | ["quoted"] | [N])* = <value>;`,
//!   is scanned left to right with no backtracking by [`lex`].
//! - The JSON token-array form, one JSON array of tagged token objects per
//!   line (e.g. `[{"bare":"json"},{"equals":"="},{"number":"1"},{"semi":";"}]`),
//!   is handled by [`lex_json`] as JSON parsing plus a tag-to-kind mapping.
//!
//! Quoted keys and string literals follow standard JSON string escaping,
//! including `\uXXXX` with surrogate pairs. Whitespace between tokens is
//! insignificant; whitespace inside quotes is not.
//!
//! The lexer is grammar-directed: it scans the path section, then a single
//! `=`-delimited value section, then the `;` terminator, so keyword-looking
//! identifiers like `true` stay [`TokenKind::Bare`] in path position and only
//! become value tokens after the `=`.

use crate::error::LexError;
use crate::statement::{Token, TokenKind, WireToken};

/// Scan one human-readable statement line into tokens.
pub fn lex(line: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(line).run()
}

/// Scan one JSON token-array line into tokens.
pub fn lex_json(line: &str) -> Result<Vec<Token>, LexError> {
    let wire: Vec<WireToken> =
        serde_json::from_str(line).map_err(|e| LexError::JsonForm(e.to_string()))?;
    Ok(wire.into_iter().map(Token::from).collect())
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn new(line: &str) -> Self {
        Lexer {
            chars: line.chars().collect(),
            pos: 0,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        // Root name
        self.skip_whitespace();
        tokens.push(Token::bare(&self.read_identifier()?));

        // Path segments until `=`
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('.') => {
                    self.bump();
                    tokens.push(Token::dot());
                    self.skip_whitespace();
                    tokens.push(Token::bare(&self.read_identifier()?));
                }
                Some('[') => {
                    let open_col = self.col();
                    self.bump();
                    tokens.push(Token::lbrace());
                    self.skip_whitespace();
                    match self.peek() {
                        Some('"') => tokens.push(Token::quoted_key(&self.read_quoted()?)),
                        Some(c) if c.is_ascii_digit() => {
                            tokens.push(Token::new(TokenKind::NumericKey, self.read_digits()));
                        }
                        Some(c) => {
                            return Err(LexError::UnexpectedChar { ch: c, col: self.col() })
                        }
                        None => return Err(LexError::UnclosedBracket { col: open_col }),
                    }
                    self.skip_whitespace();
                    if self.peek() != Some(']') {
                        return Err(LexError::UnclosedBracket { col: open_col });
                    }
                    self.bump();
                    tokens.push(Token::rbrace());
                }
                Some('=') => {
                    self.bump();
                    tokens.push(Token::equals());
                    break;
                }
                Some(c) => return Err(LexError::UnexpectedChar { ch: c, col: self.col() }),
                None => return Err(LexError::MissingTerminator),
            }
        }

        // Value section
        self.skip_whitespace();
        tokens.push(self.read_value()?);

        // Terminator
        self.skip_whitespace();
        if self.peek() != Some(';') {
            return Err(LexError::MissingTerminator);
        }
        self.bump();
        tokens.push(Token::semi());

        self.skip_whitespace();
        match self.peek() {
            Some(c) => Err(LexError::UnexpectedChar { ch: c, col: self.col() }),
            None => Ok(tokens),
        }
    }

    fn read_value(&mut self) -> Result<Token, LexError> {
        match self.peek() {
            None | Some(';') => Err(LexError::MissingValue),
            Some('"') => Ok(Token::string(&self.read_quoted()?)),
            Some('[') => {
                let col = self.col();
                self.bump();
                self.skip_whitespace();
                if self.peek() != Some(']') {
                    return Err(LexError::UnclosedBracket { col });
                }
                self.bump();
                Ok(Token::empty_array())
            }
            Some('{') => {
                let col = self.col();
                self.bump();
                self.skip_whitespace();
                if self.peek() != Some('}') {
                    return Err(LexError::UnclosedBracket { col });
                }
                self.bump();
                Ok(Token::empty_object())
            }
            Some(c) if c == '-' || c.is_ascii_digit() => Ok(Token::number(&self.read_number()?)),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let col = self.col();
                match self.read_identifier()?.as_str() {
                    "true" => Ok(Token::bool(true)),
                    "false" => Ok(Token::bool(false)),
                    "null" => Ok(Token::null()),
                    _ => Err(LexError::UnexpectedChar { ch: c, col }),
                }
            }
            Some(c) => Err(LexError::UnexpectedChar { ch: c, col: self.col() }),
        }
    }

    /// Read a bare identifier: `[A-Za-z_][A-Za-z0-9_]*`.
    fn read_identifier(&mut self) -> Result<String, LexError> {
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            Some(c) => return Err(LexError::UnexpectedChar { ch: c, col: self.col() }),
            None => return Err(LexError::UnexpectedEnd),
        }
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Ok(ident)
    }

    fn read_digits(&mut self) -> String {
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.bump();
            } else {
                break;
            }
        }
        digits
    }

    /// Read a quoted string, decoding JSON escapes to the raw text.
    fn read_quoted(&mut self) -> Result<String, LexError> {
        let start_col = self.col();
        self.bump(); // opening quote
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(LexError::UnterminatedString { col: start_col }),
                Some('"') => {
                    self.bump();
                    return Ok(out);
                }
                Some('\\') => {
                    let escape_col = self.col();
                    self.bump();
                    out.push(self.read_escape(escape_col, start_col)?);
                }
                Some(c) => {
                    out.push(c);
                    self.bump();
                }
            }
        }
    }

    fn read_escape(&mut self, escape_col: usize, string_col: usize) -> Result<char, LexError> {
        let c = match self.peek() {
            Some(c) => c,
            None => return Err(LexError::UnterminatedString { col: string_col }),
        };
        self.bump();
        match c {
            '"' => Ok('"'),
            '\\' => Ok('\\'),
            '/' => Ok('/'),
            'b' => Ok('\u{0008}'),
            'f' => Ok('\u{000c}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'u' => self.read_unicode_escape(escape_col),
            _ => Err(LexError::InvalidEscape { col: escape_col }),
        }
    }

    /// Read the `XXXX` of a `\uXXXX` escape, pairing UTF-16 surrogates.
    fn read_unicode_escape(&mut self, escape_col: usize) -> Result<char, LexError> {
        let unit = self.read_hex4(escape_col)?;
        let code = match unit {
            0xD800..=0xDBFF => {
                // High surrogate: a low surrogate escape must follow.
                if self.peek() != Some('\\') {
                    return Err(LexError::InvalidEscape { col: escape_col });
                }
                self.bump();
                if self.peek() != Some('u') {
                    return Err(LexError::InvalidEscape { col: escape_col });
                }
                self.bump();
                let low = self.read_hex4(escape_col)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(LexError::InvalidEscape { col: escape_col });
                }
                0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(LexError::InvalidEscape { col: escape_col }),
            other => other,
        };
        char::from_u32(code).ok_or(LexError::InvalidEscape { col: escape_col })
    }

    fn read_hex4(&mut self, escape_col: usize) -> Result<u32, LexError> {
        let mut value = 0u32;
        for _ in 0..4 {
            let digit = self
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or(LexError::InvalidEscape { col: escape_col })?;
            self.bump();
            value = value * 16 + digit;
        }
        Ok(value)
    }

    /// Read a number per JSON number syntax, keeping the literal text.
    fn read_number(&mut self) -> Result<String, LexError> {
        let mut text = String::new();
        if self.peek() == Some('-') {
            text.push('-');
            self.bump();
        }
        match self.peek() {
            Some('0') => {
                text.push('0');
                self.bump();
            }
            Some(c) if c.is_ascii_digit() => text.push_str(&self.read_digits()),
            Some(c) => return Err(LexError::UnexpectedChar { ch: c, col: self.col() }),
            None => return Err(LexError::UnexpectedEnd),
        }
        if self.peek() == Some('.') {
            text.push('.');
            self.bump();
            let frac = self.read_digits();
            if frac.is_empty() {
                return self.number_tail_error();
            }
            text.push_str(&frac);
        }
        if let Some(e) = self.peek() {
            if e == 'e' || e == 'E' {
                text.push(e);
                self.bump();
                if let Some(sign) = self.peek() {
                    if sign == '+' || sign == '-' {
                        text.push(sign);
                        self.bump();
                    }
                }
                let exp = self.read_digits();
                if exp.is_empty() {
                    return self.number_tail_error();
                }
                text.push_str(&exp);
            }
        }
        Ok(text)
    }

    fn number_tail_error(&self) -> Result<String, LexError> {
        match self.peek() {
            Some(c) => Err(LexError::UnexpectedChar { ch: c, col: self.col() }),
            None => Err(LexError::UnexpectedEnd),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    /// 1-based column of the next character, for diagnostics.
    fn col(&self) -> usize {
        self.pos + 1
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }
}
