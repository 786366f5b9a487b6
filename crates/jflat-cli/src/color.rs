//! ANSI colorization for statement lines and pretty-printed JSON.
//!
//! Uses a conservative 8/16-color palette for broad terminal compatibility.
//! When color is disabled, [`colorize_statement`] equals the statement's
//! `Display` form and [`colorize_json`] equals `serde_json::to_string_pretty`.

use jflat_core::{Statement, TokenKind};
use serde_json::Value;

const INDENT: &str = "  ";

const COLOR_BARE: &str = "34;1";
const COLOR_STRING: &str = "33";
const COLOR_BRACE: &str = "35";
const COLOR_NUMBER: &str = "31";
const COLOR_KEYWORD: &str = "36";

/// Render one statement, wrapping each token in its color.
pub fn colorize_statement(statement: &Statement, use_color: bool) -> String {
    let mut out = String::new();
    for token in statement.tokens() {
        match token_color(token.kind) {
            Some(color) if use_color => push_colored(&token.to_string(), color, &mut out),
            _ => out.push_str(&token.to_string()),
        }
    }
    out
}

/// Punctuation stays uncolored; everything else gets the palette entry for
/// its kind.
fn token_color(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Bare => Some(COLOR_BARE),
        TokenKind::QuotedKey | TokenKind::String => Some(COLOR_STRING),
        TokenKind::LBrace
        | TokenKind::RBrace
        | TokenKind::EmptyArray
        | TokenKind::EmptyObject => Some(COLOR_BRACE),
        TokenKind::NumericKey | TokenKind::Number => Some(COLOR_NUMBER),
        TokenKind::True | TokenKind::False | TokenKind::Null => Some(COLOR_KEYWORD),
        TokenKind::Dot | TokenKind::Equals | TokenKind::Semi => None,
    }
}

/// Render a JSON value pretty-printed with two-space indentation, colored
/// with the same palette as the statement form.
pub fn colorize_json(value: &Value, use_color: bool) -> String {
    let mut out = String::new();
    write_value(value, 0, use_color, &mut out);
    out
}

fn write_value(value: &Value, indent: usize, use_color: bool, out: &mut String) {
    match value {
        Value::Null => push(out, "null", COLOR_KEYWORD, use_color),
        Value::Bool(val) => {
            let text = if *val { "true" } else { "false" };
            push(out, text, COLOR_KEYWORD, use_color);
        }
        Value::Number(num) => push(out, &num.to_string(), COLOR_NUMBER, use_color),
        Value::String(text) => {
            let encoded = serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string());
            push(out, &encoded, COLOR_STRING, use_color);
        }
        Value::Array(items) => write_array(items, indent, use_color, out),
        Value::Object(map) => write_object(map, indent, use_color, out),
    }
}

fn write_array(items: &[Value], indent: usize, use_color: bool, out: &mut String) {
    if items.is_empty() {
        push(out, "[]", COLOR_BRACE, use_color);
        return;
    }
    push(out, "[", COLOR_BRACE, use_color);
    out.push('\n');
    for (idx, item) in items.iter().enumerate() {
        push_indent(indent + 1, out);
        write_value(item, indent + 1, use_color, out);
        if idx + 1 < items.len() {
            out.push(',');
        }
        out.push('\n');
    }
    push_indent(indent, out);
    push(out, "]", COLOR_BRACE, use_color);
}

fn write_object(
    map: &serde_json::Map<String, Value>,
    indent: usize,
    use_color: bool,
    out: &mut String,
) {
    if map.is_empty() {
        push(out, "{}", COLOR_BRACE, use_color);
        return;
    }
    push(out, "{", COLOR_BRACE, use_color);
    out.push('\n');
    let len = map.len();
    for (idx, (key, value)) in map.iter().enumerate() {
        push_indent(indent + 1, out);
        let encoded = serde_json::to_string(key).unwrap_or_else(|_| "\"\"".to_string());
        push(out, &encoded, COLOR_BARE, use_color);
        out.push(':');
        out.push(' ');
        write_value(value, indent + 1, use_color, out);
        if idx + 1 < len {
            out.push(',');
        }
        out.push('\n');
    }
    push_indent(indent, out);
    push(out, "}", COLOR_BRACE, use_color);
}

fn push_indent(level: usize, out: &mut String) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

fn push(out: &mut String, text: &str, color: &str, use_color: bool) {
    if use_color {
        push_colored(text, color, out);
    } else {
        out.push_str(text);
    }
}

fn push_colored(text: &str, color: &str, out: &mut String) {
    out.push_str("\u{1b}[");
    out.push_str(color);
    out.push('m');
    out.push_str(text);
    out.push_str("\u{1b}[0m");
}
