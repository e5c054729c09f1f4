//! Byte-level lexer.
//!
//! Turns raw source bytes into a flat token stream. The lexer never fuses
//! multi-byte operator spellings (`==`, `&&`, `<<`, ...) — it emits one
//! `OPERATOR` token per byte and leaves fusing a run of them to the parser.
//! It also never rejects an unknown operator byte sequence; that too is a
//! parser-time concern (`unknown OPERATOR: <bytes>`).
//!
//! Whitespace is a pure delimiter outside of strings: it separates tokens but
//! produces none of its own, so adjacent `NAME` runs separated only by
//! whitespace fuse into a single `NAME` token (`the best` lexes the same as
//! `thebest`). This is an intentional, preserved quirk rather than a bug.

use filterrules_ast::{Token, TokenKind};
use tracing::trace;

#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum LexError {
    #[error("invalid hex-escape sequence")]
    InvalidHexEscape,
}

const WHITESPACE_CHARS: &[u8] = b" \t\n\r\x0b\x0c";
const SEPARATOR_CHARS: &[u8] = b"()[]{},";
const OPERATOR_CHARS: &[u8] = b"+-*/=!<>&|^~%";
const STRING_CHARS: &[u8] = b"'\"";
const HEX_CHARS: &[u8] = b"0123456789abcdef";

fn is_whitespace(b: u8) -> bool {
    WHITESPACE_CHARS.contains(&b)
}

fn is_separator(b: u8) -> bool {
    SEPARATOR_CHARS.contains(&b)
}

fn is_operator(b: u8) -> bool {
    OPERATOR_CHARS.contains(&b)
}

fn is_string_quote(b: u8) -> bool {
    STRING_CHARS.contains(&b)
}

fn hex_value(b: u8) -> Option<u8> {
    HEX_CHARS.iter().position(|&h| h == b).map(|pos| pos as u8)
}

/// Lexes `code` into a flat token stream.
///
/// Escape sequences (`\n`, `\r`, `\xNN`, and any other escaped byte taken
/// literally) are only recognized inside a string literal; a bare backslash
/// outside a string is an ordinary byte and joins whatever `NAME` it sits in.
/// A string left unterminated at end of input (no matching closing quote) is
/// silently dropped along with its unterminated contents — lexing never
/// raises for unterminated strings, only for a malformed `\x` escape.
pub fn lex(code: &[u8]) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut buffer: Vec<u8> = Vec::new();
    let mut waiting_for_break: Option<u8> = None;

    let len = code.len();
    let mut i = 0;
    while i < len {
        let ch = code[i];
        i += 1;

        if waiting_for_break.is_none() && is_string_quote(ch) {
            if !buffer.is_empty() {
                tokens.push(Token::new(TokenKind::Name, std::mem::take(&mut buffer)));
            }
            waiting_for_break = Some(ch);
            continue;
        }

        if waiting_for_break.is_none() && is_whitespace(ch) {
            continue;
        }

        if waiting_for_break.is_none() && (is_separator(ch) || is_operator(ch)) {
            if !buffer.is_empty() {
                tokens.push(Token::new(TokenKind::Name, std::mem::take(&mut buffer)));
            }
            let kind = if is_separator(ch) {
                TokenKind::Separator
            } else {
                TokenKind::Operator
            };
            tokens.push(Token::new(kind, vec![ch]));
            continue;
        }

        if waiting_for_break.is_some() && ch == b'\\' {
            if i >= len {
                // Trailing backslash inside an unterminated string; the
                // whole string is dropped, same as any other unterminated
                // string.
                waiting_for_break = None;
                buffer.clear();
                break;
            }
            let escaped = code[i];
            i += 1;
            match escaped {
                b'n' => buffer.push(b'\n'),
                b'r' => buffer.push(b'\r'),
                b'x' => {
                    if i + 2 > len {
                        return Err(LexError::InvalidHexEscape);
                    }
                    let c1 = code[i];
                    let c2 = code[i + 1];
                    i += 2;
                    let v1 = hex_value(c1).ok_or(LexError::InvalidHexEscape)?;
                    let v2 = hex_value(c2).ok_or(LexError::InvalidHexEscape)?;
                    buffer.push((v1 << 4) | v2);
                }
                other => buffer.push(other),
            }
            continue;
        }

        if waiting_for_break == Some(ch) {
            tokens.push(Token::new(TokenKind::String, std::mem::take(&mut buffer)));
            waiting_for_break = None;
            continue;
        }

        buffer.push(ch);
    }

    if waiting_for_break.is_none() && !buffer.is_empty() {
        tokens.push(Token::new(TokenKind::Name, std::mem::take(&mut buffer)));
    }

    trace!(token_count = tokens.len(), "lexed source");
    Ok(tokens)
}
