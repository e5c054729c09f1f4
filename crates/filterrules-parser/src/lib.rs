//! Recursive-descent parser with no operator precedence.
//!
//! Binary expressions are folded left-associatively by construction: after
//! parsing an operator and recursing for its right-hand side, if that
//! right-hand side itself turns out to be a `BinaryOperation`, the tree is
//! rewritten so the left operand absorbs the first operator instead of
//! nesting to the right —
//! `add(1, add(2, 3))` becomes `add(add(1, 2), 3)` — rather than encoding
//! precedence levels as separate grammar productions.

mod cursor;
mod error;

use filterrules_ast::{byte_repr, BinaryOp, Expr, Literal, Token, TokenKind, UnaryOp};
use num_bigint::BigInt;
use tracing::trace;

pub use error::ParseError;

use cursor::Cursor;

const MAX_DEPTH: u32 = 100;

/// Parses a full token stream into a single expression.
///
/// Unlike the bare recursive descent below, this entry point additionally
/// verifies that parsing consumed every token — a dangling `)` or `]` left
/// over after a complete expression is a `TrailingTokens` error here, even
/// though the inner recursion is happy to stop early at the first closing
/// separator it doesn't recognize as its own.
pub fn parse(tokens: &[Token]) -> Result<Expr, ParseError> {
    let mut cursor = Cursor::new(tokens);
    let expr = parse_expr(&mut cursor, 0)?;
    if !cursor.is_empty() {
        return Err(ParseError::TrailingTokens);
    }
    trace!("parsed expression");
    Ok(expr)
}

fn kind_name(kind: TokenKind) -> String {
    kind.to_string()
}

/// Parses one primary, its postfix call chain (if any), and at most one
/// binary operator tail — recursing for the right-hand side, which may
/// itself contain further operators.
fn parse_expr(cursor: &mut Cursor, depth: u32) -> Result<Expr, ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::TooDeeplyNested);
    }
    let (first_kind, first_name, node) = parse_primary(cursor, depth)?;
    parse_tail(cursor, depth, first_kind, first_name, node)
}

/// Parses a primary with no postfix call chain and no binary operator tail —
/// used for unary operands, which bind only to the immediately following
/// primary.
fn parse_operand(cursor: &mut Cursor, depth: u32) -> Result<Expr, ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::TooDeeplyNested);
    }
    let (_, _, node) = parse_primary(cursor, depth)?;
    Ok(node)
}

fn parse_primary(
    cursor: &mut Cursor,
    depth: u32,
) -> Result<(TokenKind, Option<String>, Expr), ParseError> {
    let tok = cursor.pop().ok_or(ParseError::UnexpectedEof)?;
    match tok.kind {
        TokenKind::Name => {
            let text = String::from_utf8_lossy(&tok.bytes).into_owned();
            let node = if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
                Expr::Constant(Literal::Int(
                    text.parse::<BigInt>().expect("digit run parses as integer"),
                ))
            } else if let Ok(f) = text.parse::<f64>() {
                Expr::Constant(Literal::Float(f))
            } else {
                Expr::Variable(text.clone())
            };
            Ok((TokenKind::Name, Some(text), node))
        }
        TokenKind::String => Ok((
            TokenKind::String,
            None,
            Expr::Constant(Literal::Bytes(tok.bytes.clone())),
        )),
        TokenKind::Separator if tok.bytes.as_slice() == b"(" => {
            let inner = parse_expr(cursor, depth + 1)?;
            expect_closer(cursor, b")")?;
            Ok((TokenKind::Separator, None, Expr::Block(Box::new(inner))))
        }
        TokenKind::Separator if tok.bytes.as_slice() == b"[" => {
            let items = parse_comma_list(cursor, depth + 1, b']')?;
            Ok((
                TokenKind::Separator,
                None,
                Expr::ArrayConstructor(items),
            ))
        }
        TokenKind::Separator if tok.bytes.as_slice() == b"{" => {
            let open = cursor.pop().ok_or(ParseError::UnexpectedEof)?;
            if open.kind != TokenKind::Separator || open.bytes.as_slice() != b"[" {
                return Err(ParseError::UnexpectedToken {
                    spelling: byte_repr(&open.bytes),
                    kind: kind_name(open.kind),
                });
            }
            let items = parse_comma_list(cursor, depth + 1, b']')?;
            let array = Expr::ArrayConstructor(items);
            let body = parse_binop_tail(cursor, depth + 1, array)?;
            expect_closer(cursor, b"}")?;
            Ok((
                TokenKind::Separator,
                None,
                Expr::ArrayComprehension(Box::new(body)),
            ))
        }
        TokenKind::Operator if UnaryOp::is_unary_byte(tok.bytes[0]) && tok.bytes.len() == 1 => {
            let op = UnaryOp::from_byte(tok.bytes[0]).expect("checked above");
            let operand = parse_operand(cursor, depth + 1)?;
            Ok((
                TokenKind::Operator,
                None,
                Expr::UnaryOperation {
                    op,
                    operand: Box::new(operand),
                },
            ))
        }
        _ => Err(ParseError::UnexpectedToken {
            spelling: byte_repr(&tok.bytes),
            kind: kind_name(tok.kind),
        }),
    }
}

fn expect_closer(cursor: &mut Cursor, expected: &[u8]) -> Result<(), ParseError> {
    let tok = cursor.pop().ok_or(ParseError::UnexpectedEof)?;
    if tok.bytes.as_slice() != expected {
        return Err(ParseError::MismatchedCloser {
            expected: byte_repr(expected),
            found: byte_repr(&tok.bytes),
        });
    }
    Ok(())
}

/// Parses a comma-separated list of expressions up to (and consuming) a
/// closing separator byte, e.g. `1, 2, 3]` or an immediately empty `]`.
fn parse_comma_list(
    cursor: &mut Cursor,
    depth: u32,
    closer: u8,
) -> Result<Vec<Expr>, ParseError> {
    let mut items = Vec::new();
    if let Some(tok) = cursor.peek() {
        if tok.kind == TokenKind::Separator && tok.bytes == [closer] {
            cursor.advance();
            return Ok(items);
        }
    }
    loop {
        let item = parse_expr(cursor, depth)?;
        items.push(item);
        let tok = cursor.pop().ok_or(ParseError::UnexpectedEof)?;
        if tok.kind != TokenKind::Separator {
            return Err(ParseError::UnexpectedSeparator {
                closer: (closer as char).to_string(),
                found: byte_repr(&tok.bytes),
            });
        }
        if tok.bytes == [closer] {
            break;
        } else if tok.bytes.as_slice() == b"," {
            continue;
        } else {
            return Err(ParseError::UnexpectedSeparator {
                closer: (closer as char).to_string(),
                found: byte_repr(&tok.bytes),
            });
        }
    }
    Ok(items)
}

/// Handles the postfix call chain and the single binary operator tail that
/// follow a primary. Mirrors the source structure closely: a closing
/// separator that isn't `(` ends the expression immediately, without being
/// treated as an error, so `)`, `]`, `}` and `,` can all terminate a
/// sub-expression.
fn parse_tail(
    cursor: &mut Cursor,
    depth: u32,
    first_kind: TokenKind,
    first_name: Option<String>,
    mut node: Expr,
) -> Result<Expr, ParseError> {
    if cursor.is_empty() {
        return Ok(node);
    }

    loop {
        let Some(tok) = cursor.peek() else { break };
        if tok.kind != TokenKind::Separator {
            break;
        }
        if tok.bytes.as_slice() != b"(" {
            return Ok(node);
        }
        cursor.advance();
        if first_kind != TokenKind::Name {
            return Err(ParseError::CallOnNonName {
                kind: kind_name(first_kind),
            });
        }
        let args = parse_comma_list(cursor, depth + 1, b')')?;
        node = Expr::FunctionCall {
            name: first_name.clone().expect("NAME primary carries a name"),
            args,
        };
        if cursor.is_empty() {
            return Ok(node);
        }
    }

    if cursor.is_empty() {
        return Ok(node);
    }

    parse_binop_tail(cursor, depth, node)
}

/// Fuses a run of single-byte `OPERATOR` tokens into a known operator
/// spelling, parses its right-hand side, and rewrites the result so binary
/// operators associate left-to-right. Requires an operator to follow;
/// callers that allow an expression to end without one (plain `parse_tail`
/// with an empty cursor) must check that first.
fn parse_binop_tail(cursor: &mut Cursor, depth: u32, left: Expr) -> Result<Expr, ParseError> {
    let Some(next) = cursor.peek() else {
        return Err(ParseError::ExpectedOperator {
            kind: "end of input".to_string(),
        });
    };
    if next.kind != TokenKind::Operator {
        return Err(ParseError::ExpectedOperator {
            kind: kind_name(next.kind),
        });
    }

    let mut spelling = Vec::new();
    while let Some(tok) = cursor.peek() {
        if tok.kind != TokenKind::Operator {
            break;
        }
        if !spelling.is_empty() && UnaryOp::is_unary_byte(tok.bytes[0]) {
            break;
        }
        spelling.push(tok.bytes[0]);
        cursor.advance();
    }

    let op = BinaryOp::from_spelling(&spelling).ok_or_else(|| ParseError::UnknownOperator {
        spelling: byte_repr(&spelling),
    })?;

    let right = parse_expr(cursor, depth + 1)?;

    let result = match right {
        Expr::BinaryOperation {
            op: op2,
            left: l2,
            right: r2,
        } => Expr::BinaryOperation {
            op: op2,
            left: Box::new(Expr::BinaryOperation {
                op,
                left: Box::new(left),
                right: l2,
            }),
            right: r2,
        },
        other => Expr::BinaryOperation {
            op,
            left: Box::new(left),
            right: Box::new(other),
        },
    };
    Ok(result)
}
