use num_bigint::BigInt;

use crate::operators::{BinaryOp, UnaryOp};

/// A constant value embedded directly in source.
///
/// `Text` is part of the constant vocabulary even though nothing in the
/// current lexer/parser produces it directly — host embedders may build
/// `Expr::Constant(Literal::Text(..))` nodes programmatically (e.g. when
/// splicing a pre-validated string into a rule without round-tripping it
/// through source syntax).
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(BigInt),
    Float(f64),
    Bytes(Vec<u8>),
    Text(String),
}

/// The expression tree a rule compiles to.
///
/// `ArrayComprehension`'s body is always a `BinaryOperation` whose `left` is
/// an `ArrayConstructor` — the parser only ever builds comprehensions in that
/// shape, and the linter and evaluator re-check it defensively rather than
/// trusting callers who build a tree by hand.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Constant(Literal),
    Variable(String),
    Block(Box<Expr>),
    UnaryOperation {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    BinaryOperation {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    FunctionCall {
        name: String,
        args: Vec<Expr>,
    },
    ArrayConstructor(Vec<Expr>),
    ArrayComprehension(Box<Expr>),
}
