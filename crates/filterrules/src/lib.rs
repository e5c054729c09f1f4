//! Portable filterrules pipeline driver.
//!
//! Parses, optionally type-checks, and evaluates expressions in the
//! filterrules language: a small, embeddable boolean/arithmetic expression
//! language meant for user-authored filter conditions running untrusted, by
//! default, against a host-supplied set of variables and functions.
//!
//! # Usage
//!
//! ```
//! use filterrules::{Bindings, Rule};
//!
//! let rule = filterrules::compile(b"123 + 456").unwrap();
//! let value = rule.evaluate(&Bindings::new()).unwrap();
//! assert_eq!(value, filterrules::Value::Int(579.into()));
//! ```
//!
//! # Architecture
//!
//! This crate sits on top of the pipeline crates and wires them together:
//!
//! ```text
//! filterrules-ast
//!       ↓
//! filterrules-lexer → filterrules-parser → filterrules-types → filterrules-eval
//!                                   ↓
//!                              filterrules  ← this crate
//! ```

mod error;
mod pipeline;

pub use error::Error;
pub use pipeline::{compile, compile_checked};

pub use filterrules_ast::{BinaryOp, Expr, Literal, UnaryOp};
pub use filterrules_eval::{Bindings, EvalError, HostFunction, Rule, UntrustedPolicy, Value};
pub use filterrules_lexer::LexError;
pub use filterrules_parser::ParseError;
pub use filterrules_types::{format_type_tuple, lint, LintError, Schema, Type};

#[cfg(test)]
mod tests;
