use filterrules_eval::Rule;
use filterrules_types::Schema;

use crate::error::Error;

/// Lexes and parses `source`, producing an untrusted [`Rule`] ready to
/// evaluate. Does not type-check: a rule built this way can still fail at
/// evaluation time with a type error (e.g. adding a string to an int).
pub fn compile(source: &[u8]) -> Result<Rule, Error> {
    let tokens = filterrules_lexer::lex(source)?;
    let expr = filterrules_parser::parse(&tokens)?;
    Ok(Rule::new(expr))
}

/// Like [`compile`], but rejects the rule up front if it doesn't type-check
/// against `schema`. Catches the same class of errors [`compile`] would only
/// surface lazily, at evaluation time, once a particular variable binding or
/// branch is actually reached.
pub fn compile_checked(source: &[u8], schema: &Schema, untrusted: bool) -> Result<Rule, Error> {
    let tokens = filterrules_lexer::lex(source)?;
    let expr = filterrules_parser::parse(&tokens)?;
    if let Some(message) = filterrules_types::lint(&expr, schema, untrusted) {
        return Err(Error::Lint(message));
    }
    Ok(if untrusted {
        Rule::new(expr)
    } else {
        Rule::trusted(expr)
    })
}
