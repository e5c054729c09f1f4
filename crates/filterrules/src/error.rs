use filterrules_lexer::LexError;
use filterrules_parser::ParseError;

/// Any failure that can occur while turning source bytes into a runnable
/// [`filterrules_eval::Rule`], short of evaluation itself.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Lint(String),
}
