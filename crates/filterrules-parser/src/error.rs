#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected {spelling} ({kind})")]
    UnexpectedToken { spelling: String, kind: String },

    #[error("expected closing SEPARATOR, expected {expected}, not {found}")]
    MismatchedCloser { expected: String, found: String },

    #[error("must be a NAME before a function call, not {kind}")]
    CallOnNonName { kind: String },

    #[error("unexpected SEPARATOR, expected , or {closer}, not {found}")]
    UnexpectedSeparator { closer: String, found: String },

    #[error("expected OPERATOR, not {kind}")]
    ExpectedOperator { kind: String },

    #[error("unknown OPERATOR: {spelling}")]
    UnknownOperator { spelling: String },

    #[error("too deeply nested code")]
    TooDeeplyNested,

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("trailing tokens after expression")]
    TrailingTokens,
}
