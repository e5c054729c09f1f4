#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum LintError {
    #[error("variable not found: '{name}'")]
    VariableNotFound { name: String },

    #[error("cannot use {op} operator on different types: '{left}' and '{right}'")]
    DifferentTypes {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("cannot use {op} operator on non-numbers: '{ty}'")]
    NonNumbers { op: &'static str, ty: &'static str },

    #[error("cannot use {op} operator on non-integer: '{ty}'")]
    NonInteger { op: &'static str, ty: &'static str },

    #[error("cannot use pow operator in untrusted code")]
    PowUntrusted,

    #[error("function not found: '{name}'")]
    FunctionNotFound { name: String },

    #[error("function has incorrect amount of arguments, got {got}, expected {expected}")]
    ArgCountMismatch { got: usize, expected: usize },

    #[error("function has incorrect argument signature, got {got}, expected {expected}")]
    ArgSignatureMismatch { got: String, expected: String },

    #[error("unable to determine array type")]
    EmptyArrayType,

    #[error("array elements have different types: '{left}' and '{right}'")]
    ArrayElementTypeMismatch {
        left: &'static str,
        right: &'static str,
    },

    #[error("cannot use in operator on non-lists: '{ty}'")]
    InNonList { ty: &'static str },

    #[error("cannot use in operator on untyped lists: '{ty}'")]
    InUntypedList { ty: &'static str },

    #[error("cannot use list comprehension on non-lists")]
    ComprehensionNonList,

    #[error("cannot use list comprehension on untyped lists")]
    ComprehensionUntypedList,
}
