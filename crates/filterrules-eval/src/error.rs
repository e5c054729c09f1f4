#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("pow operation (**) is disabled in untrusted mode")]
    PowDisabledUntrusted,

    #[error("string longer than allowed in untrusted mode")]
    StringTooLong,

    #[error("cannot use non-string right-value on a string in untrusted mode")]
    NonStringRightOnString,

    #[error("lshift operation with too big values")]
    LshiftTooBig,

    #[error("division by zero")]
    DivisionByZero,

    #[error("variable not found: '{name}'")]
    VariableNotFound { name: String },

    #[error("function not found: '{name}'")]
    FunctionNotFound { name: String },

    #[error("unsupported operand types for {op}: {left} and {right}")]
    UnsupportedOperands {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("unsupported operand type for {op}: {ty}")]
    UnsupportedOperand { op: &'static str, ty: &'static str },

    #[error("shift amount too large to represent")]
    ShiftAmountOverflow,

    #[error("exponent too large")]
    ExponentOverflow,

    #[error("repeat count out of range")]
    RepeatCountOutOfRange,

    #[error("{0}")]
    HostFunction(String),
}
