/// Prefix unary operator tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Bnot,
    Plus,
    Minus,
}

impl UnaryOp {
    /// Maps a single-byte prefix operator spelling to its tag, or `None` if
    /// `byte` is not a unary operator byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'!' => Some(UnaryOp::Not),
            b'~' => Some(UnaryOp::Bnot),
            b'+' => Some(UnaryOp::Plus),
            b'-' => Some(UnaryOp::Minus),
            _ => None,
        }
    }

    /// `true` for the four bytes that, when seen mid-operator-run, always
    /// belong to a following unary rather than extending the current binary
    /// operator spelling.
    pub fn is_unary_byte(byte: u8) -> bool {
        matches!(byte, b'!' | b'~' | b'+' | b'-')
    }

    /// Name used in error messages, matching the original AST's literal tags.
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
            UnaryOp::Bnot => "bnot",
            UnaryOp::Plus => "plus",
            UnaryOp::Minus => "minus",
        }
    }
}

/// Infix binary operator tags.
///
/// Every variant here must be handled by both the linter's operator-typing
/// table and the evaluator's operator dispatch; adding one without the other
/// is a bug.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Pow,
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEquals,
    LessThan,
    LessThanOrEquals,
    And,
    Or,
    Band,
    Bor,
    Bxor,
    Lshift,
    Rshift,
    In,
}

impl BinaryOp {
    /// Recognizes a fused operator spelling (e.g. `b"=="`, `b"<<"`) produced
    /// by the parser's operator-run fusion. Returns `None` for unknown
    /// spellings, which the parser reports as `unknown OPERATOR: <bytes>`.
    pub fn from_spelling(spelling: &[u8]) -> Option<Self> {
        Some(match spelling {
            b"+" => BinaryOp::Add,
            b"-" => BinaryOp::Subtract,
            b"*" => BinaryOp::Multiply,
            b"/" => BinaryOp::Divide,
            b"%" => BinaryOp::Modulo,
            b"**" => BinaryOp::Pow,
            b"==" => BinaryOp::Equals,
            b"!=" => BinaryOp::NotEquals,
            b">" => BinaryOp::GreaterThan,
            b">=" => BinaryOp::GreaterThanOrEquals,
            b"<" => BinaryOp::LessThan,
            b"<=" => BinaryOp::LessThanOrEquals,
            b"&&" => BinaryOp::And,
            b"||" => BinaryOp::Or,
            b"&" => BinaryOp::Band,
            b"|" => BinaryOp::Bor,
            b"^" => BinaryOp::Bxor,
            b"<<" => BinaryOp::Lshift,
            b">>" => BinaryOp::Rshift,
            b"~" => BinaryOp::In,
            _ => return None,
        })
    }

    /// Name used in error messages (matches the original hyphenated tags).
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Divide => "divide",
            BinaryOp::Modulo => "modulo",
            BinaryOp::Pow => "pow",
            BinaryOp::Equals => "equals",
            BinaryOp::NotEquals => "not-equals",
            BinaryOp::GreaterThan => "greater-than",
            BinaryOp::GreaterThanOrEquals => "greater-than-or-equals",
            BinaryOp::LessThan => "less-than",
            BinaryOp::LessThanOrEquals => "less-than-or-equals",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Band => "band",
            BinaryOp::Bor => "bor",
            BinaryOp::Bxor => "bxor",
            BinaryOp::Lshift => "lshift",
            BinaryOp::Rshift => "rshift",
            BinaryOp::In => "in",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_every_spelling() {
        let spellings: &[(&[u8], BinaryOp)] = &[
            (b"+", BinaryOp::Add),
            (b"**", BinaryOp::Pow),
            (b"<<", BinaryOp::Lshift),
            (b"~", BinaryOp::In),
        ];
        for (spelling, expected) in spellings {
            assert_eq!(BinaryOp::from_spelling(spelling), Some(*expected));
        }
    }

    #[test]
    fn rejects_unknown_spelling() {
        assert_eq!(BinaryOp::from_spelling(b"&&&&"), None);
    }

    #[test]
    fn unary_bytes_never_overlap_plain_operators() {
        for b in [b'!', b'~', b'+', b'-'] {
            assert!(UnaryOp::is_unary_byte(b));
            assert!(UnaryOp::from_byte(b).is_some());
        }
    }
}
