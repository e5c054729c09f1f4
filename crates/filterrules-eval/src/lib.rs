//! Tree-walking evaluator.
//!
//! Evaluation is a single recursive pass with no intermediate compiled form:
//! `and`/`or` short-circuit without evaluating their right-hand side, and an
//! array comprehension evaluates its right-hand side lazily, at most once,
//! reusing the cached value for every item that doesn't short-circuit away.

mod bindings;
mod error;
mod eval;
mod policy;
mod rule;
mod value;

pub use bindings::{Bindings, HostFunction};
pub use error::EvalError;
pub use policy::UntrustedPolicy;
pub use rule::Rule;
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use filterrules_lexer::lex;
    use filterrules_parser::parse;
    use num_bigint::BigInt;
    use pretty_assertions::assert_eq;

    fn eval_src(src: &[u8], bindings: &Bindings) -> Result<Value, EvalError> {
        let tokens = lex(src).unwrap();
        let expr = parse(&tokens).unwrap();
        Rule::new(expr).evaluate(bindings)
    }

    #[test]
    fn simple_arithmetic() {
        assert_eq!(
            eval_src(b"123 + 456", &Bindings::new()).unwrap(),
            Value::Int(BigInt::from(579))
        );
    }

    #[test]
    fn block_unwraps() {
        assert_eq!(
            eval_src(b"(123)", &Bindings::new()).unwrap(),
            Value::Int(BigInt::from(123))
        );
    }

    #[test]
    fn in_operator_membership() {
        assert_eq!(
            eval_src(b"0 ~ [0, 1]", &Bindings::new()).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            eval_src(b"0 ~ [1]", &Bindings::new()).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn variable_lookup() {
        let bindings = Bindings::new().with_variable("true", Value::Bool(true));
        assert_eq!(eval_src(b"true", &bindings).unwrap(), Value::Bool(true));
    }

    #[test]
    fn function_call() {
        let bindings = Bindings::new().with_function("fn", |args| match &args[0] {
            Value::Int(i) => Ok(Value::Int(i * BigInt::from(2))),
            other => Err(EvalError::UnsupportedOperand {
                op: "fn",
                ty: other.type_name(),
            }),
        });
        assert_eq!(
            eval_src(b"fn(123)", &bindings).unwrap(),
            Value::Int(BigInt::from(246))
        );
    }

    #[test]
    fn and_short_circuits() {
        let bindings = Bindings::new()
            .with_function("a", |_| Ok(Value::Bool(false)))
            .with_function("b", |_| Err(EvalError::DivisionByZero));
        assert_eq!(
            eval_src(b"a() && b()", &bindings).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn or_short_circuits() {
        let bindings = Bindings::new()
            .with_function("a", |_| Ok(Value::Bool(true)))
            .with_function("b", |_| Err(EvalError::DivisionByZero));
        assert_eq!(
            eval_src(b"a() || b()", &bindings).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn left_to_right_precedence() {
        assert_eq!(
            eval_src(b"1 + 2 * 3", &Bindings::new()).unwrap(),
            Value::Int(BigInt::from(9))
        );
        assert_eq!(
            eval_src(b"10 * 2 + 3", &Bindings::new()).unwrap(),
            Value::Int(BigInt::from(23))
        );
        assert_eq!(
            eval_src(b"10 * (2 + 3)", &Bindings::new()).unwrap(),
            Value::Int(BigInt::from(50))
        );
    }

    #[test]
    fn untrusted_pow_is_rejected() {
        assert_eq!(
            eval_src(b"2 ** 3", &Bindings::new()),
            Err(EvalError::PowDisabledUntrusted)
        );
    }

    #[test]
    fn trusted_pow_computes() {
        let tokens = lex(b"2 ** 10").unwrap();
        let expr = parse(&tokens).unwrap();
        assert_eq!(
            Rule::trusted(expr).evaluate(&Bindings::new()).unwrap(),
            Value::Int(BigInt::from(1024))
        );
    }

    #[test]
    fn lshift_at_the_cap_is_allowed() {
        let tokens = lex(b"1 << 128").unwrap();
        let expr = parse(&tokens).unwrap();
        let expected = Value::Int(BigInt::from(2).pow(128));
        assert_eq!(Rule::new(expr).evaluate(&Bindings::new()).unwrap(), expected);
    }

    #[test]
    fn lshift_past_the_cap_errors() {
        let tokens = lex(b"1 << 99999999999999").unwrap();
        let expr = parse(&tokens).unwrap();
        assert_eq!(
            Rule::new(expr).evaluate(&Bindings::new()),
            Err(EvalError::LshiftTooBig)
        );
    }

    #[test]
    fn lshift_magnitude_cap_applies_to_left_operand_too() {
        let tokens = lex(b"(1 << 128) << 8").unwrap();
        let expr = parse(&tokens).unwrap();
        assert_eq!(
            Rule::new(expr).evaluate(&Bindings::new()),
            Err(EvalError::LshiftTooBig)
        );
    }

    #[test]
    fn string_multiply_cross_type_is_rejected_in_untrusted_mode() {
        let tokens = lex(b"'x' * (1 << 32)").unwrap();
        let expr = parse(&tokens).unwrap();
        assert_eq!(
            Rule::new(expr).evaluate(&Bindings::new()),
            Err(EvalError::NonStringRightOnString)
        );
    }

    #[test]
    fn string_length_cap_applies_to_add() {
        let bindings = Bindings::new().with_variable("x", Value::Text("x".repeat(10_000)));
        let src: Vec<u8> = (0..10).map(|_| "x".to_string()).collect::<Vec<_>>().join("+").into_bytes();
        assert_eq!(
            eval_src(&src, &bindings),
            Err(EvalError::StringTooLong)
        );
    }

    #[test]
    fn comprehension_short_circuits_on_empty_array() {
        assert_eq!(
            eval_src(b"{[] == (1 / 0)}", &Bindings::new()).unwrap(),
            Value::List(vec![])
        );
    }

    #[test]
    fn comprehension_short_circuits_each_falsy_and() {
        assert_eq!(
            eval_src(b"{[!1] && (1 / 0)}", &Bindings::new()).unwrap(),
            Value::List(vec![Value::Bool(false)])
        );
    }

    #[test]
    fn comprehension_short_circuits_each_truthy_or() {
        assert_eq!(
            eval_src(b"{[!0] || (1 / 0)}", &Bindings::new()).unwrap(),
            Value::List(vec![Value::Bool(true)])
        );
    }

    #[test]
    fn equals_compares_int_and_float_numerically() {
        assert_eq!(
            eval_src(b"1 == 1.0", &Bindings::new()).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            eval_src(b"1 != 2.0", &Bindings::new()).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn comprehension_computes_per_element_result() {
        assert_eq!(
            eval_src(b"{[0, 1] == 1}", &Bindings::new()).unwrap(),
            Value::List(vec![Value::Bool(false), Value::Bool(true)])
        );
    }
}
