use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::{compile, compile_checked, Bindings, Error, Schema, Type, Value};

#[test]
fn compiles_and_evaluates_arithmetic() {
    let rule = compile(b"123 + 456").unwrap();
    assert_eq!(rule.evaluate(&Bindings::new()).unwrap(), Value::Int(579.into()));
}

#[test]
fn compiles_and_evaluates_membership() {
    let rule = compile(b"1 ~ [0, 1, 2]").unwrap();
    assert_eq!(rule.evaluate(&Bindings::new()).unwrap(), Value::Bool(true));
}

#[test]
fn bindings_flow_through_to_evaluation() {
    let rule = compile(b"score > 10").unwrap();
    let bindings = Bindings::new().with_variable("score", Value::Int(20.into()));
    assert_eq!(rule.evaluate(&bindings).unwrap(), Value::Bool(true));
}

#[test]
fn unterminated_strings_are_dropped_then_parsing_fails_on_empty_input() {
    let err = compile(b"'unterminated");
    assert!(matches!(err, Err(Error::Parse(_))));
}

#[test]
fn parse_errors_surface_through_the_facade() {
    let err = compile(b"+");
    assert!(matches!(err, Err(Error::Parse(_))));
}

#[test]
fn checked_compile_rejects_ill_typed_rules() {
    let schema = Schema::new().with_variable("name", Type::Str);
    let err = compile_checked(b"name + 1", &schema, true);
    assert!(matches!(err, Err(Error::Lint(_))));
}

#[test]
fn checked_compile_accepts_well_typed_rules() {
    let schema = Schema::new().with_variable("count", Type::Int);
    let rule = compile_checked(b"count + 1", &schema, true).unwrap();
    let bindings = Bindings::new().with_variable("count", Value::Int(41.into()));
    assert_eq!(rule.evaluate(&bindings).unwrap(), Value::Int(42.into()));
}

#[test]
fn untrusted_checked_compile_rejects_pow_at_lint_time() {
    let schema = Schema::new();
    let err = compile_checked(b"2 ** 8", &schema, true);
    assert!(matches!(err, Err(Error::Lint(_))));
}

#[test]
fn untrusted_uncompiled_rules_reject_pow_at_evaluation_time() {
    let rule = compile(b"2 ** 8").unwrap();
    assert!(rule.evaluate(&Bindings::new()).is_err());
}

#[test]
fn trusted_rules_allow_pow() {
    let schema = Schema::new();
    let rule = compile_checked(b"2 ** 8", &schema, false).unwrap();
    assert_eq!(
        rule.evaluate(&Bindings::new()).unwrap(),
        Value::Int(256.into())
    );
}

proptest::proptest! {
    #[test]
    fn left_associative_chains_never_panic(a in 0i64..1000, b in 0i64..1000, c in 0i64..1000) {
        let src = format!("{a} + {b} + {c}");
        let rule = compile(src.as_bytes()).unwrap();
        let value = rule.evaluate(&Bindings::new()).unwrap();
        prop_assert_eq!(value, Value::Int((a + b + c).into()));
    }

    #[test]
    fn re_parsing_the_same_source_is_deterministic(n in 0i64..1_000_000) {
        let src = format!("{n}");
        let first = compile(src.as_bytes()).unwrap();
        let second = compile(src.as_bytes()).unwrap();
        prop_assert_eq!(first.expr(), second.expr());
    }
}
