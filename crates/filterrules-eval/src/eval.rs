use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use filterrules_ast::{BinaryOp, Expr, Literal, UnaryOp};

use crate::bindings::Bindings;
use crate::error::EvalError;
use crate::policy::UntrustedPolicy;
use crate::value::Value;

type EvalResult<T> = Result<T, EvalError>;

pub fn eval_expr(
    expr: &Expr,
    bindings: &Bindings,
    policy: &UntrustedPolicy,
    untrusted: bool,
) -> EvalResult<Value> {
    match expr {
        Expr::Block(inner) => eval_expr(inner, bindings, policy, untrusted),

        Expr::Constant(lit) => Ok(literal_to_value(lit)),

        Expr::Variable(name) => bindings
            .variables
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::VariableNotFound { name: name.clone() }),

        Expr::UnaryOperation { op, operand } => {
            let value = eval_expr(operand, bindings, policy, untrusted)?;
            eval_unary(*op, value)
        }

        Expr::BinaryOperation { op, left, right } => {
            let left_val = eval_expr(left, bindings, policy, untrusted)?;
            if let Some(shortcut) = short_circuit(*op, &left_val) {
                return Ok(shortcut);
            }
            let right_val = eval_expr(right, bindings, policy, untrusted)?;
            finish_binary(*op, left_val, right_val, policy, untrusted)
        }

        Expr::FunctionCall { name, args } => {
            let func = bindings
                .functions
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::FunctionNotFound { name: name.clone() })?;
            let values = args
                .iter()
                .map(|a| eval_expr(a, bindings, policy, untrusted))
                .collect::<EvalResult<Vec<_>>>()?;
            func(&values)
        }

        Expr::ArrayConstructor(items) => {
            let values = items
                .iter()
                .map(|i| eval_expr(i, bindings, policy, untrusted))
                .collect::<EvalResult<Vec<_>>>()?;
            Ok(Value::List(values))
        }

        Expr::ArrayComprehension(body) => eval_comprehension(body, bindings, policy, untrusted),
    }
}

fn literal_to_value(lit: &Literal) -> Value {
    match lit {
        Literal::Int(i) => Value::Int(i.clone()),
        Literal::Float(f) => Value::Float(*f),
        Literal::Bytes(b) => Value::Bytes(b.clone()),
        Literal::Text(s) => Value::Text(s.clone()),
    }
}

/// Evaluates an array comprehension body, whose shape the parser always
/// produces as `BinaryOperation(op, ArrayConstructor(items), rhs)`.
///
/// `rhs` is evaluated at most once — lazily, only the first time some item
/// isn't short-circuited away — and reused for every later item. This is
/// what lets `{[] == (1 / 0)}` (zero items) and `{[!1] && (1 / 0)}` (every
/// item short-circuits) both finish without ever forcing the division.
fn eval_comprehension(
    body: &Expr,
    bindings: &Bindings,
    policy: &UntrustedPolicy,
    untrusted: bool,
) -> EvalResult<Value> {
    let Expr::BinaryOperation { op, left, right } = body else {
        return Err(EvalError::UnsupportedOperand {
            op: "list comprehension",
            ty: "non-binary-operation body",
        });
    };
    let Expr::ArrayConstructor(items) = left.as_ref() else {
        return Err(EvalError::UnsupportedOperand {
            op: "list comprehension",
            ty: "non-array-constructor body",
        });
    };

    let mut cached_right: Option<Value> = None;
    let mut results = Vec::with_capacity(items.len());
    for item_expr in items {
        let item_val = eval_expr(item_expr, bindings, policy, untrusted)?;
        if let Some(shortcut) = short_circuit(*op, &item_val) {
            results.push(shortcut);
            continue;
        }
        if cached_right.is_none() {
            cached_right = Some(eval_expr(right, bindings, policy, untrusted)?);
        }
        let right_val = cached_right.clone().expect("populated on first use");
        results.push(finish_binary(*op, item_val, right_val, policy, untrusted)?);
    }
    Ok(Value::List(results))
}

fn short_circuit(op: BinaryOp, left: &Value) -> Option<Value> {
    match op {
        BinaryOp::And if !left.truthy() => Some(left.clone()),
        BinaryOp::Or if left.truthy() => Some(left.clone()),
        _ => None,
    }
}

/// Applies a binary operator to already-evaluated operands.
///
/// The untrusted-mode cross-type check runs first and applies to every
/// operator uniformly, not just `add`/`lshift` — a string-shaped left
/// operand paired with a non-string right operand is rejected outright in
/// untrusted mode regardless of what operator sits between them.
fn finish_binary(
    op: BinaryOp,
    left: Value,
    right: Value,
    policy: &UntrustedPolicy,
    untrusted: bool,
) -> EvalResult<Value> {
    if untrusted && left.is_string_like() && !right.is_string_like() {
        return Err(EvalError::NonStringRightOnString);
    }

    use BinaryOp::*;
    match op {
        Add => {
            let result = add(left, right)?;
            if untrusted {
                if let Some(len) = result.len() {
                    if len >= policy.max_string_len {
                        return Err(EvalError::StringTooLong);
                    }
                }
            }
            Ok(result)
        }
        Subtract => subtract(left, right),
        Multiply => multiply(left, right),
        Divide => divide(left, right),
        Modulo => modulo(left, right),
        Pow => {
            if untrusted {
                return Err(EvalError::PowDisabledUntrusted);
            }
            pow(left, right)
        }
        Equals => Ok(Value::Bool(values_equal(&left, &right))),
        NotEquals => Ok(Value::Bool(!values_equal(&left, &right))),
        GreaterThan => compare(left, right, "greater-than", |o| {
            o == std::cmp::Ordering::Greater
        }),
        GreaterThanOrEquals => compare(left, right, "greater-than-or-equals", |o| {
            o != std::cmp::Ordering::Less
        }),
        LessThan => compare(left, right, "less-than", |o| o == std::cmp::Ordering::Less),
        LessThanOrEquals => compare(left, right, "less-than-or-equals", |o| {
            o != std::cmp::Ordering::Greater
        }),
        And | Or => Ok(right),
        Band => bitwise(left, right, "band", |a, b| a & b),
        Bor => bitwise(left, right, "bor", |a, b| a | b),
        Bxor => bitwise(left, right, "bxor", |a, b| a ^ b),
        Lshift => lshift(left, right, policy, untrusted),
        Rshift => rshift(left, right),
        In => contains(left, right),
    }
}

fn to_f64(i: &BigInt) -> f64 {
    i.to_f64().unwrap_or(f64::INFINITY)
}

fn unsupported(op: &'static str, left: &Value, right: &Value) -> EvalError {
    EvalError::UnsupportedOperands {
        op,
        left: left.type_name(),
        right: right.type_name(),
    }
}

fn add(left: Value, right: Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(to_f64(&a) + b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a + to_f64(&b))),
        (Value::Bytes(mut a), Value::Bytes(b)) => {
            a.extend(b);
            Ok(Value::Bytes(a))
        }
        (Value::Text(mut a), Value::Text(b)) => {
            a.push_str(&b);
            Ok(Value::Text(a))
        }
        (Value::List(mut a), Value::List(b)) => {
            a.extend(b);
            Ok(Value::List(a))
        }
        (l, r) => Err(unsupported("add", &l, &r)),
    }
}

fn subtract(left: Value, right: Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a - b)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(to_f64(&a) - b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a - to_f64(&b))),
        (l, r) => Err(unsupported("subtract", &l, &r)),
    }
}

fn multiply(left: Value, right: Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a * b)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a * b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(to_f64(&a) * b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a * to_f64(&b))),
        (Value::Bytes(b), Value::Int(n)) | (Value::Int(n), Value::Bytes(b)) => {
            repeat_bytes(b, &n).map(Value::Bytes)
        }
        (Value::Text(s), Value::Int(n)) | (Value::Int(n), Value::Text(s)) => {
            repeat_text(s, &n).map(Value::Text)
        }
        (l, r) => Err(unsupported("multiply", &l, &r)),
    }
}

fn repeat_bytes(bytes: Vec<u8>, count: &BigInt) -> EvalResult<Vec<u8>> {
    let count = count.to_usize().ok_or(EvalError::RepeatCountOutOfRange)?;
    let total = bytes
        .len()
        .checked_mul(count)
        .ok_or(EvalError::RepeatCountOutOfRange)?;
    let mut out = Vec::with_capacity(total);
    for _ in 0..count {
        out.extend_from_slice(&bytes);
    }
    Ok(out)
}

fn repeat_text(text: String, count: &BigInt) -> EvalResult<String> {
    let count = count.to_usize().ok_or(EvalError::RepeatCountOutOfRange)?;
    let total = text
        .len()
        .checked_mul(count)
        .ok_or(EvalError::RepeatCountOutOfRange)?;
    let mut out = String::with_capacity(total);
    for _ in 0..count {
        out.push_str(&text);
    }
    Ok(out)
}

fn divide(left: Value, right: Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => {
            if b.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Int(a / b))
        }
        (Value::Float(a), Value::Float(b)) => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Float(a / b))
        }
        (Value::Int(a), Value::Float(b)) => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Float(to_f64(&a) / b))
        }
        (Value::Float(a), Value::Int(b)) => {
            if b.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Float(a / to_f64(&b)))
        }
        (l, r) => Err(unsupported("divide", &l, &r)),
    }
}

fn modulo(left: Value, right: Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => {
            if b.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Int(a % b))
        }
        (Value::Float(a), Value::Float(b)) => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Float(a % b))
        }
        (l, r) => Err(unsupported("modulo", &l, &r)),
    }
}

fn pow(left: Value, right: Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => {
            let exp = b.to_u32().ok_or(EvalError::ExponentOverflow)?;
            Ok(Value::Int(bigint_pow(&a, exp)))
        }
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a.powf(b))),
        (l, r) => Err(unsupported("pow", &l, &r)),
    }
}

fn compare(
    left: Value,
    right: Value,
    op: &'static str,
    accept: impl Fn(std::cmp::Ordering) -> bool,
) -> EvalResult<Value> {
    let ordering = match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => {
            a.partial_cmp(b).ok_or_else(|| unsupported(op, &left, &right))?
        }
        (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => return Err(unsupported(op, &left, &right)),
    };
    Ok(Value::Bool(accept(ordering)))
}

fn bitwise(
    left: Value,
    right: Value,
    op: &'static str,
    f: impl Fn(BigInt, BigInt) -> BigInt,
) -> EvalResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(f(a, b))),
        (l, r) => Err(unsupported(op, &l, &r)),
    }
}

fn lshift(
    left: Value,
    right: Value,
    policy: &UntrustedPolicy,
    untrusted: bool,
) -> EvalResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => {
            if untrusted {
                let amount_too_big = b > BigInt::from(policy.max_lshift_amount);
                let magnitude_too_big = a >= pow2(policy.max_lshift_magnitude_bits);
                if amount_too_big || magnitude_too_big {
                    return Err(EvalError::LshiftTooBig);
                }
            }
            let amount = b.to_u32().ok_or(EvalError::ShiftAmountOverflow)?;
            Ok(Value::Int(a * pow2(amount)))
        }
        (l, r) => Err(unsupported("lshift", &l, &r)),
    }
}

fn rshift(left: Value, right: Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => {
            let amount = b.to_u32().ok_or(EvalError::ShiftAmountOverflow)?;
            Ok(Value::Int(a / pow2(amount)))
        }
        (l, r) => Err(unsupported("rshift", &l, &r)),
    }
}

fn contains(left: Value, right: Value) -> EvalResult<Value> {
    match right {
        Value::List(items) => Ok(Value::Bool(items.iter().any(|item| values_equal(item, &left)))),
        other => Err(unsupported("in", &left, &other)),
    }
}

/// Value equality for `equals`/`not-equals`/`in`, which (per the linter's own
/// typing rule) accept any pair of types with no coercion requirement. An
/// `Int` and a `Float` compare equal when numerically equal, mirroring the
/// host language's native `==`, which doesn't care that `1` and `1.0` are
/// different runtime types. Every other cross-type pairing is simply unequal,
/// same as derived structural equality would give.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Float(b)) => to_f64(a) == *b,
        (Value::Float(a), Value::Int(b)) => *a == to_f64(b),
        _ => left == right,
    }
}

fn eval_unary(op: UnaryOp, value: Value) -> EvalResult<Value> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!value.truthy())),
        UnaryOp::Bnot => match value {
            Value::Int(a) => Ok(Value::Int(!a)),
            other => Err(EvalError::UnsupportedOperand {
                op: "bnot",
                ty: other.type_name(),
            }),
        },
        UnaryOp::Plus => match value {
            Value::Int(a) => Ok(Value::Int(a)),
            Value::Float(f) => Ok(Value::Float(f)),
            other => Err(EvalError::UnsupportedOperand {
                op: "plus",
                ty: other.type_name(),
            }),
        },
        UnaryOp::Minus => match value {
            Value::Int(a) => Ok(Value::Int(-a)),
            Value::Float(f) => Ok(Value::Float(-f)),
            other => Err(EvalError::UnsupportedOperand {
                op: "minus",
                ty: other.type_name(),
            }),
        },
    }
}

/// Computes `2^exp` by repeated squaring. Used for shifts instead of a
/// `Shl`/`Shr` trait call so the magnitude cap in untrusted mode can be
/// checked against the would-be result before it's ever materialized.
fn pow2(exp: u32) -> BigInt {
    bigint_pow(&BigInt::from(2), exp)
}

fn bigint_pow(base: &BigInt, exp: u32) -> BigInt {
    let mut result = BigInt::from(1);
    let mut base = base.clone();
    let mut exp = exp;
    while exp > 0 {
        if exp & 1 == 1 {
            result = &result * &base;
        }
        base = &base * &base;
        exp >>= 1;
    }
    result
}
