//! Static type checking ("linting") for the filterrules expression language.
//!
//! [`lint`] never panics and never raises: every failure is a plain
//! `Some(message)`, and a clean rule lints to `None`. This mirrors the
//! contract callers actually want — a rule is typically linted once at
//! registration time and the message (if any) surfaced to whoever authored
//! the rule, not propagated as a hard error.

mod error;
mod schema;
mod ty;

use filterrules_ast::{BinaryOp, Expr, Literal, UnaryOp};
use tracing::{debug, trace};

pub use error::LintError;
pub use schema::Schema;
pub use ty::{format_type_tuple, Type};

/// Type-checks `expr` against `schema`. `untrusted` gates the `pow`
/// operator, which is always rejected outside of trusted contexts
/// regardless of operand types.
pub fn lint(expr: &Expr, schema: &Schema, untrusted: bool) -> Option<String> {
    match infer(expr, schema, untrusted) {
        Ok(ty) => {
            trace!(?ty, "rule linted clean");
            None
        }
        Err(e) => {
            let message = e.to_string();
            debug!(error = %message, "rule failed to lint");
            Some(message)
        }
    }
}

fn infer(expr: &Expr, schema: &Schema, untrusted: bool) -> Result<Type, LintError> {
    match expr {
        Expr::Block(inner) => infer(inner, schema, untrusted),

        Expr::Constant(literal) => Ok(match literal {
            Literal::Int(_) => Type::Int,
            Literal::Float(_) => Type::Float,
            Literal::Bytes(_) => Type::Bytes,
            Literal::Text(_) => Type::Str,
        }),

        Expr::Variable(name) => schema
            .variables
            .get(name)
            .cloned()
            .ok_or_else(|| LintError::VariableNotFound { name: name.clone() }),

        Expr::BinaryOperation { op, left, right } => {
            let left_ty = infer(left, schema, untrusted)?;
            let right_ty = infer(right, schema, untrusted)?;
            binary_result_type(*op, left_ty, right_ty, untrusted)
        }

        Expr::UnaryOperation { op, operand } => {
            let ty = infer(operand, schema, untrusted)?;
            match op {
                UnaryOp::Not => Ok(Type::Bool),
                UnaryOp::Bnot | UnaryOp::Plus | UnaryOp::Minus => {
                    if ty != Type::Int {
                        Err(LintError::NonInteger {
                            op: op.name(),
                            ty: ty.display_name(),
                        })
                    } else {
                        Ok(Type::Int)
                    }
                }
            }
        }

        Expr::FunctionCall { name, args } => {
            let (expected_args, return_ty) = schema
                .functions
                .get(name)
                .ok_or_else(|| LintError::FunctionNotFound { name: name.clone() })?;
            if args.len() != expected_args.len() {
                return Err(LintError::ArgCountMismatch {
                    got: args.len(),
                    expected: expected_args.len(),
                });
            }
            let arg_types = args
                .iter()
                .map(|a| infer(a, schema, untrusted))
                .collect::<Result<Vec<_>, _>>()?;
            if &arg_types != expected_args {
                return Err(LintError::ArgSignatureMismatch {
                    got: format_type_tuple(&arg_types),
                    expected: format_type_tuple(expected_args),
                });
            }
            Ok(return_ty.clone())
        }

        Expr::ArrayConstructor(items) => array_element_type(items, schema, untrusted)
            .map(|elem| Type::List(Some(Box::new(elem)))),

        Expr::ArrayComprehension(body) => match body.as_ref() {
            Expr::BinaryOperation { op, left, right } => match left.as_ref() {
                Expr::ArrayConstructor(items) if items.is_empty() => {
                    Err(LintError::ComprehensionUntypedList)
                }
                Expr::ArrayConstructor(items) => {
                    let elem_ty = array_element_type(items, schema, untrusted)?;
                    let right_ty = infer(right, schema, untrusted)?;
                    let result_ty = binary_result_type(*op, elem_ty, right_ty, untrusted)?;
                    Ok(Type::List(Some(Box::new(result_ty))))
                }
                _ => Err(LintError::ComprehensionNonList),
            },
            _ => Err(LintError::ComprehensionNonList),
        },
    }
}

fn array_element_type(
    items: &[Expr],
    schema: &Schema,
    untrusted: bool,
) -> Result<Type, LintError> {
    let mut items = items.iter();
    let Some(first) = items.next() else {
        return Err(LintError::EmptyArrayType);
    };
    let elem_ty = infer(first, schema, untrusted)?;
    for item in items {
        let ty = infer(item, schema, untrusted)?;
        if ty != elem_ty {
            return Err(LintError::ArrayElementTypeMismatch {
                left: elem_ty.display_name(),
                right: ty.display_name(),
            });
        }
    }
    Ok(elem_ty)
}

/// The operator-typing table shared by direct `BinaryOperation` nodes and
/// `ArrayComprehension` bodies (whose per-element result type is computed
/// the same way).
fn binary_result_type(
    op: BinaryOp,
    left: Type,
    right: Type,
    untrusted: bool,
) -> Result<Type, LintError> {
    use BinaryOp::*;

    let numeric_coercion = matches!(
        (&left, &right),
        (Type::Int, Type::Float) | (Type::Float, Type::Int)
    );

    match op {
        Add | Multiply => {
            if numeric_coercion {
                Ok(Type::Float)
            } else if left != right {
                Err(different_types(op, &left, &right))
            } else {
                Ok(left)
            }
        }
        Subtract | Divide => {
            if numeric_coercion {
                Ok(Type::Float)
            } else if left != right {
                Err(different_types(op, &left, &right))
            } else if !matches!(left, Type::Int | Type::Float) {
                Err(LintError::NonNumbers {
                    op: op.name(),
                    ty: left.display_name(),
                })
            } else {
                Ok(left)
            }
        }
        Band | Bor | Bxor | Lshift | Rshift => {
            if left != right {
                Err(different_types(op, &left, &right))
            } else if left != Type::Int {
                Err(LintError::NonInteger {
                    op: op.name(),
                    ty: left.display_name(),
                })
            } else {
                Ok(left)
            }
        }
        Pow => {
            if untrusted {
                Err(LintError::PowUntrusted)
            } else if left != right {
                Err(different_types(op, &left, &right))
            } else if !matches!(left, Type::Int | Type::Float) {
                Err(LintError::NonNumbers {
                    op: op.name(),
                    ty: left.display_name(),
                })
            } else {
                Ok(left)
            }
        }
        Equals | NotEquals => Ok(Type::Bool),
        GreaterThan | GreaterThanOrEquals | LessThan | LessThanOrEquals => {
            if left != right {
                Err(different_types(op, &left, &right))
            } else if !matches!(left, Type::Int | Type::Float) {
                Err(LintError::NonNumbers {
                    op: op.name(),
                    ty: left.display_name(),
                })
            } else {
                Ok(Type::Bool)
            }
        }
        And | Or => {
            if left != right {
                Err(different_types(op, &left, &right))
            } else {
                Ok(right)
            }
        }
        In => match right {
            Type::List(Some(elem)) => {
                if left != *elem {
                    Err(LintError::DifferentTypes {
                        op: "in",
                        left: left.display_name(),
                        right: elem.display_name(),
                    })
                } else {
                    Ok(Type::Bool)
                }
            }
            Type::List(None) => Err(LintError::InUntypedList { ty: "list" }),
            other => Err(LintError::InNonList {
                ty: other.display_name(),
            }),
        },
    }
}

fn different_types(op: BinaryOp, left: &Type, right: &Type) -> LintError {
    LintError::DifferentTypes {
        op: op.name(),
        left: left.display_name(),
        right: right.display_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filterrules_lexer::lex;
    use filterrules_parser::parse;
    use pretty_assertions::assert_eq;

    fn lint_src(src: &[u8], schema: &Schema, untrusted: bool) -> Option<String> {
        let tokens = lex(src).unwrap();
        let expr = parse(&tokens).unwrap();
        lint(&expr, schema, untrusted)
    }

    fn test_schema() -> Schema {
        Schema::new()
            .with_variable("var", Type::Int)
            .with_variable("list", Type::List(None))
            .with_function("fn", vec![Type::Int], Type::Int)
    }

    #[test]
    fn add_different_types_errors() {
        let schema = test_schema();
        assert_eq!(
            lint_src(b"1 + 'test'", &schema, true),
            Some("cannot use add operator on different types: 'int' and 'bytes'".to_string())
        );
    }

    #[test]
    fn int_float_coercion_is_clean() {
        let schema = test_schema();
        assert_eq!(lint_src(b"1 + 1.0", &schema, true), None);
    }

    #[test]
    fn subtract_non_numbers_errors() {
        let schema = test_schema();
        assert_eq!(
            lint_src(b"'test' - 'test'", &schema, true),
            Some("cannot use subtract operator on non-numbers: 'bytes'".to_string())
        );
    }

    #[test]
    fn pow_rejected_when_untrusted() {
        let schema = test_schema();
        assert_eq!(
            lint_src(b"1 ** 1", &schema, true),
            Some("cannot use pow operator in untrusted code".to_string())
        );
        assert_eq!(lint_src(b"1 ** 1", &schema, false), None);
    }

    #[test]
    fn equals_never_type_checks() {
        let schema = test_schema();
        assert_eq!(lint_src(b"1 == 'test'", &schema, true), None);
    }

    #[test]
    fn unknown_variable_errors() {
        let schema = test_schema();
        assert_eq!(
            lint_src(b"test", &schema, true),
            Some("variable not found: 'test'".to_string())
        );
    }

    #[test]
    fn function_arg_count_mismatch() {
        let schema = test_schema();
        assert_eq!(
            lint_src(b"fn(1, 2)", &schema, true),
            Some(
                "function has incorrect amount of arguments, got 2, expected 1".to_string()
            )
        );
    }

    #[test]
    fn function_signature_mismatch() {
        let schema = test_schema();
        assert_eq!(
            lint_src(b"fn('test')", &schema, true),
            Some(
                "function has incorrect argument signature, got ('bytes',), expected ('int',)"
                    .to_string()
            )
        );
    }

    #[test]
    fn empty_array_has_no_determinable_type() {
        let schema = test_schema();
        assert_eq!(
            lint_src(b"[]", &schema, true),
            Some("unable to determine array type".to_string())
        );
    }

    #[test]
    fn in_operator_against_typed_list() {
        let schema = test_schema();
        assert_eq!(lint_src(b"var ~ [1, 2, 3]", &schema, true), None);
    }

    #[test]
    fn in_operator_element_type_mismatch() {
        let schema = test_schema();
        assert_eq!(
            lint_src(b"var ~ [1.0]", &schema, true),
            Some("cannot use in operator on different types: 'int' and 'float'".to_string())
        );
    }

    #[test]
    fn in_operator_on_non_list() {
        let schema = test_schema();
        assert_eq!(
            lint_src(b"var ~ var", &schema, true),
            Some("cannot use in operator on non-lists: 'int'".to_string())
        );
    }

    #[test]
    fn in_operator_on_untyped_list() {
        let schema = test_schema();
        assert_eq!(
            lint_src(b"var ~ list", &schema, true),
            Some("cannot use in operator on untyped lists: 'list'".to_string())
        );
    }

    #[test]
    fn comprehension_infers_element_result_type() {
        let schema = test_schema();
        assert_eq!(lint_src(b"{[1, 2, 3] == var}", &schema, true), None);
    }

    #[test]
    fn comprehension_over_empty_array_is_untyped() {
        let schema = test_schema();
        assert_eq!(
            lint_src(b"{[] == var}", &schema, true),
            Some("cannot use list comprehension on untyped lists".to_string())
        );
    }
}
