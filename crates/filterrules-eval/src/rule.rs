use filterrules_ast::Expr;
use tracing::trace;

use crate::bindings::Bindings;
use crate::error::EvalError;
use crate::eval::eval_expr;
use crate::policy::UntrustedPolicy;
use crate::value::Value;

/// A parsed expression paired with the trust level and resource policy it
/// evaluates under.
///
/// There is no `compile()` counterpart here — unlike a host language with
/// its own `eval()`, Rust has no portable way to turn an expression tree
/// into executable code at runtime, so [`Rule::evaluate`] is the only
/// execution path.
#[derive(Clone, Debug)]
pub struct Rule {
    expr: Expr,
    untrusted: bool,
    policy: UntrustedPolicy,
}

impl Rule {
    /// Untrusted by default, with the default [`UntrustedPolicy`] — the
    /// safe choice for a rule whose author isn't fully trusted.
    pub fn new(expr: Expr) -> Self {
        Self {
            expr,
            untrusted: true,
            policy: UntrustedPolicy::default(),
        }
    }

    /// Runs with no resource policy at all: `pow` is allowed and shifts are
    /// unbounded.
    pub fn trusted(expr: Expr) -> Self {
        Self {
            expr,
            untrusted: false,
            policy: UntrustedPolicy::default(),
        }
    }

    pub fn with_policy(expr: Expr, untrusted: bool, policy: UntrustedPolicy) -> Self {
        Self {
            expr,
            untrusted,
            policy,
        }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn is_untrusted(&self) -> bool {
        self.untrusted
    }

    pub fn evaluate(&self, bindings: &Bindings) -> Result<Value, EvalError> {
        trace!(untrusted = self.untrusted, "evaluating rule");
        eval_expr(&self.expr, bindings, &self.policy, self.untrusted)
    }
}
