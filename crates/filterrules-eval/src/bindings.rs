use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::EvalError;
use crate::value::Value;

/// A host function callable from a rule. Returning `Err` aborts evaluation
/// with [`EvalError::HostFunction`].
pub type HostFunction = Arc<dyn Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync>;

/// The runtime environment a rule evaluates against: the value of every
/// variable it may read, and the host function behind every name it may
/// call.
#[derive(Clone, Default)]
pub struct Bindings {
    pub variables: FxHashMap<String, Value>,
    pub functions: FxHashMap<String, HostFunction>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    pub fn with_function<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(f));
        self
    }
}
