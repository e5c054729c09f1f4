use rustc_hash::FxHashMap;

use crate::ty::Type;

/// The binding environment the linter checks a rule against: the declared
/// type of every variable the rule may read, and the signature (argument
/// types, return type) of every function it may call.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    pub variables: FxHashMap<String, Type>,
    pub functions: FxHashMap<String, (Vec<Type>, Type)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.variables.insert(name.into(), ty);
        self
    }

    pub fn with_function(
        mut self,
        name: impl Into<String>,
        args: Vec<Type>,
        returns: Type,
    ) -> Self {
        self.functions.insert(name.into(), (args, returns));
        self
    }
}
