/// A static type in the filterrules type lattice.
///
/// `List(None)` models a bare `list` schema declaration — a host variable
/// known only to be a list, with no promise about its element type. The
/// parser never produces it: every `ArrayConstructor` it builds infers a
/// concrete `List(Some(_))`. Only a [`crate::Schema`] entry can declare the
/// untyped form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    Bytes,
    Str,
    Bool,
    List(Option<Box<Type>>),
}

impl Type {
    /// The name used in error messages — matches the underlying runtime
    /// class name, so every `List(_)` reports as `list` regardless of its
    /// element type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Bytes => "bytes",
            Type::Str => "str",
            Type::Bool => "bool",
            Type::List(_) => "list",
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Formats a slice of types as a Python-tuple-style repr, e.g. `()`,
/// `('int',)`, `('int', 'bytes')` — matching the function-signature error
/// message contract.
pub fn format_type_tuple(types: &[Type]) -> String {
    if types.is_empty() {
        return "()".to_string();
    }
    let quoted: Vec<String> = types.iter().map(|t| format!("'{t}'")).collect();
    if quoted.len() == 1 {
        format!("({},)", quoted[0])
    } else {
        format!("({})", quoted.join(", "))
    }
}
