use std::fmt::{self, Display};

use crate::backend::ir::IRSize;

// The closed set of types a source type name can resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int,
    String,
    Void,
}

impl Type {
    /// Maps a source type name to its type, None for unknown names
    pub fn resolve(name: &str) -> Option<Type> {
        match name {
            "int" => Some(Type::Int),
            "string" => Some(Type::String),
            "void" => Some(Type::Void),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        *self == Type::Void
    }

    pub fn irsize(&self) -> IRSize {
        match self {
            Type::Int => IRSize::S32,
            Type::String => IRSize::P,
            Type::Void => IRSize::V,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::String => write!(f, "string"),
            Type::Void => write!(f, "void"),
        }
    }
}

/// The resolved signature of a function.
/// Parameters are stored in declaration order, which is also the calling order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub return_type: Type,
    pub parameters: Vec<(String, Type)>,
}

impl FunctionSignature {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    // Parameter names do not take part in the comparison
    pub fn same_types(&self, other: &FunctionSignature) -> bool {
        self.return_type == other.return_type
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(other.parameters.iter())
                .all(|((_, left), (_, right))| left == right)
    }
}

impl Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, (name, typ)) in self.parameters.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, typ)?;
        }
        write!(f, "): {}", self.return_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_type_names() {
        assert_eq!(Type::resolve("int"), Some(Type::Int));
        assert_eq!(Type::resolve("string"), Some(Type::String));
        assert_eq!(Type::resolve("void"), Some(Type::Void));
        assert_eq!(Type::resolve("float"), None);
        assert_eq!(Type::resolve("Int"), None);
    }

    #[test]
    fn signature_comparison_ignores_names() {
        let first = FunctionSignature {
            name: "f".to_string(),
            return_type: Type::Int,
            parameters: vec![("a".to_string(), Type::Int), ("b".to_string(), Type::String)],
        };
        let mut second = first.clone();
        second.parameters[0].0 = "x".to_string();
        assert!(first.same_types(&second));
        second.parameters.swap(0, 1);
        assert!(!first.same_types(&second));
        assert_eq!(first.to_string(), "f(a: int, b: string): int");
    }
}
