//! Type system definitions for the AST.
//!
//! The language has a closed set of value types. Each one owns a
//! verification rule (see `type_checker::verifier`) describing which
//! expressions may be assigned where a value of that type is required.

use std::fmt::Display;

/// The value types of the language.
///
/// `Void` doubles as "no constraint": it is the type of unannotated
/// variables and of functions without a declared return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Type {
    #[default]
    Void,
    Int32,
    String,
    Float32,
}

impl Type {
    /// Maps the literal of a `RawType` token to its type.
    ///
    /// Only `int32` and `string` can be written in source code.
    pub fn from_raw(literal: &str) -> Option<Type> {
        match literal {
            "int32" => Some(Type::Int32),
            "string" => Some(Type::String),
            _ => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Int32 => write!(f, "int32"),
            Type::String => write!(f, "string"),
            Type::Float32 => write!(f, "float32"),
        }
    }
}
