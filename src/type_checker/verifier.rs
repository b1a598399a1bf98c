use crate::{
    ast::{
        ast::{Expression, Operator},
        types::Type,
    },
    errors::errors::TypeError,
};

impl Type {
    /// Checks that `expression` may be used where a value of this type is
    /// required.
    ///
    /// `Void` accepts anything. `Float32` has no rule yet and rejects
    /// everything with the generic error.
    pub fn verify(&self, expression: &Expression) -> Result<(), TypeError> {
        match self {
            Type::Int32 => verify_int32(expression),
            Type::String => verify_string(expression),
            Type::Void => Ok(()),
            Type::Float32 => Err(TypeError::WrongTypeAssignment),
        }
    }
}

fn verify_int32(expression: &Expression) -> Result<(), TypeError> {
    match expression {
        Expression::IntegerLiteral(_) => Ok(()),
        Expression::Identifier(identifier) if identifier.var_type == Type::Int32 => Ok(()),
        Expression::Infix(infix) => {
            verify_int32(&infix.left)?;

            if !infix.operator.is_arithmetic() {
                return Err(TypeError::IllegalInfixOperator {
                    type_: Type::Int32,
                    allowed: "+ - * /",
                });
            }

            verify_int32(&infix.right)
        }
        Expression::Prefix(prefix) => {
            // Deny-list, unlike the allow-list used for infix operators.
            if matches!(
                prefix.operator,
                Operator::BitNot | Operator::Increment | Operator::Decrement
            ) {
                return Err(TypeError::IllegalPrefixOperator {
                    type_: Type::Int32,
                    disallowed: "~ ++ --",
                });
            }

            verify_int32(&prefix.right)
        }
        _ => Err(TypeError::WrongTypeAssignment),
    }
}

fn verify_string(expression: &Expression) -> Result<(), TypeError> {
    match expression {
        Expression::StringLiteral(_) => Ok(()),
        Expression::Identifier(identifier) if identifier.var_type == Type::String => Ok(()),
        Expression::Infix(infix) => {
            verify_string(&infix.left)?;

            if infix.operator != Operator::Plus {
                return Err(TypeError::IllegalInfixOperator {
                    type_: Type::String,
                    allowed: "+ (concatenation)",
                });
            }

            verify_string(&infix.right)
        }
        _ => Err(TypeError::WrongTypeAssignment),
    }
}
