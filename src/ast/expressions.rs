use super::{
    ast::{Expression, Operator},
    types::Type,
};

/// A reference to a variable found in the variable table, with its type.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub var_type: Type,
}

/// A name that is not a known variable; only valid as a callee.
#[derive(Debug, Clone, PartialEq)]
pub struct UnboundedIdentifier {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral {
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatLiteral {
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpression {
    pub left: Box<Expression>,
    pub operator: Operator,
    pub right: Box<Expression>,
}

impl InfixExpression {
    pub fn new(left: Expression, operator: Operator, right: Expression) -> Self {
        InfixExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpression {
    pub operator: Operator,
    pub right: Box<Expression>,
}

impl PrefixExpression {
    pub fn new(operator: Operator, right: Expression) -> Self {
        PrefixExpression {
            operator,
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnCall {
    pub fn_name: String,
    pub params: Vec<Expression>,
}
