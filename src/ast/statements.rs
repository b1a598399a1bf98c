use super::{
    ast::{Expression, Statement},
    types::Type,
};

/// `var name[: type] = value`
///
/// `var_type` is `Void` when no annotation was written.
#[derive(Debug, Clone, PartialEq)]
pub struct VarStatement {
    pub name: String,
    pub var_type: Type,
    pub value: Expression,
}

/// `name = value` on a variable that already exists. The type is the one
/// the variable was declared with.
#[derive(Debug, Clone, PartialEq)]
pub struct ReassignVarStatement {
    pub var_name: String,
    pub var_type: Type,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub arg_type: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnStatement {
    pub name: String,
    pub args: Vec<Argument>,
    pub return_type: Type,
    pub body: Vec<Statement>,
}

impl FnStatement {
    pub fn arg_types(&self) -> Vec<Type> {
        self.args.iter().map(|arg| arg.arg_type).collect()
    }
}

/// `return value`, typed with the enclosing function's return type.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub return_type: Type,
    pub value: Expression,
}
