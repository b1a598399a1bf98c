use std::fmt::Display;

use crate::lexer::tokens::TokenKind;

use super::{
    expressions::{
        FloatLiteral, FnCall, Identifier, InfixExpression, IntegerLiteral, PrefixExpression,
        StringLiteral, UnboundedIdentifier,
    },
    statements::{FnStatement, ReassignVarStatement, ReturnStatement, VarStatement},
};

/// The root of a parsed compilation unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// Statement variants
///
/// Every pass matches on this exhaustively; adding a statement kind means
/// extending every match site.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Var(VarStatement),
    ReassignVar(ReassignVarStatement),
    Fn(FnStatement),
    Return(ReturnStatement),
    /// A function call used on its own, e.g. `greet("a");`
    Expression(Expression),
}

/// Expression variants
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    UnboundedIdentifier(UnboundedIdentifier),
    IntegerLiteral(IntegerLiteral),
    FloatLiteral(FloatLiteral),
    StringLiteral(StringLiteral),
    Infix(InfixExpression),
    Prefix(PrefixExpression),
    FnCall(FnCall),
}

impl Expression {
    pub fn get_expr_name(&self) -> &'static str {
        match self {
            Expression::Identifier(_) => "Identifier",
            Expression::UnboundedIdentifier(_) => "UnboundedIdentifier",
            Expression::IntegerLiteral(_) => "IntegerLiteral",
            Expression::FloatLiteral(_) => "FloatLiteral",
            Expression::StringLiteral(_) => "StringLiteral",
            Expression::Infix(_) => "InfixExpression",
            Expression::Prefix(_) => "PrefixExpression",
            Expression::FnCall(_) => "FnCall",
        }
    }
}

/// Operators usable in infix or prefix position.
///
/// `~`, `++` and `--` are tokenized but never produced by the parser; they
/// exist so the verifier can reject them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
    Divide,
    BitNot,
    Increment,
    Decrement,
}

impl Operator {
    pub fn from_token_kind(kind: TokenKind) -> Option<Operator> {
        match kind {
            TokenKind::Plus => Some(Operator::Plus),
            TokenKind::Dash => Some(Operator::Minus),
            TokenKind::Star => Some(Operator::Multiply),
            TokenKind::Slash => Some(Operator::Divide),
            TokenKind::Tilde => Some(Operator::BitNot),
            TokenKind::PlusPlus => Some(Operator::Increment),
            TokenKind::MinusMinus => Some(Operator::Decrement),
            _ => None,
        }
    }

    /// `+ - * /`
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Operator::Plus | Operator::Minus | Operator::Multiply | Operator::Divide
        )
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::BitNot => "~",
            Operator::Increment => "++",
            Operator::Decrement => "--",
        };

        write!(f, "{}", symbol)
    }
}
