use std::fmt::Display;

use inkwell::builder::BuilderError;
use thiserror::Error;

use crate::{ast::types::Type, lexer::tokens::TokenKind, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::ExpectedEndOfStatement { .. } => "ExpectedEndOfStatement",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::TypeVerification { .. } => "TypeVerification",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::FunctionAlreadyDefined { .. } => "FunctionAlreadyDefined",
            ErrorImpl::FunctionNotDefined { .. } => "FunctionNotDefined",
            ErrorImpl::NotCallable => "NotCallable",
            ErrorImpl::ArgumentCountMismatch { .. } => "ArgumentCountMismatch",
            ErrorImpl::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            ErrorImpl::MissingReturn { .. } => "MissingReturn",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { .. } => ErrorTip::None,
            ErrorImpl::ExpectedToken { expected, received } => ErrorTip::Suggestion(format!(
                "Expected `{}` but found `{}`",
                expected, received
            )),
            ErrorImpl::ExpectedEndOfStatement { after } => ErrorTip::Suggestion(format!(
                "Expected `;` or a new line after `{}`",
                after
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnknownType { type_ } => ErrorTip::Suggestion(format!(
                "Unknown type `{}`, expected `int32` or `string`",
                type_
            )),
            ErrorImpl::TypeVerification { .. } => ErrorTip::None,
            ErrorImpl::VariableNotDeclared { variable } => ErrorTip::Suggestion(format!(
                "Declare it first with `var {} = ...`",
                variable
            )),
            ErrorImpl::FunctionAlreadyDefined { function } => ErrorTip::Suggestion(format!(
                "Function `{}` already has a body",
                function
            )),
            ErrorImpl::FunctionNotDefined { function } => ErrorTip::Suggestion(format!(
                "Function `{}` is called but never defined",
                function
            )),
            ErrorImpl::NotCallable => ErrorTip::Suggestion(String::from(
                "Only functions referenced by name can be called",
            )),
            ErrorImpl::ArgumentCountMismatch { expected, received, .. } => {
                ErrorTip::Suggestion(format!(
                    "Expected {} arguments, received {}",
                    expected, received
                ))
            }
            ErrorImpl::ArgumentTypeMismatch { expected, .. } => {
                ErrorTip::Suggestion(format!("Expected an argument of type `{}`", expected))
            }
            ErrorImpl::MissingReturn { return_type, .. } => ErrorTip::Suggestion(format!(
                "End the body with `return <{}>;`",
                return_type
            )),
            ErrorImpl::ReturnTypeMismatch { expected, received, .. } => {
                ErrorTip::Suggestion(format!(
                    "Expected return type `{}`, received `{}`",
                    expected, received
                ))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Error at line {}, column {}: {}",
            self.position.line, self.position.column, self.internal_error
        )
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.internal_error)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("expected: {expected}, got: {received}")]
    ExpectedToken {
        expected: TokenKind,
        received: TokenKind,
    },
    #[error("after {after:?}: expected end of statement or new line")]
    ExpectedEndOfStatement { after: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unknown type {type_:?}")]
    UnknownType { type_: String },
    #[error("verifying expression: {source}")]
    TypeVerification {
        #[from]
        source: TypeError,
    },
    #[error("variable {variable:?} undefined")]
    VariableNotDeclared { variable: String },
    #[error("function {function:?} already defined")]
    FunctionAlreadyDefined { function: String },
    #[error("function {function:?} is never defined")]
    FunctionNotDefined { function: String },
    #[error("expected function identifier")]
    NotCallable,
    #[error("function {function:?} expects {expected} arguments, received {received}")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("wrong parameter type for argument {index} of {function:?}: {source}")]
    ArgumentTypeMismatch {
        function: String,
        index: usize,
        expected: Type,
        source: TypeError,
    },
    #[error("function {function:?} must have a return")]
    MissingReturn { function: String, return_type: Type },
    #[error("function {function:?} expected return type {expected}, received {received}")]
    ReturnTypeMismatch {
        function: String,
        expected: Type,
        received: Type,
    },
}

/// Failures of the type verifier, before a position is attached.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("wrong type assignment")]
    WrongTypeAssignment,
    #[error("{type_} allowed infix operators: {allowed}")]
    IllegalInfixOperator { type_: Type, allowed: &'static str },
    #[error("{type_} disallowed prefix operators: {disallowed}")]
    IllegalPrefixOperator {
        type_: Type,
        disallowed: &'static str,
    },
}

/// Failures while lowering a parsed program into LLVM IR.
#[derive(Error, Debug)]
pub enum LoweringError {
    #[error("llvm builder error: {0}")]
    Builder(#[from] BuilderError),
    #[error("failed to initialise the native target: {0}")]
    Target(String),
    #[error("function {function:?} is declared inside {outer:?}, nested functions cannot be lowered")]
    NestedFunction { function: String, outer: String },
    #[error("return statement outside of a function")]
    ReturnOutsideFunction,
    #[error("no storage found for {name:?} in {scope}")]
    UnresolvedStorage { name: String, scope: String },
    #[error("function {function:?} was not declared in the module")]
    UnknownFunction { function: String },
    #[error("{name:?} holds a value of type {expected}, cannot store a {received}")]
    StorageTypeMismatch {
        name: String,
        expected: String,
        received: String,
    },
    #[error("call to {function:?} produces no value")]
    VoidValue { function: String },
    #[error("operands of {operator} have different representations: {left} and {right}")]
    MismatchedOperands {
        operator: String,
        left: String,
        right: String,
    },
    #[error("{0} is not supported by the backend yet")]
    Unsupported(String),
    #[error("generated module is invalid: {0}")]
    InvalidModule(String),
    #[error("failed to write {path}: {message}")]
    Output { path: String, message: String },
}
