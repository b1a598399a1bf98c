//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Statement parsing (variable declarations, reassignments, functions,
//!   returns and call statements)
//! - Expression parsing (infix and prefix ops, function calls, literals)
//! - Type annotations
//! - Name resolution, including calls to functions declared later
//!
//! Every expression is verified against the type its context expects as
//! soon as it is parsed. The first error stops the parse.
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod resolver;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
