//! Code generation module for the compiler.
//!
//! This module contains the LLVM-based lowering pass that transforms the
//! parsed AST into LLVM IR. It handles:
//!
//! - Compilation of expressions and statements
//! - Type conversion from AST types to LLVM types
//! - Global variables and their initializer
//! - Function code generation with per-function local storage

pub mod compiler;
pub mod expr;
pub mod stmt;

#[cfg(test)]
mod tests;
