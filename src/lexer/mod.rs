//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a lazy stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using regex patterns
//! - Recognition of keywords, raw types, identifiers and literals
//! - Line and column tracking for error reporting
//! - New lines as tokens, since they terminate statements

pub mod lexer;
pub mod tokens;
