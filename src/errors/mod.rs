//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the compilation
//! process. It includes:
//!
//! - Front-end errors carrying the line and column of the offending token
//! - Type verification failures
//! - Lowering failures raised while building LLVM IR
//! - Error names and suggestions used by the diagnostic printer

pub mod errors;
