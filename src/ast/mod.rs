/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The program root and the statement/expression variants
/// - expressions: Definitions for the expression nodes
/// - statements: Definitions for the statement nodes
/// - types: The closed set of value types
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
