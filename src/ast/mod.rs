/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Statement and unit sum types, and the program root
/// - expressions: Expression nodes and binary operators
/// - statements: Node structs for each statement kind
/// - types: Syntactic type descriptors
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
