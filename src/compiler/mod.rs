//! Code generation module for the compiler.
//!
//! This module contains the LLVM-based code generator that checks the AST
//! and lowers it to LLVM IR in a single pass. It handles:
//!
//! - Resolution of source types to LLVM types
//! - Lexical scopes and the active function context
//! - Compilation of statements and expressions (lvalues and rvalues)
//! - Built-in I/O helpers
//! - Object file emission and JIT execution of `main`

pub mod cast;
pub mod compiler;
pub mod emit;
pub mod expr;
pub mod function;
pub mod io;
pub mod scope;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
