//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into the program root. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Top-level units (function and global variable definitions)
//! - Statement parsing (variable definitions, blocks, control flow)
//! - Expression parsing (binary ops, assignment, function calls, literals)
//! - Type parsing for built-in, pointer and array types
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
