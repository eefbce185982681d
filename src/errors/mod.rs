//! Error types and error handling for the compiler.
//!
//! This module defines the error type used throughout the compilation
//! process. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for lexing, parsing and code generation
//! - Error names and suggestions for diagnostics

pub mod errors;
