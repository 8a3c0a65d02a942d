// File: src/lib.rs
//
// Library interface for the Slate interpreter.
// Exposes the pipeline stages for integration testing and external use.

pub mod analyzer;
pub mod ast;
pub mod errors;
pub mod executor;
pub mod lexer;
pub mod parser;
