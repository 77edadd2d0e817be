//! Error types and error handling for the compiler.
//!
//! This module defines the single error type used throughout the pipeline.
//! It includes:
//!
//! - An error structure carrying the source line (and column when known)
//! - Specific error variants for lexing, parsing, checking and running
//! - The `Line: <n> Column: <c>: <message>` rendering used for diagnostics

pub mod errors;
