//! Code generation module for the compiler.
//!
//! This module contains the MIPS code generator that transforms a checked
//! AST into assembly text for the SPIM simulator. It handles:
//!
//! - Compilation of expressions through a push/pop operand stack
//! - Stack frame layout for `main` and every top-level function
//! - Control flow labels and the calling convention
//! - Runtime traps for division by zero and missing returns

pub mod compiler;
pub mod expr;
pub mod frame;
pub mod stmt;
