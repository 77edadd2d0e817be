//! Tree-walking interpreter module.
//!
//! Executes a checked program directly over the AST. Runtime values are
//! 32-bit integers and booleans, variables live in an `Environment<Value>`
//! and calls run in a fresh frame rooted at the global frame. Output goes to
//! any `std::io::Write` sink.

pub mod interpreter;
pub mod value;

#[cfg(test)]
mod tests;
