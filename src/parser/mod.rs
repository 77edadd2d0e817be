//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a Program. It handles:
//!
//! - Statement parsing (declarations, functions, control flow)
//! - Expression parsing over bounded token ranges with operator precedence
//! - Error reporting at the offending token
//!
//! Statements dispatch through a lookup table keyed by their leading token.
//! Expressions split at the lowest-precedence operator outside parentheses.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
