//! Static checking module.
//!
//! This module validates a parsed program before it is run or compiled:
//!
//! - Verifying type correctness of expressions and statements
//! - Resolving variable and function references
//! - Checking call arity and argument types
//! - Managing block and function scopes
//! - Validating return statements against the enclosing function
//!
//! Every problem becomes a line-located diagnostic; checking continues after
//! each one and `error`-typed results keep a mistake from cascading.

pub mod type_checker;
