use std::slice::Iter;

use super::statements::{FunctionDecl, Stmt};

/// A parsed compilation unit: the top-level statement list in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Program { body }
    }

    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }

    /// Top-level function declarations, in source order. Functions declared
    /// anywhere else are never callable.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.body.iter().filter_map(|stmt| match stmt {
            Stmt::Function(function) => Some(function),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
