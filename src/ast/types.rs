use std::fmt::Display;

use crate::lexer::tokens::TokenKind;

/// Static type of a badlang expression or declaration.
///
/// `Error` is what the checker assigns to an expression it already reported
/// a problem for. It unifies with every type so a single mistake does not
/// produce a chain of follow-up diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Int,
    Bool,
    Error,
}

impl VarType {
    pub fn from_token_kind(kind: TokenKind) -> Option<VarType> {
        match kind {
            TokenKind::Int => Some(VarType::Int),
            TokenKind::Bool => Some(VarType::Bool),
            _ => None,
        }
    }

    /// Type equality with `Error` acting as a wildcard.
    pub fn is_compatible_with(&self, other: &VarType) -> bool {
        *self == VarType::Error || *other == VarType::Error || self == other
    }

    pub fn get_name(&self) -> &'static str {
        match self {
            VarType::Int => "int",
            VarType::Bool => "bool",
            VarType::Error => "error",
        }
    }
}

impl Display for VarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_name())
    }
}
