use std::fmt::Display;

use crate::lexer::tokens::TokenKind;

use super::types::VarType;

/// A literal as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Int(i32),
    Bool(bool),
}

impl Literal {
    pub fn get_type(&self) -> VarType {
        match self {
            Literal::Int(_) => VarType::Int,
            Literal::Bool(_) => VarType::Bool,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Int(value) => write!(f, "{}", value),
            Literal::Bool(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Arithmetic
    Plus,
    Minus,
    Multiply,
    Divide,

    // Logical
    And,
    Or,
    Not,

    // Equality and relational
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl Operator {
    pub fn from_token_kind(kind: TokenKind) -> Option<Operator> {
        match kind {
            TokenKind::Plus => Some(Operator::Plus),
            TokenKind::Dash => Some(Operator::Minus),
            TokenKind::Star => Some(Operator::Multiply),
            TokenKind::Slash => Some(Operator::Divide),
            TokenKind::And => Some(Operator::And),
            TokenKind::Or => Some(Operator::Or),
            TokenKind::Not => Some(Operator::Not),
            TokenKind::Equals => Some(Operator::Equal),
            TokenKind::NotEquals => Some(Operator::NotEqual),
            TokenKind::Less => Some(Operator::Less),
            TokenKind::LessEquals => Some(Operator::LessEqual),
            TokenKind::Greater => Some(Operator::Greater),
            TokenKind::GreaterEquals => Some(Operator::GreaterEqual),
            _ => None,
        }
    }

    pub fn get_symbol(&self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Not => "!",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_symbol())
    }
}

/// Expression node. Every variant records the source line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary {
        left: Box<Expr>,
        operator: Operator,
        right: Box<Expr>,
        line: u32,
    },
    Literal {
        value: Literal,
        line: u32,
    },
    Unary {
        operator: Operator,
        right: Box<Expr>,
        line: u32,
    },
    Variable {
        name: String,
        line: u32,
    },
    Call {
        name: String,
        arguments: Vec<Expr>,
        line: u32,
    },
}

impl Expr {
    pub fn line(&self) -> u32 {
        match self {
            Expr::Binary { line, .. }
            | Expr::Literal { line, .. }
            | Expr::Unary { line, .. }
            | Expr::Variable { line, .. }
            | Expr::Call { line, .. } => *line,
        }
    }
}

/// Compact prefix rendering, e.g. `+(1, *(2, 3))`. Used by tests to compare
/// tree shapes.
impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Binary {
                left,
                operator,
                right,
                ..
            } => write!(f, "{}({}, {})", operator, left, right),
            Expr::Literal { value, .. } => write!(f, "{}", value),
            Expr::Unary {
                operator, right, ..
            } => write!(f, "{}({})", operator, right),
            Expr::Variable { name, .. } => write!(f, "{}", name),
            Expr::Call {
                name, arguments, ..
            } => {
                write!(f, "{}(", name)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
        }
    }
}
