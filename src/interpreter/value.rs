use std::fmt::Display;

use crate::ast::{expressions::Literal, types::VarType};

/// A runtime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    Bool(bool),
}

impl Value {
    pub fn get_type(&self) -> VarType {
        match self {
            Value::Int(_) => VarType::Int,
            Value::Bool(_) => VarType::Bool,
        }
    }

    /// The value an uninitialised variable of `var_type` starts with.
    pub fn zero(var_type: VarType) -> Value {
        match var_type {
            VarType::Bool => Value::Bool(false),
            VarType::Int | VarType::Error => Value::Int(0),
        }
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Int(value) => Value::Int(value),
            Literal::Bool(value) => Value::Bool(value),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Bool(value) => write!(f, "{}", value),
        }
    }
}
