use super::{expressions::Expr, types::VarType};

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub var_type: VarType,
}

/// A function declaration. Kept as its own struct so the function tables can
/// hold references to it.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: VarType,
    pub parameters: Vec<Parameter>,
    pub body: Vec<Stmt>,
    pub line: u32,
}

impl FunctionDecl {
    pub fn parameter_types(&self) -> Vec<VarType> {
        self.parameters.iter().map(|p| p.var_type).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block {
        body: Vec<Stmt>,
        line: u32,
    },
    Var {
        name: String,
        var_type: VarType,
        initializer: Option<Expr>,
        line: u32,
    },
    Assign {
        name: String,
        value: Expr,
        line: u32,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        line: u32,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        line: u32,
    },
    Return {
        value: Option<Expr>,
        line: u32,
    },
    Print {
        expression: Expr,
        line: u32,
    },
    Expression {
        expression: Expr,
        line: u32,
    },
    Function(FunctionDecl),
}

impl Stmt {
    pub fn line(&self) -> u32 {
        match self {
            Stmt::Block { line, .. }
            | Stmt::Var { line, .. }
            | Stmt::Assign { line, .. }
            | Stmt::If { line, .. }
            | Stmt::While { line, .. }
            | Stmt::Return { line, .. }
            | Stmt::Print { line, .. }
            | Stmt::Expression { line, .. } => *line,
            Stmt::Function(function) => function.line,
        }
    }
}
