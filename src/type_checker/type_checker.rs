use tracing::debug;

use crate::{
    ast::{
        ast::Program,
        expressions::{Expr, Operator},
        statements::{FunctionDecl, Stmt},
        types::VarType,
    },
    environment::environment::{Environment, FunctionTable},
    errors::errors::{Error, ErrorImpl},
};

/// What the checker knows about a function once pass one has run.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub return_type: VarType,
    pub parameter_types: Vec<VarType>,
}

impl From<&FunctionDecl> for FunctionSignature {
    fn from(function: &FunctionDecl) -> Self {
        FunctionSignature {
            return_type: function.return_type,
            parameter_types: function.parameter_types(),
        }
    }
}

#[derive(Debug, Default)]
pub struct TypeChecker {
    pub environment: Environment<VarType>,
    pub functions: FunctionTable<FunctionSignature>,
    pub diagnostics: Vec<Error>,
    /// Number of function bodies currently being checked
    function_depth: usize,
    /// Declared return type of the innermost function being checked
    return_type: Option<VarType>,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error_impl: ErrorImpl, line: u32) {
        self.diagnostics.push(Error::on_line(error_impl, line));
    }

    /// Reports an operand whose type is not `expected`.
    fn expect_operand(&mut self, expected: VarType, received: VarType, line: u32) {
        if !received.is_compatible_with(&expected) {
            self.report(
                ErrorImpl::OperandTypeMatchError {
                    expected: expected.to_string(),
                    received: received.to_string(),
                },
                line,
            );
        }
    }

    fn fetch_variable_type(&mut self, name: &str, line: u32) -> VarType {
        match self.environment.get_variable(name) {
            Some(var_type) => *var_type,
            None => {
                self.report(
                    ErrorImpl::VariableNotDeclared {
                        variable: String::from(name),
                    },
                    line,
                );
                VarType::Error
            }
        }
    }

    fn declare_variable(&mut self, name: &str, var_type: VarType, line: u32) {
        if let Err(error_impl) = self.environment.declare_variable(name, var_type) {
            self.report(error_impl, line);
        }
    }

    fn check_condition(&mut self, condition: &Expr, line: u32) {
        let condition_type = type_check_expr(self, condition);
        if !condition_type.is_compatible_with(&VarType::Bool) {
            self.report(ErrorImpl::InvalidCondition, line);
        }
    }
}

pub fn type_check_expr(type_checker: &mut TypeChecker, ast: &Expr) -> VarType {
    match ast {
        Expr::Literal { value, .. } => value.get_type(),
        Expr::Variable { name, line } => type_checker.fetch_variable_type(name, *line),
        Expr::Unary {
            operator,
            right,
            line,
        } => {
            let operand_type = if *operator == Operator::Not {
                VarType::Bool
            } else {
                VarType::Int
            };

            let right_type = type_check_expr(type_checker, right);
            type_checker.expect_operand(operand_type, right_type, *line);
            operand_type
        }
        Expr::Binary {
            left,
            operator,
            right,
            line,
        } => {
            let left_type = type_check_expr(type_checker, left);
            let right_type = type_check_expr(type_checker, right);

            let (operand_type, result_type) = match operator {
                Operator::Plus | Operator::Minus | Operator::Multiply | Operator::Divide => {
                    (VarType::Int, VarType::Int)
                }
                Operator::And | Operator::Or => (VarType::Bool, VarType::Bool),
                Operator::Less
                | Operator::LessEqual
                | Operator::Greater
                | Operator::GreaterEqual => (VarType::Int, VarType::Bool),
                Operator::Equal | Operator::NotEqual => (left_type, VarType::Bool),
                Operator::Not => (VarType::Bool, VarType::Bool),
            };

            type_checker.expect_operand(operand_type, left_type, *line);
            type_checker.expect_operand(operand_type, right_type, *line);
            result_type
        }
        Expr::Call {
            name,
            arguments,
            line,
        } => {
            let argument_types: Vec<VarType> = arguments
                .iter()
                .map(|argument| type_check_expr(type_checker, argument))
                .collect();

            let Some(signature) = type_checker.functions.get_function(name).cloned() else {
                type_checker.report(
                    ErrorImpl::FunctionNotDeclared {
                        function: name.clone(),
                    },
                    *line,
                );
                return VarType::Error;
            };

            if argument_types.len() != signature.parameter_types.len() {
                type_checker.report(
                    ErrorImpl::UnexpectedArguments {
                        expected: signature.parameter_types.len(),
                        received: argument_types.len(),
                    },
                    *line,
                );
            } else {
                for (expected, received) in signature.parameter_types.iter().zip(argument_types) {
                    if !received.is_compatible_with(expected) {
                        type_checker.report(
                            ErrorImpl::ArgumentTypeMatchError {
                                expected: expected.to_string(),
                                received: received.to_string(),
                            },
                            *line,
                        );
                    }
                }
            }

            signature.return_type
        }
    }
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, ast: &Stmt) {
    match ast {
        Stmt::Block { body, .. } => {
            type_checker.environment.enter_scope();
            for stmt in body {
                type_check_stmt(type_checker, stmt);
            }
            type_checker.environment.exit_scope();
        }
        Stmt::Var {
            name,
            var_type,
            initializer,
            line,
        } => {
            if let Some(initializer) = initializer {
                let actual_type = type_check_expr(type_checker, initializer);
                if !actual_type.is_compatible_with(var_type) {
                    type_checker.report(
                        ErrorImpl::VariableTypeMatchError {
                            expected: var_type.to_string(),
                            received: actual_type.to_string(),
                        },
                        *line,
                    );
                }
            }

            type_checker.declare_variable(name, *var_type, *line);
        }
        Stmt::Assign { name, value, line } => {
            let value_type = type_check_expr(type_checker, value);
            let variable_type = type_checker.fetch_variable_type(name, *line);

            if !value_type.is_compatible_with(&variable_type) {
                type_checker.report(
                    ErrorImpl::AssignmentTypeMatchError {
                        expected: variable_type.to_string(),
                        received: value_type.to_string(),
                    },
                    *line,
                );
            }
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
            line,
        } => {
            type_checker.check_condition(condition, *line);

            type_checker.environment.enter_scope();
            type_check_stmt(type_checker, then_branch);
            type_checker.environment.exit_scope();

            if let Some(else_branch) = else_branch {
                type_checker.environment.enter_scope();
                type_check_stmt(type_checker, else_branch);
                type_checker.environment.exit_scope();
            }
        }
        Stmt::While {
            condition,
            body,
            line,
        } => {
            type_checker.check_condition(condition, *line);

            type_checker.environment.enter_scope();
            type_check_stmt(type_checker, body);
            type_checker.environment.exit_scope();
        }
        Stmt::Return { value, line } => {
            let value_type = value
                .as_ref()
                .map(|value| type_check_expr(type_checker, value));

            match (type_checker.return_type, value_type) {
                (None, _) => type_checker.report(ErrorImpl::ReturnOutsideFunction, *line),
                (Some(expected), None) => type_checker.report(
                    ErrorImpl::MissingReturnValue {
                        expected: expected.to_string(),
                    },
                    *line,
                ),
                (Some(expected), Some(received)) => {
                    if !received.is_compatible_with(&expected) {
                        type_checker.report(
                            ErrorImpl::ReturnTypeMatchError {
                                expected: expected.to_string(),
                                received: received.to_string(),
                            },
                            *line,
                        );
                    }
                }
            }
        }
        Stmt::Print { expression, .. } | Stmt::Expression { expression, .. } => {
            type_check_expr(type_checker, expression);
        }
        Stmt::Function(function) => type_check_function(type_checker, function),
    }
}

fn type_check_function(type_checker: &mut TypeChecker, function: &FunctionDecl) {
    if type_checker.function_depth > 0 {
        type_checker.report(ErrorImpl::NestedFunction, function.line);
    }

    let enclosing_return_type = type_checker.return_type.replace(function.return_type);
    type_checker.function_depth += 1;
    type_checker.environment.enter_function_scope();

    for parameter in &function.parameters {
        type_checker.declare_variable(&parameter.name, parameter.var_type, function.line);
    }
    for stmt in &function.body {
        type_check_stmt(type_checker, stmt);
    }

    type_checker.environment.exit_scope();
    type_checker.function_depth -= 1;
    type_checker.return_type = enclosing_return_type;
}

/// Checks a whole program and returns its diagnostics in discovery order.
///
/// Pass one registers every top-level function so calls may precede their
/// declaration. Pass two walks every statement.
pub fn check(program: &Program) -> Vec<Error> {
    let mut type_checker = TypeChecker::new();

    for function in program.functions() {
        if let Err(error_impl) = type_checker
            .functions
            .declare_function(&function.name, FunctionSignature::from(function))
        {
            type_checker.report(error_impl, function.line);
        }
    }

    for stmt in program.iter() {
        type_check_stmt(&mut type_checker, stmt);
    }

    debug!(
        functions = type_checker.functions.len(),
        diagnostics = type_checker.diagnostics.len(),
        "checked program"
    );
    type_checker.diagnostics
}
