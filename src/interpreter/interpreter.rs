use std::{collections::HashSet, io::Write};

use tracing::{debug, trace};

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

use super::value::Value;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

// Remaining stack below which evaluation continues on a fresh segment.
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Outcome of executing a statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    None,
    Return(Option<Value>),
}

pub struct Interpreter<'a, W: Write> {
    out: &'a mut W,
    environment: Environment<Value>,
    functions: FunctionTable<&'a FunctionDecl>,
    /// Top-level variables bound to zero whose declaration has not run yet
    pending_statics: HashSet<String>,
    call_depth: usize,
    max_call_depth: usize,
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Interpreter {
            out,
            environment: Environment::new(),
            functions: FunctionTable::new(),
            pending_statics: HashSet::new(),
            call_depth: 0,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Limits how deeply calls may nest before execution is aborted.
    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    /// Runs every top-level statement in order. The first runtime error
    /// aborts execution; output written before it stays written.
    pub fn interpret(&mut self, program: &'a Program) -> Result<(), Error> {
        for function in program.functions() {
            self.functions
                .declare_function(&function.name, function)
                .map_err(|error_impl| Error::on_line(error_impl, function.line))?;
        }

        // Top-level variables hold their zero value until their declaration runs.
        for stmt in program.iter() {
            if let Stmt::Var { name, var_type, .. } = stmt {
                if self.pending_statics.insert(name.clone()) {
                    self.environment
                        .declare_variable(name, Value::zero(*var_type))
                        .map_err(|error_impl| Error::on_line(error_impl, stmt.line()))?;
                }
            }
        }
        debug!(
            functions = self.functions.len(),
            statics = self.pending_statics.len(),
            "interpreting program"
        );

        for stmt in program.iter() {
            self.execute(stmt)?;
        }

        self.out.flush().map_err(|error| output_error(error, 0))
    }

    fn execute_block(&mut self, body: &[Stmt]) -> Result<Signal, Error> {
        for stmt in body {
            let signal = self.execute(stmt)?;
            if let Signal::Return(_) = signal {
                return Ok(signal);
            }
        }

        Ok(Signal::None)
    }

    /// Executes `stmt` in a scope of its own.
    fn execute_scoped(&mut self, stmt: &Stmt) -> Result<Signal, Error> {
        self.environment.enter_scope();
        let signal = self.execute(stmt);
        self.environment.exit_scope();
        signal
    }

    /// Executes one statement. User recursion is host recursion here, so
    /// the stack is grown on demand and only the call depth limit applies.
    pub fn execute(&mut self, stmt: &Stmt) -> Result<Signal, Error> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.execute_inner(stmt))
    }

    fn execute_inner(&mut self, stmt: &Stmt) -> Result<Signal, Error> {
        match stmt {
            Stmt::Block { body, .. } => {
                self.environment.enter_scope();
                let signal = self.execute_block(body);
                self.environment.exit_scope();
                signal
            }
            Stmt::Var {
                name,
                var_type,
                initializer,
                line,
            } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate_as(initializer, *var_type)?,
                    None => Value::zero(*var_type),
                };

                let result = if self.environment.is_global() && self.pending_statics.remove(name) {
                    self.environment.assign_variable(name, value)
                } else {
                    self.environment.declare_variable(name, value)
                };
                result.map_err(|error_impl| Error::on_line(error_impl, *line))?;
                Ok(Signal::None)
            }
            Stmt::Assign { name, value, line } => {
                let current = self.fetch_variable(name, *line)?;
                let value = self.evaluate_as(value, current.get_type())?;

                self.environment
                    .assign_variable(name, value)
                    .map_err(|error_impl| Error::on_line(error_impl, *line))?;
                Ok(Signal::None)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.evaluate_bool(condition)? {
                    self.execute_scoped(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_scoped(else_branch)
                } else {
                    Ok(Signal::None)
                }
            }
            Stmt::While {
                condition, body, ..
            } => {
                while self.evaluate_bool(condition)? {
                    let signal = self.execute_scoped(body)?;
                    if let Signal::Return(_) = signal {
                        return Ok(signal);
                    }
                }

                Ok(Signal::None)
            }
            Stmt::Return { value, line } => {
                if self.call_depth == 0 {
                    return Err(Error::on_line(ErrorImpl::ReturnOutsideFunction, *line));
                }

                let value = value
                    .as_ref()
                    .map(|value| self.evaluate(value))
                    .transpose()?;
                Ok(Signal::Return(value))
            }
            Stmt::Print { expression, line } => {
                let value = self.evaluate(expression)?;
                writeln!(self.out, "{}", value).map_err(|error| output_error(error, *line))?;
                Ok(Signal::None)
            }
            Stmt::Expression { expression, .. } => {
                self.evaluate(expression)?;
                Ok(Signal::None)
            }
            // Top-level functions are registered up front; nested ones are
            // never callable.
            Stmt::Function(_) => Ok(Signal::None),
        }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, Error> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.evaluate_inner(expr))
    }

    fn evaluate_inner(&mut self, expr: &Expr) -> Result<Value, Error> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(*value)),
            Expr::Variable { name, line } => self.fetch_variable(name, *line),
            Expr::Unary {
                operator, right, ..
            } => match operator {
                Operator::Not => Ok(Value::Bool(!self.evaluate_bool(right)?)),
                _ => Ok(Value::Int(self.evaluate_int(right)?.wrapping_neg())),
            },
            Expr::Binary {
                left,
                operator,
                right,
                line,
            } => self.evaluate_binary(left, *operator, right, *line),
            Expr::Call {
                name,
                arguments,
                line,
            } => self.call_function(name, arguments, *line),
        }
    }

    fn evaluate_binary(
        &mut self,
        left: &Expr,
        operator: Operator,
        right: &Expr,
        line: u32,
    ) -> Result<Value, Error> {
        match operator {
            Operator::Plus | Operator::Minus | Operator::Multiply | Operator::Divide => {
                let left = self.evaluate_int(left)?;
                let right = self.evaluate_int(right)?;

                let result = match operator {
                    Operator::Plus => left.wrapping_add(right),
                    Operator::Minus => left.wrapping_sub(right),
                    Operator::Multiply => left.wrapping_mul(right),
                    _ => {
                        if right == 0 {
                            return Err(Error::on_line(ErrorImpl::DivisionByZero, line));
                        }
                        left.wrapping_div(right)
                    }
                };
                Ok(Value::Int(result))
            }
            Operator::And | Operator::Or => {
                // Both operands are always evaluated.
                let left = self.evaluate_bool(left)?;
                let right = self.evaluate_bool(right)?;

                if operator == Operator::And {
                    Ok(Value::Bool(left && right))
                } else {
                    Ok(Value::Bool(left || right))
                }
            }
            Operator::Less | Operator::LessEqual | Operator::Greater | Operator::GreaterEqual => {
                let left = self.evaluate_int(left)?;
                let right = self.evaluate_int(right)?;

                let result = match operator {
                    Operator::Less => left < right,
                    Operator::LessEqual => left <= right,
                    Operator::Greater => left > right,
                    _ => left >= right,
                };
                Ok(Value::Bool(result))
            }
            Operator::Equal | Operator::NotEqual => {
                let left = self.evaluate(left)?;
                let right = self.evaluate_as(right, left.get_type())?;

                let equal = left == right;
                Ok(Value::Bool(if operator == Operator::Equal {
                    equal
                } else {
                    !equal
                }))
            }
            Operator::Not => Err(Error::on_line(
                ErrorImpl::UnexpectedToken {
                    token: operator.to_string(),
                },
                line,
            )),
        }
    }

    fn call_function(&mut self, name: &str, arguments: &[Expr], line: u32) -> Result<Value, Error> {
        let function: &'a FunctionDecl = *self.functions.get_function(name).ok_or_else(|| {
            Error::on_line(
                ErrorImpl::FunctionNotDeclared {
                    function: String::from(name),
                },
                line,
            )
        })?;

        if arguments.len() != function.parameters.len() {
            return Err(Error::on_line(
                ErrorImpl::ArgumentCount {
                    function: String::from(name),
                },
                line,
            ));
        }

        // Arguments are evaluated in the caller's scope.
        let mut values = Vec::with_capacity(arguments.len());
        for (argument, parameter) in arguments.iter().zip(&function.parameters) {
            values.push(self.evaluate_as(argument, parameter.var_type)?);
        }

        if self.call_depth >= self.max_call_depth {
            return Err(Error::on_line(
                ErrorImpl::CallDepthExceeded {
                    limit: self.max_call_depth,
                },
                line,
            ));
        }

        trace!(function = name, depth = self.call_depth + 1, "call");
        self.call_depth += 1;
        self.environment.enter_function_scope();

        let signal = function
            .parameters
            .iter()
            .zip(values)
            .try_for_each(|(parameter, value)| {
                self.environment
                    .declare_variable(&parameter.name, value)
                    .map_err(|error_impl| Error::on_line(error_impl, function.line))
            })
            .and_then(|_| self.execute_block(&function.body));

        self.environment.exit_scope();
        self.call_depth -= 1;

        match signal? {
            Signal::Return(Some(value)) if value.get_type() == function.return_type => Ok(value),
            Signal::Return(Some(value)) => Err(type_mismatch(
                function.return_type,
                value.get_type(),
                line,
            )),
            _ => Err(Error::on_line(
                ErrorImpl::MustReturnValue {
                    function: String::from(name),
                },
                line,
            )),
        }
    }

    fn fetch_variable(&self, name: &str, line: u32) -> Result<Value, Error> {
        self.environment.get_variable(name).copied().ok_or_else(|| {
            Error::on_line(
                ErrorImpl::VariableNotDeclared {
                    variable: String::from(name),
                },
                line,
            )
        })
    }

    /// Evaluates `expr` and asserts that the result has type `expected`.
    fn evaluate_as(&mut self, expr: &Expr, expected: VarType) -> Result<Value, Error> {
        let value = self.evaluate(expr)?;
        if value.get_type() != expected {
            return Err(type_mismatch(expected, value.get_type(), expr.line()));
        }

        Ok(value)
    }

    fn evaluate_int(&mut self, expr: &Expr) -> Result<i32, Error> {
        match self.evaluate_as(expr, VarType::Int)? {
            Value::Int(value) => Ok(value),
            other => Err(type_mismatch(VarType::Int, other.get_type(), expr.line())),
        }
    }

    fn evaluate_bool(&mut self, expr: &Expr) -> Result<bool, Error> {
        match self.evaluate_as(expr, VarType::Bool)? {
            Value::Bool(value) => Ok(value),
            other => Err(type_mismatch(VarType::Bool, other.get_type(), expr.line())),
        }
    }
}

fn type_mismatch(expected: VarType, received: VarType, line: u32) -> Error {
    Error::on_line(
        ErrorImpl::TypeMatchError {
            expected: expected.to_string(),
            received: received.to_string(),
        },
        line,
    )
}

fn output_error(error: std::io::Error, line: u32) -> Error {
    Error::on_line(
        ErrorImpl::OutputError {
            message: error.to_string(),
        },
        line,
    )
}
