use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A located failure from any stage of the pipeline.
///
/// Lexer and parser errors always know their column; checker diagnostics and
/// runtime errors only carry the line they originate from.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    line: u32,
    column: Option<u32>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            line: position.line,
            column: Some(position.column),
        }
    }

    pub fn on_line(error_impl: ErrorImpl, line: u32) -> Self {
        Error {
            internal_error: error_impl,
            line,
            column: None,
        }
    }

    pub fn get_line(&self) -> u32 {
        self.line
    }

    pub fn get_column(&self) -> Option<u32> {
        self.column
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenInExpression { .. } => "UnexpectedTokenInExpression",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::FunctionNotDeclared { .. } => "FunctionNotDeclared",
            ErrorImpl::NestedFunction => "NestedFunction",
            ErrorImpl::InvalidCondition => "InvalidCondition",
            ErrorImpl::VariableTypeMatchError { .. } => "VariableTypeMatchError",
            ErrorImpl::AssignmentTypeMatchError { .. } => "AssignmentTypeMatchError",
            ErrorImpl::OperandTypeMatchError { .. } => "OperandTypeMatchError",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
            ErrorImpl::MissingReturnValue { .. } => "MissingReturnValue",
            ErrorImpl::ReturnTypeMatchError { .. } => "ReturnTypeMatchError",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::ArgumentCount { .. } => "ArgumentCount",
            ErrorImpl::MustReturnValue { .. } => "MustReturnValue",
            ErrorImpl::CallDepthExceeded { .. } => "CallDepthExceeded",
            ErrorImpl::OutputError { .. } => "OutputError",
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.column {
            Some(column) => write!(
                f,
                "Line: {} Column: {}: {}",
                self.line, column, self.internal_error
            ),
            None => write!(f, "Line: {}: {}", self.line, self.internal_error),
        }
    }
}

impl std::error::Error for Error {}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexing and parsing
    #[error("Unknown token '{token}'")]
    UnrecognisedToken { token: String },
    #[error("Unexpected token '{token}'")]
    UnexpectedToken { token: String },
    #[error("Unexpected token in expression '{token}'")]
    UnexpectedTokenInExpression { token: String },
    #[error("{message}")]
    ExpectedToken { message: String },
    #[error("Invalid integer literal '{token}'")]
    NumberParseError { token: String },

    // Names
    #[error("Variable '{variable}' is already defined in this scope.")]
    VariableAlreadyDeclared { variable: String },
    #[error("Undefined variable '{variable}'.")]
    VariableNotDeclared { variable: String },
    #[error("Function '{function}' is already defined")]
    FunctionAlreadyDeclared { function: String },
    #[error("Unknown Function '{function}'")]
    FunctionNotDeclared { function: String },
    #[error("Functions cannot be nested.")]
    NestedFunction,

    // Static typing
    #[error("Invalid condition, doesn't evaluate to type 'bool'")]
    InvalidCondition,
    #[error("Wrong variable type, expected '{expected}', found type '{received}'")]
    VariableTypeMatchError { expected: String, received: String },
    #[error("Invalid assignment, expected type '{expected}', found '{received}'")]
    AssignmentTypeMatchError { expected: String, received: String },
    #[error("Invalid operand type, expected '{expected}', found '{received}'")]
    OperandTypeMatchError { expected: String, received: String },
    #[error("Invalid function parameter, expected type '{expected}', found type '{received}'")]
    ArgumentTypeMatchError { expected: String, received: String },
    #[error("Invalid function call, expected {expected} parameters, found {received}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("Invalid return statement, not in function")]
    ReturnOutsideFunction,
    #[error("Invalid return: missing value of type '{expected}'")]
    MissingReturnValue { expected: String },
    #[error("Invalid return type, expected type '{expected}', found type '{received}'")]
    ReturnTypeMatchError { expected: String, received: String },

    // Runtime
    #[error("Expected variable of type '{expected}' but found type '{received}'")]
    TypeMatchError { expected: String, received: String },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Invalid arg count for function '{function}'")]
    ArgumentCount { function: String },
    #[error("Function '{function}' must return a value")]
    MustReturnValue { function: String },
    #[error("Maximum call depth of {limit} exceeded")]
    CallDepthExceeded { limit: usize },
    #[error("Failed to write program output: {message}")]
    OutputError { message: String },
}
