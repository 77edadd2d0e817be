#![allow(clippy::module_inception)]

use std::io::Write;

use tracing::debug;

use crate::{
    ast::ast::Program,
    compiler::compiler::Compiler,
    errors::errors::Error,
    interpreter::interpreter::Interpreter,
    lexer::tokens::Token,
};

pub mod ast;
pub mod compiler;
pub mod environment;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// A location in the source text. Both fields are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    lexer::lexer::tokenize(source)
}

/// Lexes and parses `source`, failing on the first error.
pub fn parse(source: &str) -> Result<Program, Error> {
    let tokens = tokenize(source)?;
    parser::parser::parse(tokens)
}

/// Runs the static checker and returns every diagnostic found.
pub fn check(program: &Program) -> Vec<Error> {
    type_checker::type_checker::check(program)
}

/// Interprets a checked program, writing its output to `out`.
pub fn interpret<W: Write>(program: &Program, out: &mut W) -> Result<(), Error> {
    Interpreter::new(out).interpret(program)
}

/// Generates MIPS assembly for a checked program.
pub fn generate(program: &Program) -> Result<String, Error> {
    Compiler::new().compile(program)
}

fn parse_and_check(source: &str) -> Result<Program, Vec<Error>> {
    let program = parse(source).map_err(|error| vec![error])?;

    let diagnostics = check(&program);
    if !diagnostics.is_empty() {
        debug!(diagnostics = diagnostics.len(), "refusing to continue");
        return Err(diagnostics);
    }

    Ok(program)
}

/// Parses, checks and interprets `source`. Nothing runs if any diagnostic is
/// reported.
pub fn run<W: Write>(source: &str, out: &mut W) -> Result<(), Vec<Error>> {
    let program = parse_and_check(source)?;
    interpret(&program, out).map_err(|error| vec![error])
}

/// Parses, checks and compiles `source` to assembly text.
pub fn compile(source: &str) -> Result<String, Vec<Error>> {
    let program = parse_and_check(source)?;
    generate(&program).map_err(|error| vec![error])
}

/// Returns the 1-based `line` of `source`, if it exists.
pub fn get_line(source: &str, line: u32) -> Option<&str> {
    let index = (line as usize).checked_sub(1)?;
    source.lines().nth(index)
}

/// Renders an error with the offending source line underneath it.
///
/// ```text
/// Error: UnexpectedToken (Line: 3 Column: 10: Unexpected token ';')
/// -> main.bad
///    |
///  3 | print 1 +;
///    |          ^
/// ```
pub fn display_error(error: &Error, source: &str, file: &str) -> String {
    let line_string = error.get_line().to_string();
    let padding = line_string.len() + 2;

    let mut rendered = format!("Error: {} ({})\n", error.get_error_name(), error);
    rendered.push_str(&format!("-> {}\n", file));

    let Some(line_text) = get_line(source, error.get_line()) else {
        return rendered;
    };

    let (trimmed, removed_whitespace) = remove_starting_whitespace(line_text);
    rendered.push_str(&format!("{:>padding$}\n", "|"));
    rendered.push_str(&format!("{} | {}\n", line_string, trimmed.trim_end()));

    if let Some(column) = error.get_column() {
        let arrows = (column as usize).saturating_sub(removed_whitespace).max(1);
        rendered.push_str(&format!("{:>padding$} {:>arrows$}\n", "|", "^"));
    }

    rendered
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let trimmed = string.trim_start_matches(&[' ', '\t'][..]);
    (trimmed, string.len() - trimmed.len())
}
