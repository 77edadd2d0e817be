//! Unit tests for the interpreter.
//!
//! Programs here are parsed but deliberately not checked, so runtime
//! failures the checker would normally rule out can be exercised too.

use std::io::{self, Write};

use indoc::indoc;
use pretty_assertions::assert_eq;

use super::{
    interpreter::{Interpreter, DEFAULT_MAX_CALL_DEPTH},
    value::Value,
};
use crate::{
    ast::{
        ast::Program,
        expressions::{Expr, Literal, Operator},
        statements::Stmt,
        types::VarType,
    },
    errors::errors::Error,
    parse,
};

fn run_with_depth(source: &str, max_call_depth: usize) -> (String, Result<(), Error>) {
    let program = parse(source).unwrap();
    let mut out = Vec::new();
    let result = Interpreter::new(&mut out)
        .with_max_call_depth(max_call_depth)
        .interpret(&program);

    (String::from_utf8(out).unwrap(), result)
}

fn run_source(source: &str) -> (String, Result<(), Error>) {
    run_with_depth(source, 64)
}

fn output(source: &str) -> String {
    let (out, result) = run_source(source);
    result.unwrap();
    out
}

fn runtime_error(source: &str) -> (String, Error) {
    let (out, result) = run_source(source);
    (out, result.unwrap_err())
}

#[test]
fn test_value_basics() {
    assert_eq!(Value::Int(-3).to_string(), "-3");
    assert_eq!(Value::Bool(true).to_string(), "true");
    assert_eq!(Value::zero(VarType::Int), Value::Int(0));
    assert_eq!(Value::zero(VarType::Bool), Value::Bool(false));
    assert_eq!(Value::Bool(false).get_type(), VarType::Bool);
}

#[test]
fn test_function_call() {
    let source = indoc! {"
        fun int add(int a, int b) { return a + b; }
        print(add(3, 4));
    "};
    assert_eq!(output(source), "7\n");
}

#[test]
fn test_while_loop() {
    let source = indoc! {"
        int i = 3;
        while (i > 0) {
            print(i);
            i = i - 1;
        }
    "};
    assert_eq!(output(source), "3\n2\n1\n");
}

#[test]
fn test_if_else() {
    let source = indoc! {"
        int x = 5;
        if (x > 3) print true; else print false;
        if (x == 3) { print 1; } else { print 2; }
        if (false) print 3;
    "};
    assert_eq!(output(source), "true\n2\n");
}

#[test]
fn test_recursion() {
    let source = indoc! {"
        fun int fact(int n) {
            if (n <= 1) return 1;
            return n * fact(n - 1);
        }
        fun int fib(int n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fact(10);
        print fib(15);
    "};
    assert_eq!(output(source), "3628800\n610\n");
}

#[test]
fn test_return_from_inside_loop() {
    let source = indoc! {"
        fun int first_multiple(int n, int of) {
            int i = 1;
            while (true) {
                if (i * n / of * of == i * n) {
                    return i * n;
                }
                i = i + 1;
            }
        }
        print first_multiple(4, 6);
    "};
    assert_eq!(output(source), "12\n");
}

#[test]
fn test_block_scoping_and_shadowing() {
    let source = indoc! {"
        int x = 1;
        {
            int x = 2;
            print x;
            x = 3;
            print x;
        }
        print x;
    "};
    assert_eq!(output(source), "2\n3\n1\n");
}

#[test]
fn test_assignment_reaches_outer_scope() {
    assert_eq!(output("int x = 1; { x = 7; } print x;"), "7\n");
}

#[test]
fn test_calls_use_static_scoping() {
    let source = indoc! {"
        int x = 1;
        fun int get() { return x; }
        {
            int x = 2;
            print get();
        }
    "};
    assert_eq!(output(source), "1\n");
}

#[test]
fn test_functions_can_update_globals() {
    let source = indoc! {"
        int counter = 0;
        fun int bump() { counter = counter + 1; return counter; }
        bump();
        bump();
        print counter;
    "};
    assert_eq!(output(source), "2\n");
}

#[test]
fn test_uninitialised_variables_are_zero() {
    assert_eq!(output("int x; bool b; print x; print b;"), "0\nfalse\n");
}

#[test]
fn test_integer_arithmetic_wraps() {
    assert_eq!(output("print 2147483647 + 1;"), "-2147483648\n");
    assert_eq!(
        output("print (0 - 2147483647 - 1) / -1;"),
        "-2147483648\n"
    );
    assert_eq!(output("print 7 / 2; print -7 / 2;"), "3\n-3\n");
}

#[test]
fn test_logical_operators_evaluate_both_sides() {
    let source = indoc! {"
        fun bool side() { print 9; return true; }
        print false && side();
        print true || side();
    "};
    assert_eq!(output(source), "9\nfalse\n9\ntrue\n");
}

#[test]
fn test_equality_on_booleans() {
    assert_eq!(
        output("print true == true; print 1 != 1; print !(2 >= 3);"),
        "true\nfalse\ntrue\n"
    );
}

#[test]
fn test_division_by_zero_aborts() {
    let source = indoc! {"
        print 1;
        print 1 / 0;
        print 2;
    "};
    let (out, error) = runtime_error(source);
    assert_eq!(out, "1\n");
    assert_eq!(error.to_string(), "Line: 2: Division by zero");
}

#[test]
fn test_missing_return_is_fatal() {
    let source = indoc! {"
        fun int f(int a) {
            if (a > 0) return 1;
        }
        print f(1);
        print f(0);
    "};
    let (out, error) = runtime_error(source);
    assert_eq!(out, "1\n");
    assert_eq!(error.get_message(), "Function 'f' must return a value");
    assert_eq!(error.get_line(), 5);
}

#[test]
fn test_wrong_argument_count() {
    let (_, error) = runtime_error("fun int f(int a) { return a; }\nprint f();");
    assert_eq!(error.to_string(), "Line: 2: Invalid arg count for function 'f'");
}

#[test]
fn test_runtime_type_mismatch() {
    let (_, error) = runtime_error("int x = true;");
    assert_eq!(
        error.get_message(),
        "Expected variable of type 'int' but found type 'bool'"
    );

    let (_, error) = runtime_error("fun bool f(int a) { return a; }\nprint f(1);");
    assert_eq!(
        error.get_message(),
        "Expected variable of type 'bool' but found type 'int'"
    );

    let (_, error) = runtime_error("int x = 1; x = false;");
    assert_eq!(error.get_error_name(), "TypeMatchError");
}

#[test]
fn test_undefined_names() {
    let (_, error) = runtime_error("print y;");
    assert_eq!(error.get_message(), "Undefined variable 'y'.");

    let (_, error) = runtime_error("print nope();");
    assert_eq!(error.get_message(), "Unknown Function 'nope'");
}

#[test]
fn test_redefinition_at_runtime() {
    let (_, error) = runtime_error("int x = 1;\nint x = 2;");
    assert_eq!(
        error.to_string(),
        "Line: 2: Variable 'x' is already defined in this scope."
    );
}

#[test]
fn test_nested_functions_are_not_callable() {
    let source = indoc! {"
        fun int outer() {
            fun int inner() { return 1; }
            return inner();
        }
        print outer();
    "};
    let (_, error) = runtime_error(source);
    assert_eq!(error.get_message(), "Unknown Function 'inner'");
}

#[test]
fn test_top_level_return() {
    let (_, error) = runtime_error("print 1;\nreturn 2;");
    assert_eq!(
        error.to_string(),
        "Line: 2: Invalid return statement, not in function"
    );
}

#[test]
fn test_call_depth_limit() {
    let source = indoc! {"
        fun int down(int n) { return down(n + 1); }
        print down(0);
    "};
    let (out, result) = run_with_depth(source, 16);
    assert_eq!(out, "");
    assert_eq!(
        result.unwrap_err().get_message(),
        "Maximum call depth of 16 exceeded"
    );
}

#[test]
fn test_deep_recursion_within_default_limit() {
    let source = indoc! {"
        fun int depth(int n) {
            if (n == 0) { return 0; }
            return depth(n - 1) + 1;
        }
        print depth(5000);
    "};
    let (out, result) = run_with_depth(source, DEFAULT_MAX_CALL_DEPTH);
    result.unwrap();
    assert_eq!(out, "5000\n");
}

#[test]
fn test_top_level_variables_start_at_zero() {
    let source = indoc! {"
        int g = f();
        fun int f() { return g + 1; }
        print g;
        bool seen = flag();
        fun bool flag() { return seen; }
        print seen;
    "};
    assert_eq!(output(source), "1\nfalse\n");
}

#[test]
fn test_binary_not_is_rejected() {
    let literal = |value| Expr::Literal {
        value: Literal::Bool(value),
        line: 2,
    };
    let program = Program::new(vec![Stmt::Expression {
        expression: Expr::Binary {
            left: Box::new(literal(true)),
            operator: Operator::Not,
            right: Box::new(literal(false)),
            line: 2,
        },
        line: 2,
    }]);

    let mut out = Vec::new();
    let error = Interpreter::new(&mut out).interpret(&program).unwrap_err();
    assert_eq!(error.to_string(), "Line: 2: Unexpected token '!'");
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_output_errors_surface() {
    let program = parse("print 1;").unwrap();
    let mut out = FailingWriter;
    let error = Interpreter::new(&mut out).interpret(&program).unwrap_err();

    assert_eq!(error.get_error_name(), "OutputError");
    assert_eq!(error.get_line(), 1);
}
