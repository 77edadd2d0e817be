//! Integration tests for the end-to-end pipeline.
//!
//! These tests drive the public entry points: source text goes through
//! tokenization, parsing and checking, then either runs on the interpreter
//! or is compiled to MIPS assembly.

use badlang::{check, compile, generate, interpret, parse, run, tokenize};
use indoc::indoc;
use pretty_assertions::assert_eq;

fn run_output(source: &str) -> String {
    let mut out = Vec::new();
    run(source, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn messages(source: &str) -> Vec<String> {
    let mut out = Vec::new();
    run(source, &mut out)
        .unwrap_err()
        .iter()
        .map(|error| error.to_string())
        .collect()
}

#[test]
fn test_add_function() {
    let source = indoc! {"
        fun int add(int a, int b) {
            return a + b;
        }
        print(add(3, 4));
    "};
    assert_eq!(run_output(source), "7\n");
}

#[test]
fn test_countdown() {
    let source = indoc! {"
        int i = 3;
        while (i > 0) {
            print(i);
            i = i - 1;
        }
    "};
    assert_eq!(run_output(source), "3\n2\n1\n");
}

#[test]
fn test_larger_program() {
    let source = indoc! {"
        // Sum of the primes below a limit.
        fun bool is_prime(int n) {
            if (n < 2) return false;
            int d = 2;
            while (d * d <= n) {
                if (n / d * d == n) return false;
                d = d + 1;
            }
            return true;
        }

        fun int sum_primes(int limit) {
            int sum = 0;
            int n = 2;
            while (n < limit) {
                if (is_prime(n)) sum = sum + n;
                n = n + 1;
            }
            return sum;
        }

        print sum_primes(20);
        print is_prime(17);
        print is_prime(18) || !is_prime(19);
    "};
    assert_eq!(run_output(source), "77\ntrue\nfalse\n");
}

#[test]
fn test_mutual_recursion() {
    let source = indoc! {"
        fun bool is_even(int n) {
            if (n == 0) return true;
            return is_odd(n - 1);
        }
        fun bool is_odd(int n) {
            if (n == 0) return false;
            return is_even(n - 1);
        }
        print is_even(10);
        print is_odd(7);
    "};
    assert_eq!(run_output(source), "true\ntrue\n");
}

#[test]
fn test_division_by_zero_stops_output() {
    let source = indoc! {"
        int zero = 0;
        print 10;
        print 10 / zero;
        print 20;
    "};
    let mut out = Vec::new();
    let errors = run(source, &mut out).unwrap_err();

    assert_eq!(String::from_utf8(out).unwrap(), "10\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "Line: 3: Division by zero");
}

#[test]
fn test_diagnostics_prevent_execution() {
    let source = indoc! {"
        print 1;
        bool b = 1;
    "};
    let mut out = Vec::new();
    let errors = run(source, &mut out).unwrap_err();

    assert!(out.is_empty());
    assert_eq!(
        errors[0].to_string(),
        "Line: 2: Wrong variable type, expected 'bool', found type 'int'"
    );
}

#[test]
fn test_checker_examples() {
    assert_eq!(
        messages("int x; int x;"),
        vec!["Line: 1: Variable 'x' is already defined in this scope."]
    );
    assert_eq!(
        messages("{ int x = 1; } print(x);"),
        vec!["Line: 1: Undefined variable 'x'."]
    );
}

#[test]
fn test_syntax_errors_carry_column() {
    let errors = messages("int x = 1;\nprint x +;");
    assert_eq!(errors, vec!["Line: 2 Column: 10: Unexpected token ';'"]);

    let errors = messages("int x = 1 @ 2;");
    assert_eq!(errors, vec!["Line: 1 Column: 11: Unknown token '@'"]);
}

#[test]
fn test_pipeline_stages_compose() {
    let source = "fun int sq(int n) { return n * n; }\nprint sq(-3);";

    let tokens = tokenize(source).unwrap();
    assert!(!tokens.is_empty());

    let program = parse(source).unwrap();
    assert_eq!(program.len(), 2);
    assert!(check(&program).is_empty());

    let mut out = Vec::new();
    interpret(&program, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "9\n");

    let assembly = generate(&program).unwrap();
    assert!(assembly.contains("fun_sq:"));
}

#[test]
fn test_compile_produces_complete_assembly() {
    let source = indoc! {"
        int total = 0;
        fun int add(int a, int b) {
            return a + b;
        }
        int i = 0;
        while (i < 3) {
            total = add(total, i);
            i = i + 1;
        }
        print total;
        print total == 3;
    "};
    let assembly = compile(source).unwrap();

    assert!(assembly.starts_with(".data\n"));
    for expected in [
        "var_total: .word 0",
        "var_i: .word 0",
        "bool_true: .asciiz \"true\\n\"",
        ".text",
        ".globl main",
        "main:",
        "fun_add:",
        "ret_add:",
        "jal fun_add",
        "while_0:",
        "endwhile_0:",
        "print_bool_1:",
        "runtime_div_zero:",
        "runtime_missing_return:",
    ] {
        assert!(assembly.contains(expected), "missing {}", expected);
    }

    // Every push has a matching pop: the generated code only moves $sp by
    // whole words.
    for line in assembly.lines().map(str::trim) {
        if let Some(amount) = line
            .strip_prefix("addu $sp, $sp, ")
            .or_else(|| line.strip_prefix("subu $sp, $sp, "))
        {
            assert_eq!(amount.parse::<u32>().unwrap() % 4, 0);
        }
    }
}

#[test]
fn test_compile_reports_diagnostics() {
    let errors = compile("print nope(1);").unwrap_err();
    assert_eq!(errors[0].to_string(), "Line: 1: Unknown Function 'nope'");
}

#[test]
fn test_deep_recursion_completes() {
    let source = indoc! {"
        fun int count(int n) {
            if (n == 0) { return 0; }
            return count(n - 1) + 1;
        }
        print(count(2000));
        print(count(5000));
    "};
    assert_eq!(run_output(source), "2000\n5000\n");
}

#[test]
fn test_function_reads_static_before_its_declaration_runs() {
    let source = indoc! {"
        int g = f();
        fun int f() { return g; }
        print(g);
    "};
    let program = parse(source).unwrap();
    assert!(check(&program).is_empty());

    assert_eq!(run_output(source), "0\n");

    // The generated code reads the same zero-initialised word.
    let assembly = compile(source).unwrap();
    assert!(assembly.contains("var_g: .word 0"));
    assert!(assembly.contains("lw $t0, var_g"));
}
