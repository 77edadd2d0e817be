//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric and boolean literals
//! - Operators and punctuation
//! - Comments and position tracking
//! - Error cases

use pretty_assertions::assert_eq;

use super::{lexer::tokenize, tokens::TokenKind};
use crate::ast::expressions::Literal;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("int bool fun if else while return print"),
        vec![
            TokenKind::Int,
            TokenKind::Bool,
            TokenKind::Fun,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::Return,
            TokenKind::Print,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo baz_123 _under printer iffy").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].lexeme, "foo");
    assert_eq!(tokens[1].lexeme, "baz_123");
    assert_eq!(tokens[2].lexeme, "_under");
    // Keywords only match whole words.
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_literals() {
    let tokens = tokenize("42 0 true false").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].literal, Some(Literal::Int(42)));
    assert_eq!(tokens[1].literal, Some(Literal::Int(0)));
    assert_eq!(tokens[2].kind, TokenKind::Boolean);
    assert_eq!(tokens[2].literal, Some(Literal::Bool(true)));
    assert_eq!(tokens[3].literal, Some(Literal::Bool(false)));
}

#[test]
fn test_tokenize_out_of_range_number_keeps_lexeme() {
    let tokens = tokenize("99999999999").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].lexeme, "99999999999");
    assert_eq!(tokens[0].literal, None);
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("+ - * / == != < <= > >= && || ! ="),
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::LessEquals,
            TokenKind::Greater,
            TokenKind::GreaterEquals,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::Assignment,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_operators_without_spaces() {
    assert_eq!(
        kinds("a<=b==!c"),
        vec![
            TokenKind::Identifier,
            TokenKind::LessEquals,
            TokenKind::Identifier,
            TokenKind::Equals,
            TokenKind::Not,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } , ;"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_skips_comments() {
    let tokens = tokenize("int x = 1; // trailing comment\nprint x; // done").unwrap();

    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![
            TokenKind::Int,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::Print,
            TokenKind::Identifier,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_tracks_line_and_column() {
    let tokens = tokenize("int x;\n  print x;").unwrap();

    assert_eq!((tokens[0].line(), tokens[0].column()), (1, 1));
    assert_eq!((tokens[1].line(), tokens[1].column()), (1, 5));
    assert_eq!((tokens[2].line(), tokens[2].column()), (1, 6));
    assert_eq!((tokens[3].line(), tokens[3].column()), (2, 3));
    assert_eq!((tokens[4].line(), tokens[4].column()), (2, 9));
}

#[test]
fn test_tokenize_empty_source() {
    let tokens = tokenize("").unwrap();

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_always_ends_with_eof() {
    let tokens = tokenize("print 1; // no newline at end").unwrap();

    assert_eq!(tokens.last().unwrap().kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_unknown_character() {
    let error = tokenize("int x = 1;\nx = x @ 2;").unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.to_string(), "Line: 2 Column: 7: Unknown token '@'");
}

#[test]
fn test_tokenize_lone_ampersand_and_pipe() {
    assert!(tokenize("a & b").is_err());
    assert!(tokenize("a | b").is_err());
}
