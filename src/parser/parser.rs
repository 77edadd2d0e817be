//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the parsing entry point.
//! Statements are parsed by predictive recursive descent, dispatching on the
//! leading token through a lookup table. Expressions are resolved over
//! bounded token ranges (see `expr.rs`).
//!
//! It maintains lookup tables for:
//! - Statement handlers keyed by their leading token
//! - Binary operator precedence

use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, MK_TOKEN,
};

use super::{
    lookups::{create_token_lookups, BPLookup, BindingPower, StmtHandler, StmtLookup},
    stmt::parse_stmt,
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and the lookup tables. The cursor
/// only moves forward; expression parsing additionally peeks at arbitrary
/// indices to find range boundaries and operators.
pub struct Parser {
    /// The list of tokens to parse, ending with EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for binary operator precedence
    binding_power_lookup: BPLookup,
}

impl Parser {
    /// Creates a new Parser instance over a token stream.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EOF) {
            let position = tokens
                .last()
                .map(|t| t.position)
                .unwrap_or_else(|| Position::new(1, 1));
            tokens.push(MK_TOKEN!(TokenKind::EOF, String::new(), None, position));
        }

        Parser {
            tokens,
            pos: 0,
            stmt_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        self.token_at(self.pos)
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the token at `index`, clamped to the trailing EOF.
    pub fn token_at(&self, index: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[index.min(last)]
    }

    pub fn get_pos(&self) -> usize {
        self.pos
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// The cursor never moves past EOF.
    pub fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    pub fn previous(&self) -> &Token {
        self.token_at(self.pos.saturating_sub(1))
    }

    pub fn is_at_end(&self) -> bool {
        self.current_token_kind() == TokenKind::EOF
    }

    /// Returns true if the current token is one of `kinds`. Never true at EOF.
    pub fn check(&self, kinds: &[TokenKind]) -> bool {
        !self.is_at_end() && self.current_token().is_one_of_many(kinds)
    }

    /// Returns true if the token after the current one has kind `kind`.
    pub fn check_next(&self, kind: TokenKind) -> bool {
        if self.is_at_end() {
            return false;
        }
        let next = self.token_at(self.pos + 1);
        next.kind != TokenKind::EOF && next.kind == kind
    }

    /// Consumes the current token if it is one of `kinds`.
    pub fn check_and_advance(&mut self, kinds: &[TokenKind]) -> bool {
        if self.check(kinds) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects a token of one of the given kinds, failing with `message`.
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise an Error
    /// located at the current token.
    pub fn expect(&mut self, kinds: &[TokenKind], message: &str) -> Result<Token, Error> {
        if self.check(kinds) {
            Ok(self.advance().clone())
        } else {
            Err(Error::new(
                ErrorImpl::ExpectedToken {
                    message: String::from(message),
                },
                self.get_position(),
            ))
        }
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a binary operator and its precedence.
    pub fn binary(&mut self, kind: TokenKind, binding_power: BindingPower) {
        self.binding_power_lookup.insert(kind, binding_power);
    }

    /// Registers a statement handler for a leading token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Returns the source position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().position
    }
}

/// Parses a stream of tokens into a Program.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes the lookup tables, and parses statements until EOF. The first
/// error aborts the whole unit.
pub fn parse(tokens: Vec<Token>) -> Result<Program, Error> {
    let mut parser = Parser::new(tokens);
    create_token_lookups(&mut parser);

    let mut body = vec![];

    while !parser.is_at_end() {
        body.push(parse_stmt(&mut parser)?);
    }

    debug!(statements = body.len(), "parsed program");
    Ok(Program::new(body))
}
