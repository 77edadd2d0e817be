//! Range-bounded expression parsing.
//!
//! An expression is resolved over a half-open token range `[pos, end)`. The
//! range is split at its lowest-precedence binary operator outside any
//! parentheses, choosing the rightmost one on ties so that operators of
//! equal precedence associate to the left. A range without such an operator
//! must be a parenthesized expression, a call, a unary operation or a single
//! operand.

use crate::{
    ast::expressions::{Expr, Literal, Operator},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

const MAX_ARGUMENTS: usize = 255;

/// Parses one expression starting at the current token. The expression ends
/// at the first unmatched `)`, a `,` outside parentheses, a brace, a `;` or
/// EOF.
pub fn parse_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let end = find_expression_end(parser);
    parse_expr_in_range(parser, end)
}

fn find_expression_end(parser: &Parser) -> usize {
    let mut depth = 0usize;
    let mut index = parser.get_pos();

    loop {
        match parser.token_at(index).kind {
            TokenKind::EOF
            | TokenKind::Semicolon
            | TokenKind::OpenCurly
            | TokenKind::CloseCurly => break,
            TokenKind::Comma if depth == 0 => break,
            TokenKind::CloseParen => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            TokenKind::OpenParen => depth += 1,
            _ => {}
        }
        index += 1;
    }

    index
}

/// Parses the tokens in `[pos, end)` as exactly one expression.
fn parse_expr_in_range(parser: &mut Parser, end: usize) -> Result<Expr, Error> {
    let start = parser.get_pos();

    let expr = match find_split_operator(parser, start, end) {
        Some(split) => parse_binary_expr(parser, split, end)?,
        None => parse_primary_expr(parser, end)?,
    };

    if parser.get_pos() != end {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenInExpression {
                token: parser.current_token().lexeme.clone(),
            },
            parser.get_position(),
        ));
    }

    Ok(expr)
}

fn parse_binary_expr(parser: &mut Parser, split: usize, end: usize) -> Result<Expr, Error> {
    let left = parse_expr_in_range(parser, split)?;

    let operator_token = parser.advance().clone();
    let operator = Operator::from_token_kind(operator_token.kind).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.lexeme.clone(),
            },
            operator_token.position,
        )
    })?;

    let right = parse_expr_in_range(parser, end)?;

    Ok(Expr::Binary {
        line: left.line(),
        left: Box::new(left),
        operator,
        right: Box::new(right),
    })
}

/// Finds the index of the operator to split `[start, end)` at, if any.
fn find_split_operator(parser: &Parser, start: usize, end: usize) -> Option<usize> {
    let mut lowest: Option<(usize, BindingPower)> = None;
    let mut index = start;

    while index < end {
        if parser.token_at(index).kind == TokenKind::OpenParen {
            index = skip_parens(parser, index, end);
            continue;
        }

        if let Some(binding_power) = binary_binding_power(parser, start, index) {
            match lowest {
                Some((_, lowest_power)) if binding_power > lowest_power => {}
                _ => lowest = Some((index, binding_power)),
            }
        }

        index += 1;
    }

    lowest.map(|(index, _)| index)
}

/// Returns the index just past the `)` matching the `(` at `index`, or
/// `end` if it is not closed inside the range.
fn skip_parens(parser: &Parser, index: usize, end: usize) -> usize {
    let mut depth = 0usize;
    let mut index = index;

    while index < end {
        match parser.token_at(index).kind {
            TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen => {
                depth -= 1;
                if depth == 0 {
                    return index + 1;
                }
            }
            _ => {}
        }
        index += 1;
    }

    end
}

/// Binding power of the token at `index` when it acts as a binary operator.
///
/// `-` is binary only when the token before it, inside the range, ends an
/// operand. `!` is never binary.
fn binary_binding_power(parser: &Parser, start: usize, index: usize) -> Option<BindingPower> {
    let kind = parser.token_at(index).kind;

    if kind == TokenKind::Dash {
        if index == start {
            return None;
        }
        let previous = parser.token_at(index - 1).kind;
        let ends_operand = matches!(
            previous,
            TokenKind::Number | TokenKind::Boolean | TokenKind::Identifier | TokenKind::CloseParen
        );
        if !ends_operand {
            return None;
        }
    }

    parser.get_bp_lookup().get(&kind).copied()
}

fn parse_primary_expr(parser: &mut Parser, end: usize) -> Result<Expr, Error> {
    if parser.get_pos() >= end {
        return Err(unexpected_token(parser));
    }

    let token = parser.current_token().clone();
    match token.kind {
        TokenKind::OpenParen => {
            parser.advance();
            let expr = parse_expr(parser)?;
            parser.expect(&[TokenKind::CloseParen], "Expect ')' after '('")?;
            Ok(expr)
        }
        TokenKind::Identifier if parser.check_next(TokenKind::OpenParen) => {
            parse_call_expr(parser)
        }
        TokenKind::Dash | TokenKind::Not => {
            parser.advance();
            let operator = if token.kind == TokenKind::Dash {
                Operator::Minus
            } else {
                Operator::Not
            };
            let right = parse_expr_in_range(parser, end)?;

            Ok(Expr::Unary {
                operator,
                right: Box::new(right),
                line: token.line(),
            })
        }
        TokenKind::Number => {
            parser.advance();
            match token.literal {
                Some(value @ Literal::Int(_)) => Ok(Expr::Literal {
                    value,
                    line: token.line(),
                }),
                _ => Err(Error::new(
                    ErrorImpl::NumberParseError {
                        token: token.lexeme,
                    },
                    token.position,
                )),
            }
        }
        TokenKind::Boolean => {
            parser.advance();
            Ok(Expr::Literal {
                value: Literal::Bool(token.lexeme == "true"),
                line: token.line(),
            })
        }
        TokenKind::Identifier => {
            parser.advance();
            Ok(Expr::Variable {
                line: token.line(),
                name: token.lexeme,
            })
        }
        _ => Err(unexpected_token(parser)),
    }
}

fn parse_call_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let name = parser.advance().clone();
    parser.advance();

    let mut arguments = vec![];
    if !parser.check(&[TokenKind::CloseParen]) {
        loop {
            if arguments.len() >= MAX_ARGUMENTS {
                return Err(Error::new(
                    ErrorImpl::ExpectedToken {
                        message: format!("Cannot have more than {} arguments.", MAX_ARGUMENTS),
                    },
                    parser.get_position(),
                ));
            }

            arguments.push(parse_expr(parser)?);

            if !parser.check_and_advance(&[TokenKind::Comma]) {
                break;
            }
        }
    }

    parser.expect(
        &[TokenKind::CloseParen],
        "Expected '(' at end of function call",
    )?;

    Ok(Expr::Call {
        line: name.line(),
        name: name.lexeme,
        arguments,
    })
}

fn unexpected_token(parser: &Parser) -> Error {
    Error::new(
        ErrorImpl::UnexpectedToken {
            token: parser.current_token().lexeme.clone(),
        },
        parser.get_position(),
    )
}
