use crate::{
    ast::{
        statements::{FunctionDecl, Parameter, Stmt},
        types::VarType,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::expr::parse_expr,
};

use super::parser::Parser;

const MAX_PARAMETERS: usize = 255;

const TYPE_KINDS: [TokenKind; 2] = [TokenKind::Int, TokenKind::Bool];

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let handler = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();
    if let Some(handler) = handler {
        return handler(parser);
    }

    if parser.check(&[TokenKind::Identifier]) && parser.check_next(TokenKind::Assignment) {
        return parse_assignment_stmt(parser);
    }

    parse_expression_stmt(parser)
}

fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let expression = parse_expr(parser)?;
    parser.expect(&[TokenKind::Semicolon], "Expect ';' after expression.")?;

    Ok(Stmt::Expression {
        line: expression.line(),
        expression,
    })
}

fn parse_assignment_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let name = parser.advance().clone();
    parser.advance();

    let value = parse_expr(parser)?;
    parser.expect(&[TokenKind::Semicolon], "Expect ';' after expression.")?;

    Ok(Stmt::Assign {
        line: name.line(),
        name: name.lexeme,
        value,
    })
}

/// Parses the statements of a block up to and including the closing `}`.
/// The opening `{` must already be consumed.
fn parse_block_body(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    let mut body = vec![];

    while !parser.check(&[TokenKind::CloseCurly]) && !parser.is_at_end() {
        body.push(parse_stmt(parser)?);
    }

    parser.expect(&[TokenKind::CloseCurly], "Expect '}' after block.")?;
    Ok(body)
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.advance().line();
    let body = parse_block_body(parser)?;

    Ok(Stmt::Block { body, line })
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    let return_type = parse_type(parser, "Expect type name")?;
    let name = parser.expect(&[TokenKind::Identifier], "Expect function name.")?;
    parser.expect(&[TokenKind::OpenParen], "Expect '(' after function name.")?;

    let mut parameters = vec![];
    if !parser.check(&[TokenKind::CloseParen]) {
        loop {
            if parameters.len() >= MAX_PARAMETERS {
                return Err(Error::new(
                    ErrorImpl::ExpectedToken {
                        message: format!("Cannot have more than {} parameters.", MAX_PARAMETERS),
                    },
                    parser.get_position(),
                ));
            }

            let var_type = parse_type(parser, "Expect type name")?;
            let param = parser.expect(&[TokenKind::Identifier], "Expect parameter name.")?;
            parameters.push(Parameter {
                name: param.lexeme,
                var_type,
            });

            if !parser.check_and_advance(&[TokenKind::Comma]) {
                break;
            }
        }
    }

    parser.expect(&[TokenKind::CloseParen], "Expect ')' after parameters.")?;
    parser.expect(&[TokenKind::OpenCurly], "Expect '{' before function body.")?;
    let body = parse_block_body(parser)?;

    Ok(Stmt::Function(FunctionDecl {
        line: name.line(),
        name: name.lexeme,
        return_type,
        parameters,
        body,
    }))
}

pub fn parse_print_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    let expression = parse_expr(parser)?;
    parser.expect(&[TokenKind::Semicolon], "Expect ';' after value.")?;

    Ok(Stmt::Print {
        line: expression.line(),
        expression,
    })
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    parser.expect(&[TokenKind::OpenParen], "Expect '(' after 'if'.")?;
    let condition = parse_expr(parser)?;
    parser.expect(&[TokenKind::CloseParen], "Expect ')' after if condition.")?;

    let then_branch = Box::new(parse_stmt(parser)?);
    let else_branch = if parser.check_and_advance(&[TokenKind::Else]) {
        Some(Box::new(parse_stmt(parser)?))
    } else {
        None
    };

    Ok(Stmt::If {
        line: condition.line(),
        condition,
        then_branch,
        else_branch,
    })
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.advance().line();

    let value = if parser.check(&[TokenKind::Semicolon]) {
        None
    } else {
        Some(parse_expr(parser)?)
    };
    parser.expect(&[TokenKind::Semicolon], "Expect ';' after return value.")?;

    Ok(Stmt::Return { value, line })
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let var_type = parse_type(parser, "Expect type name")?;
    let name = parser.expect(&[TokenKind::Identifier], "Expect variable name.")?;

    let initializer = if parser.check_and_advance(&[TokenKind::Assignment]) {
        Some(parse_expr(parser)?)
    } else {
        None
    };
    parser.expect(
        &[TokenKind::Semicolon],
        "Expect ';' after variable declaration.",
    )?;

    Ok(Stmt::Var {
        line: name.line(),
        name: name.lexeme,
        var_type,
        initializer,
    })
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    parser.expect(&[TokenKind::OpenParen], "Expect '(' after 'while'.")?;
    let condition = parse_expr(parser)?;
    parser.expect(&[TokenKind::CloseParen], "Expect ')' after condition.")?;

    let body = Box::new(parse_stmt(parser)?);

    Ok(Stmt::While {
        line: condition.line(),
        condition,
        body,
    })
}

fn parse_type(parser: &mut Parser, message: &str) -> Result<VarType, Error> {
    let token = parser.expect(&TYPE_KINDS, message)?;
    VarType::from_token_kind(token.kind).ok_or_else(|| {
        Error::new(
            ErrorImpl::ExpectedToken {
                message: String::from(message),
            },
            token.position,
        )
    })
}
