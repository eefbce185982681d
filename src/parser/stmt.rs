use crate::{
    ast::{
        ast::{Stmt, Unit},
        statements::{
            BlockStmt, ExpressionStmt, ForStmt, FuncDef, IfStmt, Parameter, ReturnStmt,
            VarDefStmt, VarInit,
        },
        types::TypeSpecifier,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    parser::{expr::parse_expr, lookups::BindingPower},
    Position, Span,
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let handler = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();
    if let Some(stmt_fn) = handler {
        return stmt_fn(parser);
    }

    let expression = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Expression(ExpressionStmt {
        span: Span {
            start: expression.span.start.clone(),
            end: parser.get_end_position(),
        },
        expression,
    }))
}

/// A top-level unit starts with `type name` and is a function definition
/// when an opening parenthesis follows the name.
pub fn parse_unit(parser: &mut Parser) -> Result<Unit, Error> {
    let start = parser.get_position();
    let declared_type = parse_type(parser, BindingPower::Default)?;
    let name = expect_identifier(parser, "expected a name after the type")?;

    if parser.current_token_kind() == TokenKind::OpenParen {
        Ok(Unit::Function(parse_fn_def(
            parser,
            declared_type,
            name.value,
            start,
        )?))
    } else {
        Ok(Unit::Variable(parse_declarators(
            parser,
            declared_type,
            name,
            start,
        )?))
    }
}

fn expect_identifier(parser: &mut Parser, message: &str) -> Result<Token, Error> {
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from(message),
        },
        parser.get_position(),
    );

    parser.expect_error(TokenKind::Identifier, Some(error))
}

pub fn parse_var_def_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let var_type = parse_type(parser, BindingPower::Default)?;
    let name = expect_identifier(parser, "expected identifier during variable definition")?;

    Ok(Stmt::VarDef(parse_declarators(parser, var_type, name, start)?))
}

/// Parses the rest of `T a = 1, b;` once the type and first name are consumed.
fn parse_declarators(
    parser: &mut Parser,
    var_type: TypeSpecifier,
    first_name: Token,
    start: Position,
) -> Result<VarDefStmt, Error> {
    let mut declarators = vec![];
    let mut name = first_name;

    loop {
        let value = if parser.current_token_kind() == TokenKind::Assignment {
            parser.advance();
            Some(parse_expr(parser, BindingPower::Comma)?)
        } else {
            None
        };

        declarators.push(VarInit {
            name: name.value,
            value,
            span: Span {
                start: name.span.start,
                end: parser.get_end_position(),
            },
        });

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();

        name = expect_identifier(parser, "expected identifier after comma")?;
    }

    parser.expect(TokenKind::Semicolon)?;

    Ok(VarDefStmt {
        var_type,
        declarators,
        span: Span {
            start,
            end: parser.get_end_position(),
        },
    })
}

fn parse_fn_def(
    parser: &mut Parser,
    return_type: TypeSpecifier,
    name: String,
    start: Position,
) -> Result<FuncDef, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();

    // `f(void)` declares no parameters
    if parser.current_token_kind() == TokenKind::Void && parser.peek_kind() == TokenKind::CloseParen
    {
        parser.advance();
    }

    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let param_start = parser.get_position();
            let param_type = parse_type(parser, BindingPower::Default)?;
            let param_name = expect_identifier(parser, "expected parameter name")?;

            parameters.push(Parameter {
                name: param_name.value,
                param_type,
                span: Span {
                    start: param_start,
                    end: parser.get_end_position(),
                },
            });

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block(parser)?;

    Ok(FuncDef {
        name,
        return_type,
        parameters,
        body,
        span: Span {
            start,
            end: parser.get_end_position(),
        },
    })
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let then_body = parse_stmt(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(Box::new(parse_stmt(parser)?))
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        condition,
        then_body: Box::new(then_body),
        else_body,
        span: Span {
            start,
            end: parser.get_end_position(),
        },
    }))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    parser.expect(TokenKind::OpenParen)?;

    // The init clause consumes its own semicolon
    let init = if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
        None
    } else {
        Some(Box::new(parse_stmt(parser)?))
    };

    let condition = if parser.current_token_kind() == TokenKind::Semicolon {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };
    parser.expect(TokenKind::Semicolon)?;

    let increment = if parser.current_token_kind() == TokenKind::CloseParen {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_stmt(parser)?;

    Ok(Stmt::For(ForStmt {
        init,
        condition,
        increment,
        body: Box::new(body),
        span: Span {
            start,
            end: parser.get_end_position(),
        },
    }))
}

fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: parser.current_token().value.clone(),
                    message: String::from("expected `}` before end of file"),
                },
                parser.get_position(),
            ));
        }
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt {
        body: statements,
        span: Span {
            start,
            end: parser.get_end_position(),
        },
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Block(parse_block(parser)?))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: Span {
            start,
            end: parser.get_end_position(),
        },
    }))
}

pub fn parse_empty_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance();

    Ok(Stmt::Empty(token.span.clone()))
}
