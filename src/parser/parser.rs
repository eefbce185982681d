//! The `Parser` cursor and the `parse` entry point.
//!
//! Statements dispatch on their leading token. Expressions and types are
//! both parsed Pratt style, each from its own handler table.

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, BindingPower, ExprLookup, LEDHandler, NUDHandler, StmtHandler,
        StmtLookup,
    },
    stmt::parse_unit,
    types::{create_token_type_lookups, TypeLEDHandler, TypeLookup, TypeNUDHandler},
};

/// Parsing state: a token stream that always ends in EOF, a cursor the
/// parser never moves past that EOF, and the handler tables.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    statements: StmtLookup,
    expressions: ExprLookup,
    types: TypeLookup,
}

impl Parser {
    /// Appends an EOF token when the stream does not already end in one.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Rc::clone(&file)));
            let span = Span {
                start: end.clone(),
                end,
            };
            tokens.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
        }

        Parser {
            tokens,
            pos: 0,
            statements: HashMap::new(),
            expressions: ExprLookup::new(),
            types: TypeLookup::new(),
        }
    }

    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the kind of the token after the current one.
    pub fn peek_kind(&self) -> TokenKind {
        self.tokens[(self.pos + 1).min(self.tokens.len() - 1)].kind
    }

    /// Moves past the current token and returns it. Stays put at EOF.
    pub fn advance(&mut self) -> &Token {
        let current = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[current]
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// Returns the consumed token, or the given error (an `UnexpectedToken`
    /// error by default) when the current token is of another kind.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            return Err(error.unwrap_or_else(|| {
                Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                )
            }));
        }

        Ok(self.advance().clone())
    }

    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.statements
    }

    pub fn get_expr_lookup(&self) -> &ExprLookup {
        &self.expressions
    }

    pub fn get_type_lookup(&self) -> &TypeLookup {
        &self.types
    }

    /// Registers an infix expression handler.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.expressions.register_led(kind, binding_power, led_fn);
    }

    /// Registers a prefix expression handler.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.expressions.register_nud(kind, nud_fn);
    }

    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.statements.insert(kind, stmt_fn);
    }

    pub fn type_led(
        &mut self,
        kind: TokenKind,
        binding_power: BindingPower,
        led_fn: TypeLEDHandler,
    ) {
        self.types.register_led(kind, binding_power, led_fn);
    }

    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.types.register_nud(kind, nud_fn);
    }

    /// Returns the source position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Returns the position where the previously consumed token ended.
    pub fn get_end_position(&self) -> Position {
        match self.pos.checked_sub(1) {
            Some(previous) => self.tokens[previous].span.end.clone(),
            None => self.get_position(),
        }
    }
}

/// Parses a token stream into the program root, one top-level unit at a
/// time. The first error aborts parsing.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<Program, Error> {
    let mut parser = Parser::new(tokens, Rc::clone(&file));
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    let mut units = vec![];

    while parser.has_tokens() {
        units.push(parse_unit(&mut parser)?);
    }

    Ok(Program {
        units,
        span: Span {
            start: Position(0, Rc::clone(&file)),
            end: parser.get_end_position(),
        },
    })
}
