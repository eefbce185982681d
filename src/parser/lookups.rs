use std::collections::HashMap;

use crate::{
    ast::{ast::Stmt, expressions::Expr},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Comma,
    Assignment,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Call,
    Primary,
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type LEDHandler = fn(&mut Parser, Expr, BindingPower) -> Result<Expr, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    parser.led(TokenKind::Assignment, BindingPower::Assignment, parse_assignment_expr);

    // Relational
    parser.led(TokenKind::Less, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Equals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Relational, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Percent, BindingPower::Multiplicative, parse_binary_expr);

    parser.led(TokenKind::OpenParen, BindingPower::Call, parse_call_expr);

    // Literals and symbols
    parser.nud(TokenKind::Number, parse_primary_expr);
    parser.nud(TokenKind::Character, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_primary_expr);
    parser.nud(TokenKind::True, parse_primary_expr);
    parser.nud(TokenKind::False, parse_primary_expr);
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);

    // Statements
    parser.stmt(TokenKind::Void, parse_var_def_stmt);
    parser.stmt(TokenKind::Bool, parse_var_def_stmt);
    parser.stmt(TokenKind::Char, parse_var_def_stmt);
    parser.stmt(TokenKind::Int, parse_var_def_stmt);
    parser.stmt(TokenKind::Double, parse_var_def_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::For, parse_for_stmt);
    parser.stmt(TokenKind::OpenCurly, parse_block_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::Semicolon, parse_empty_stmt);
}

pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
pub type ExprLookup = PrattTable<NUDHandler, LEDHandler>;

/// Prefix handlers, infix handlers and binding powers of one Pratt grammar.
/// Expressions and types each get their own table.
pub struct PrattTable<N, L> {
    pub nud: HashMap<TokenKind, N>,
    pub led: HashMap<TokenKind, L>,
    pub binding_power: BPLookup,
}

impl<N, L> PrattTable<N, L> {
    pub fn new() -> Self {
        PrattTable {
            nud: HashMap::new(),
            led: HashMap::new(),
            binding_power: HashMap::new(),
        }
    }

    pub fn register_led(&mut self, kind: TokenKind, binding_power: BindingPower, handler: L) {
        self.binding_power.insert(kind, binding_power);
        self.led.insert(kind, handler);
    }

    /// Tokens that also have an infix handler keep their infix binding power.
    pub fn register_nud(&mut self, kind: TokenKind, handler: N) {
        self.binding_power
            .entry(kind)
            .or_insert(BindingPower::Primary);
        self.nud.insert(kind, handler);
    }
}

impl<N, L> Default for PrattTable<N, L> {
    fn default() -> Self {
        Self::new()
    }
}
