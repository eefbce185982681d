use crate::Span;

use super::statements::{
    BlockStmt, ExpressionStmt, ForStmt, FuncDef, IfStmt, ReturnStmt, VarDefStmt,
};

/// Statement kinds that may appear inside a function body.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(BlockStmt),
    VarDef(VarDefStmt),
    If(IfStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Expression(ExpressionStmt),
    /// A lone `;`.
    Empty(Span),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Block(stmt) => &stmt.span,
            Stmt::VarDef(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::For(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
            Stmt::Expression(stmt) => &stmt.span,
            Stmt::Empty(span) => span,
        }
    }
}

/// Top-level declarations.
#[derive(Debug, Clone, PartialEq)]
pub enum Unit {
    Function(FuncDef),
    Variable(VarDefStmt),
}

impl Unit {
    pub fn get_span(&self) -> &Span {
        match self {
            Unit::Function(func) => &func.span,
            Unit::Variable(var) => &var.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub units: Vec<Unit>,
    pub span: Span,
}
