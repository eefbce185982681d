use crate::Span;

use super::{ast::Stmt, expressions::Expr, types::TypeSpecifier};

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

/// One declarator of a variable definition: `a` or `a = 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarInit {
    pub name: String,
    pub value: Option<Expr>,
    pub span: Span,
}

/// `int a = 1, b;` declares every declarator with the same type.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDefStmt {
    pub var_type: TypeSpecifier,
    pub declarators: Vec<VarInit>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: Box<Stmt>,
    pub else_body: Option<Box<Stmt>>,
    pub span: Span,
}

/// Every clause but the body may be left out: `for (;;) body`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub condition: Option<Expr>,
    pub increment: Option<Expr>,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub param_type: TypeSpecifier,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDef {
    pub name: String,
    pub return_type: TypeSpecifier,
    pub parameters: Vec<Parameter>,
    pub body: BlockStmt,
    pub span: Span,
}
