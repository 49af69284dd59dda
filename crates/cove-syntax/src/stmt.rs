//! Statement AST nodes.

use crate::{Block, Decl, Expr, Ident};
use cove_common::Span;

/// A statement.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kind, one variant per C99 statement form.
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Compound statement `{ ... }`
    Compound(Block),

    /// Null statement `;`
    Empty,

    /// Expression statement `expr;`
    Expr(Expr),

    /// `if (cond) stmt` with optional `else stmt`
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// `while (cond) stmt`
    While {
        condition: Expr,
        body: Box<Stmt>,
    },

    /// `do stmt while (cond);`
    DoWhile {
        body: Box<Stmt>,
        condition: Expr,
    },

    /// `for (init; cond; step) stmt`
    For {
        init: ForInit,
        condition: Option<Expr>,
        step: Option<Expr>,
        body: Box<Stmt>,
    },

    /// `switch (scrutinee) stmt`
    Switch {
        scrutinee: Expr,
        body: Box<Stmt>,
    },

    /// `case value: stmt`
    Case {
        value: Expr,
        body: Box<Stmt>,
    },

    /// `default: stmt`
    Default {
        body: Box<Stmt>,
    },

    /// `label: stmt`
    Labeled {
        label: Ident,
        body: Box<Stmt>,
    },

    /// `goto label;`
    Goto(Ident),

    /// `continue;`
    Continue,

    /// `break;`
    Break,

    /// `return expr?;`
    Return(Option<Expr>),
}

/// The first clause of a `for` statement.
#[derive(Debug, Clone)]
pub enum ForInit {
    /// `for (; ...)`
    None,
    /// `for (expr; ...)`
    Expr(Expr),
    /// `for (int i = 0; ...)` (C99 6.8.5.3)
    Decl(Decl),
}
