//! Top-level AST definitions: source files, blocks, and declarations.

use crate::{Expr, Stmt};
use cove_common::Span;

/// A complete source file: a sequence of block items.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub items: Vec<BlockItem>,
    pub span: Span,
}

/// An identifier with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// One item of a block: a declaration or a statement.
///
/// Insertion order is execution order.
#[derive(Debug, Clone)]
pub enum BlockItem {
    Decl(Decl),
    Stmt(Stmt),
}

impl BlockItem {
    pub fn span(&self) -> Span {
        match self {
            BlockItem::Decl(d) => d.span,
            BlockItem::Stmt(s) => s.span,
        }
    }
}

/// A brace-delimited block of items.
#[derive(Debug, Clone)]
pub struct Block {
    pub items: Vec<BlockItem>,
    pub span: Span,
}

/// A block-item declaration: specifiers plus an init-declarator list.
///
/// `static const int x = 1, *p;`
#[derive(Debug, Clone)]
pub struct Decl {
    pub specifiers: Vec<DeclSpecifier>,
    pub declarators: Vec<InitDeclarator>,
    pub span: Span,
}

/// A declaration specifier keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclSpecifier {
    Void,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Signed,
    Unsigned,
    Const,
    Static,
}

/// One declarator with an optional initializer: `*p = &x`.
#[derive(Debug, Clone)]
pub struct InitDeclarator {
    pub name: Ident,
    /// Number of leading `*`s.
    pub pointer_depth: u32,
    pub init: Option<Expr>,
    pub span: Span,
}
