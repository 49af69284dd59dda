//! AST and syntax definitions for Cove.
//!
//! This crate defines the abstract syntax tree produced by the parser.
//! The grammar is the C99 statement grammar: brace-delimited blocks of
//! block items, where each item is a declaration or a statement.

mod ast;
mod expr;
mod stmt;

pub use ast::*;
pub use expr::*;
pub use stmt::*;
