//! Lexical analysis for Cove.
//! Cove 词法分析模块。
//!
//! This crate provides the lexer that converts C-family source code
//! into a token stream terminated by a single `Eof` sentinel.

mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};
