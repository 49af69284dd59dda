//! Parser for Cove.
//!
//! This crate provides a recursive descent parser that converts
//! tokens into an abstract syntax tree.
//!
//! ## Error Recovery
//!
//! The parser implements statement-boundary error recovery: a
//! malformed statement is diagnosed once and skipped up to the next
//! synchronization point, so parsing continues and multiple errors
//! are reported in a single pass.

mod parser;
mod recovery;

pub use parser::{DEFAULT_MAX_DEPTH, Parser};
pub use recovery::{STMT_ENDS, STMT_STARTS, is_stmt_end, is_stmt_start, is_sync_token};

use cove_diagnostic::Diagnostic;
use cove_lexer::Lexer;
use cove_syntax::SourceFile;

/// Parse source code into an AST.
pub fn parse(source: &str) -> (SourceFile, Vec<Diagnostic>) {
    let lexer = Lexer::new(source);
    let (tokens, mut diagnostics) = lexer.tokenize();

    let mut parser = Parser::new(tokens);
    let file = parser.parse_file();

    diagnostics.extend(parser.diagnostics());
    (file, diagnostics)
}
