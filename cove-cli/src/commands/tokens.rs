//! The `cove tokens` command.

use super::{CommandError, read_source};
use cove_diagnostic::emit;
use cove_lexer::Lexer;

/// Tokenize a source file and print the token stream.
pub fn run(file: &str) -> Result<(), CommandError> {
    let source = read_source(file)?;

    let (tokens, diagnostics) = Lexer::new(&source).tokenize();

    for diag in &diagnostics {
        emit(&source, file, diag);
    }

    for token in &tokens {
        println!("{:>5}..{:<5} {:?}", token.span.start.0, token.span.end.0, token.kind);
    }

    if !diagnostics.is_empty() {
        return Err(CommandError::Syntax {
            count: diagnostics.len(),
        });
    }

    Ok(())
}
