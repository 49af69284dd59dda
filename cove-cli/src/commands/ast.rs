//! The `cove ast` command.

use super::{CommandError, read_source};
use cove_diagnostic::emit;
use cove_parser::parse;

/// Parse a source file and print the resulting AST.
///
/// The AST is printed even when the parse had errors: recovery keeps
/// the well-formed remainder of the file available.
pub fn run(file: &str) -> Result<(), CommandError> {
    let source = read_source(file)?;

    let (ast, diagnostics) = parse(&source);

    for diag in &diagnostics {
        emit(&source, file, diag);
    }

    println!("{ast:#?}");

    if !diagnostics.is_empty() {
        return Err(CommandError::Syntax {
            count: diagnostics.len(),
        });
    }

    Ok(())
}
