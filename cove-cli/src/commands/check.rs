//! The `cove check` command.

use super::{CommandError, read_source};
use crate::output;
use cove_diagnostic::emit;
use cove_parser::parse;

/// Parse a source file and render its diagnostics.
pub fn run(file: &str, verbose: bool) -> Result<(), CommandError> {
    let source = read_source(file)?;

    let (ast, diagnostics) = parse(&source);

    for diag in &diagnostics {
        emit(&source, file, diag);
    }

    if !diagnostics.is_empty() {
        return Err(CommandError::Syntax {
            count: diagnostics.len(),
        });
    }

    if verbose {
        output::info(&format!("parsed {} block item(s)", ast.items.len()));
    }

    output::success("OK - no syntax errors found");
    Ok(())
}
