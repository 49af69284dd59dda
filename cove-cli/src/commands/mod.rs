//! CLI command implementations.

pub mod ast;
pub mod check;
pub mod tokens;

use thiserror::Error;

/// Errors a CLI command can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("cannot read file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{count} syntax error(s) found")]
    Syntax { count: usize },
}

/// Read a source file, mapping I/O failures to a command error.
pub fn read_source(path: &str) -> Result<String, CommandError> {
    std::fs::read_to_string(path).map_err(|source| CommandError::Io {
        path: path.to_string(),
        source,
    })
}
