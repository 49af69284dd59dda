//! Cove CLI - the Cove front-end command line interface.
//! Cove CLI - Cove 前端的命令行界面。

mod commands;
mod output;

use clap::{Parser, Subcommand};

/// Main CLI structure.
#[derive(Parser)]
#[command(name = "cove")]
#[command(author, version, about = "Cove - a C-family statement parser front end", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Parse a file and report syntax errors.
    Check {
        /// The file to check.
        file: String,
    },

    /// Parse a file and print its AST.
    Ast {
        /// The file to parse.
        file: String,
    },

    /// Print the token stream of a file.
    Tokens {
        /// The file to tokenize.
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { file } => commands::check::run(&file, cli.verbose),
        Commands::Ast { file } => commands::ast::run(&file),
        Commands::Tokens { file } => commands::tokens::run(&file),
    };

    if let Err(err) = result {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}
