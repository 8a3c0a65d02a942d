// File: src/main.rs
//
// Main entry point for the Slate programming language interpreter.
// Reads a source file and drives the four pipeline stages in order:
// lexing, parsing, semantic analysis, execution. The first failing stage
// aborts the pipeline; its diagnostic is printed to stderr and the process
// exits with a non-zero status.

use clap::Parser as ClapParser;
use slate::analyzer::SemanticAnalyzer;
use slate::errors::SlateError;
use slate::executor::Executor;
use slate::lexer;
use slate::parser::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(ClapParser)]
#[command(
    name = "slate",
    about = "Slate: a small imperative teaching language",
    version = env!("CARGO_PKG_VERSION"),
    long_about = None
)]
struct Cli {
    /// Path to the .slate source file
    file: PathBuf,
}

fn run_file(path: &PathBuf) -> Result<(), SlateError> {
    let source = fs::read_to_string(path).map_err(|e| {
        SlateError::lex_error(
            format!("Could not read '{}': {}", path.display(), e),
            slate::errors::SourceLocation::unknown(),
        )
    })?;

    let tokens = lexer::tokenize(&source)?;
    let program = Parser::new(tokens).parse()?;
    SemanticAnalyzer::new().analyze(&program)?;
    Executor::new().run(&program)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_file(&cli.file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
