// File: src/main.rs
//
// Command-line entry point for the rix interpreter.
// Evaluates an expression given with -e, a file given as a positional
// argument, or starts the interactive REPL with -i.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use log::debug;

use rix::repl::Repl;
use rix::Error;

#[derive(Parser)]
#[command(
    name = "rix",
    about = "A Rust implementation of the Nix expression language",
    version,
    long_about = None
)]
struct Cli {
    /// Evaluate an expression given on the command line
    #[arg(short = 'e', long = "expr", value_name = "EXPR")]
    expr: Option<String>,

    /// Start an interactive REPL
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Nix file to evaluate
    file: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(expr) = &cli.expr {
        debug!("evaluating expression from the command line");
        return eval_and_print(expr, Path::new("."));
    }

    if cli.interactive {
        debug!("starting interactive session");
        return match Repl::new().and_then(|mut repl| repl.run()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error: {}", err);
                ExitCode::FAILURE
            }
        };
    }

    if let Some(file) = &cli.file {
        debug!("evaluating file {}", file.display());
        let source = match fs::read_to_string(file) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("Error reading file: {}", err);
                return ExitCode::FAILURE;
            }
        };
        let base_dir = file.parent().unwrap_or_else(|| Path::new("."));
        return eval_and_print(&source, base_dir);
    }

    let _ = Cli::command().print_help();
    ExitCode::SUCCESS
}

fn eval_and_print(source: &str, base_dir: &Path) -> ExitCode {
    match rix::eval_str(source, base_dir) {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(Error::Parse(errors)) => {
            eprintln!("Parse error: {}", errors);
            ExitCode::FAILURE
        }
        Err(Error::Eval(error)) => {
            eprintln!("Evaluation error: {}", error);
            ExitCode::FAILURE
        }
    }
}
