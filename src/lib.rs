// File: src/lib.rs
//
// Library interface for the rix interpreter.
// Exposes the pipeline stages individually plus one-call helpers that
// run source text through all of them.

pub mod ast;
pub mod builtins;
pub mod derivation;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod repl;

use std::fmt;
use std::path::Path;

pub use crate::interpreter::{Evaluator, Value};

use crate::errors::{EvalError, ParseErrors};
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Which pipeline stage a failure came from. The CLI uses this to pick
/// its `Parse error:` / `Evaluation error:` prefix.
#[derive(Debug)]
pub enum Error {
    Parse(ParseErrors),
    Eval(EvalError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(errors) => errors.fmt(f),
            Error::Eval(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for Error {}

/// Parses source text into an expression tree.
pub fn parse_str(source: &str) -> Result<ast::Expr, ParseErrors> {
    Parser::new(Lexer::new(source)).parse()
}

/// Runs source text through the whole pipeline, resolving relative path
/// literals against `base_dir`.
pub fn eval_str(source: &str, base_dir: &Path) -> Result<Value, Error> {
    let expr = parse_str(source).map_err(Error::Parse)?;
    Evaluator::new(base_dir).eval(&expr).map_err(Error::Eval)
}
