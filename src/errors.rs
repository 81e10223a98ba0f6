// File: src/errors.rs
//
// Error types for the two phases of the pipeline.
// Parse errors accumulate so a single run can report every syntax
// problem with its location; evaluation errors abort at the first
// occurrence and carry the position of the failing construct.

use std::fmt;

use crate::ast::SourcePos;

/// A single syntax error with its source location.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse error at line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

/// Every syntax error collected during one parse.
#[derive(Debug, Clone, Default)]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

impl ParseErrors {
    pub fn new() -> Self {
        ParseErrors::default()
    }

    pub fn add(&mut self, line: usize, column: usize, message: impl Into<String>) {
        self.errors.push(ParseError {
            line,
            column,
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }

    pub fn first(&self) -> Option<&ParseError> {
        self.errors.first()
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => f.write_str("no errors"),
            [single] => single.fmt(f),
            many => {
                write!(f, "{} parse errors:", many.len())?;
                for err in many {
                    write!(f, "\n{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ParseErrors {}

/// The ways evaluation can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalErrorKind {
    UndefinedVariable,
    TypeMismatch,
    DivisionByZero,
    MissingAttr,
    AttrPathConflict,
    AssertionFailed,
    Arity,
    NonFunctionApply,
    InvalidDerivation,
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvalErrorKind::UndefinedVariable => "undefined variable",
            EvalErrorKind::TypeMismatch => "type mismatch",
            EvalErrorKind::DivisionByZero => "division by zero",
            EvalErrorKind::MissingAttr => "missing attribute",
            EvalErrorKind::AttrPathConflict => "attribute path conflict",
            EvalErrorKind::AssertionFailed => "assertion failed",
            EvalErrorKind::Arity => "wrong number of arguments",
            EvalErrorKind::NonFunctionApply => "not a function",
            EvalErrorKind::InvalidDerivation => "invalid derivation",
        };
        f.write_str(name)
    }
}

/// A runtime error. The position is filled in by the evaluator at the
/// node where the failure surfaced; errors raised inside built-ins start
/// without one.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub message: String,
    pub pos: Option<SourcePos>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, message: impl Into<String>) -> Self {
        EvalError {
            kind,
            message: message.into(),
            pos: None,
        }
    }

    pub fn with_pos(kind: EvalErrorKind, message: impl Into<String>, pos: SourcePos) -> Self {
        EvalError {
            kind,
            message: message.into(),
            pos: Some(pos),
        }
    }

    /// Attaches a position if none has been recorded yet. Used at
    /// evaluation seams so the innermost located construct wins.
    pub fn at(mut self, pos: SourcePos) -> Self {
        if self.pos.is_none() {
            self.pos = Some(pos);
        }
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos {
            Some(pos) => write!(f, "{} (at {})", self.message, pos),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for EvalError {}
