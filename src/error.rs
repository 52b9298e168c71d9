//! Error taxonomy for the lexer, parser and interpreter.
//!
//! Grounded on the teacher's `ast/parse_error.rs`: a plain struct with a
//! hand-written `Display`/`std::error::Error` impl, no `thiserror`. The
//! redesign in the language reference asks for evaluation to return
//! explicit error values instead of silently substituting `Null` on a
//! type mismatch; `EvalError` is that promotion.

use std::fmt;

pub type Position = (usize, usize);

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lex error at {}:{}: {}",
            self.position.0, self.position.1, self.message
        )
    }
}

impl std::error::Error for LexError {}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub position: Position,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse error at {}:{}: {}",
            self.position.0, self.position.1, self.message
        )
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    pub fn unsupported(feature: &str, position: Position) -> Self {
        Self::new(format!("'{feature}' is not supported"), position)
    }
}

/// Runtime error taxonomy, per the language reference's error-handling
/// design: type mismatches, absent-key lookups, out-of-range indices and
/// native-call arity mismatches are explicit errors rather than `Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    Type,
    Lookup,
    Bounds,
    Arity,
}

/// Per spec.md §7: "runtime errors must surface with the AST node being
/// evaluated." `position` carries that node's source position; it starts
/// at the placeholder `(0, 0)` where the error is raised (most runtime
/// helpers — `value::binary_op`, `Environment::get_native_class`, ... —
/// have no AST node in scope to draw one from) and is filled in by `at`
/// as the error unwinds back through `eval_expr`/`exec_statement` in
/// `crate::interpreter`, which do hold the node.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub kind: ErrorKind,
    pub message: String,
    pub position: Position,
}

impl EvalError {
    pub fn type_error(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Type,
            message: message.into(),
            position: (0, 0),
        }
    }

    pub fn lookup(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Lookup,
            message: message.into(),
            position: (0, 0),
        }
    }

    pub fn bounds(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Bounds,
            message: message.into(),
            position: (0, 0),
        }
    }

    pub fn arity(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Arity,
            message: message.into(),
            position: (0, 0),
        }
    }

    /// Stamps this error with `position` unless it already carries a
    /// more specific one set closer to the actual fault. Called at every
    /// `eval_expr`/`exec_statement` boundary so an error raised deep in a
    /// helper with no AST in scope still ends up tagged with the
    /// innermost node that was being evaluated when it happened.
    pub fn at(mut self, position: Position) -> Self {
        if self.position == (0, 0) {
            self.position = position;
        }
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} error at {}:{}: {}",
            self.kind, self.position.0, self.position.1, self.message
        )
    }
}

impl std::error::Error for EvalError {}

/// The union of everything that can go wrong compiling and running a
/// script, surfaced to embedders through `Environment::compile`.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Lex(LexError),
    Parse(ParseError),
    Eval(EvalError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lex(e) => e.fmt(f),
            Error::Parse(e) => e.fmt(f),
            Error::Eval(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Error {}

impl From<LexError> for Error {
    fn from(value: LexError) -> Self {
        Error::Lex(value)
    }
}

impl From<ParseError> for Error {
    fn from(value: ParseError) -> Self {
        Error::Parse(value)
    }
}

impl From<EvalError> for Error {
    fn from(value: EvalError) -> Self {
        Error::Eval(value)
    }
}
