//! Lowers a flat token stream into a block of parse nodes.
//!
//! Grounded on the teacher's three-phase `ast/parser.rs` -> `ast/mod.rs`
//! pipeline, generalized from a `pest` grammar to the hand-rolled,
//! mutually-recursive `parse_block`/`parse_group`/`parse_ast` routines
//! the language reference specifies (a flat token stream, not a PEG).
//! Error reporting keeps the teacher's shape: a `ParseError{message,
//! position}` with a hand-written `Display`.

mod block;
mod brackets;
mod expr;

pub use block::parse_program;
pub(crate) use brackets::*;
pub(crate) use expr::*;

use crate::ast::ParseNode;
use crate::error::ParseError;
use crate::lexer::Token;

/// Parse a full program: a flat sequence of top-level statement nodes.
pub fn parse(tokens: &[Token]) -> Result<Vec<ParseNode>, ParseError> {
    parse_program(tokens)
}
