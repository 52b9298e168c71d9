//! In-memory representation of expressions, statements and declarations.
//!
//! Grounded on the teacher's one-file-per-node-shape layout in `ast/`
//! (`ast/if_statement.rs`, `ast/fn_def.rs`, `ast/binary_expr.rs`, ...),
//! generalized from the teacher's typed, pest-derived node structs to the
//! single recursive `ParseNode`/`Ast` pair the language reference
//! specifies: a flat token stream lowers into one recursive tree, not a
//! family of per-construct types.

mod node;
mod function;

pub use node::*;
pub use function::*;

use crate::error::Position;
use crate::lexer::Token;
use crate::symbols::Separator;

/// `(operation, operands)`. The sentinel operation `Separator::Space`
/// denotes a pass-through wrapper holding a single operand — used both
/// for bare leaves (an identifier or literal token wrapped as a
/// single-operand `Space` node) and for keyword-qualified identifiers
/// such as `local x`, which keep their `local`/`const` modifiers as
/// leading operands ahead of the assignable.
///
/// `position` is the node's best-effort source position — the operator
/// token for a binary/unary/ternary node, the leaf token for a literal
/// or identifier, the callee's/target's position for a call or index.
/// The interpreter stamps every `EvalError` it raises while evaluating a
/// node with this position (see `EvalError::at` in `crate::error`),
/// which is how spec.md §7's "runtime errors must surface with the AST
/// node being evaluated" is actually met.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    pub operation: Separator,
    pub operands: Vec<ParseNode>,
    pub position: Position,
}

impl Ast {
    pub fn empty() -> Self {
        Self {
            operation: Separator::Space,
            operands: Vec::new(),
            position: (0, 0),
        }
    }

    pub fn leaf(token: Token) -> Self {
        let position = token.position;
        Self {
            operation: Separator::Space,
            operands: vec![ParseNode::Token(token)],
            position,
        }
    }

    pub fn unary(operation: Separator, operand: Ast, position: Position) -> Self {
        Self {
            operation,
            operands: vec![ParseNode::Expression(Box::new(operand))],
            position,
        }
    }

    pub fn binary(operation: Separator, lhs: Ast, rhs: Ast, position: Position) -> Self {
        Self {
            operation,
            operands: vec![
                ParseNode::Expression(Box::new(lhs)),
                ParseNode::Expression(Box::new(rhs)),
            ],
            position,
        }
    }

    pub fn ternary(cond: Ast, if_true: Ast, if_false: Ast, position: Position) -> Self {
        Self {
            operation: Separator::Ternary,
            operands: vec![
                ParseNode::Expression(Box::new(cond)),
                ParseNode::Expression(Box::new(if_true)),
                ParseNode::Expression(Box::new(if_false)),
            ],
            position,
        }
    }

    pub fn call(callee: Ast, args: Vec<Ast>) -> Self {
        let position = callee.position;
        let mut operands = vec![ParseNode::Expression(Box::new(callee))];
        operands.extend(args.into_iter().map(|a| ParseNode::Expression(Box::new(a))));
        Self {
            operation: Separator::Call,
            operands,
            position,
        }
    }

    pub fn index(target: Ast, selector: Ast) -> Self {
        let position = target.position;
        Self {
            operation: Separator::Index,
            operands: vec![
                ParseNode::Expression(Box::new(target)),
                ParseNode::Expression(Box::new(selector)),
            ],
            position,
        }
    }

    pub fn ranged_index(target: Ast, lower: Ast, upper: Ast) -> Self {
        let position = target.position;
        Self {
            operation: Separator::Index,
            operands: vec![
                ParseNode::Expression(Box::new(target)),
                ParseNode::Expression(Box::new(lower)),
                ParseNode::Expression(Box::new(upper)),
            ],
            position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.operation == Separator::Space && self.operands.is_empty()
    }

    /// If this AST is a bare `Space`-wrapped single token, return it.
    pub fn as_leaf_token(&self) -> Option<&Token> {
        if self.operation != Separator::Space || self.operands.len() != 1 {
            return None;
        }
        match &self.operands[0] {
            ParseNode::Token(t) => Some(t),
            _ => None,
        }
    }
}
