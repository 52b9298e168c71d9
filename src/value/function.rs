use std::fmt;
use std::rc::Rc;

use super::Value;
use crate::ast::ParseNode;
use crate::environment::Environment;
use crate::error::EvalError;

pub type NativeFn = Rc<dyn Fn(&mut Environment) -> Result<Value, EvalError>>;

/// What a `Function` value actually points to. Interpreted functions
/// keep their body as a fully-owned `ParseNode::Block` (see the language
/// reference's note on owning tokens by value rather than borrowing into
/// a lex unit) so a `Function` value can outlive the parse call that
/// produced it without any lifetime bookkeeping.
pub enum FunctionRecord {
    Interpreted {
        name: Option<Rc<str>>,
        params: Vec<Rc<str>>,
        body: Rc<ParseNode>,
    },
    /// A native callable bound via `Environment::bind`. Reads its
    /// arguments off the environment's argument stack, matching the
    /// calling convention `Environment::call` uses for interpreted
    /// functions.
    Native(NativeFn),
}

impl fmt::Debug for FunctionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionRecord::Interpreted { name, params, .. } => f
                .debug_struct("Interpreted")
                .field("name", name)
                .field("arity", &params.len())
                .finish(),
            FunctionRecord::Native(_) => f.debug_tuple("Native").finish(),
        }
    }
}

impl FunctionRecord {
    pub fn arity(&self) -> Option<usize> {
        match self {
            FunctionRecord::Interpreted { params, .. } => Some(params.len()),
            FunctionRecord::Native(_) => None,
        }
    }
}
