use std::fmt;
use std::rc::Rc;

use super::Value;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::symbols::Separator;

/// Replaces the source's C-style vtable (`[refcount][vtable
/// pointer][destructor][payload]`) with a Rust capability trait: a host
/// type implements the slots it supports and inherits a `Null`/type-error
/// default for the rest, rather than populating a table of function
/// pointers. Destruction is handled by `Rc`'s own refcounting, so there is
/// no explicit destructor slot — `Drop` on the host type stands in for it.
pub trait NativeObject: fmt::Debug {
    fn type_name(&self) -> &str;

    fn call(&self, _env: &mut Environment, _args: &[Value]) -> Result<Value, EvalError> {
        Err(EvalError::type_error(format!(
            "{} is not callable",
            self.type_name()
        )))
    }

    fn index(&self, _key: &Value) -> Result<Value, EvalError> {
        Err(EvalError::type_error(format!(
            "{} does not support indexing",
            self.type_name()
        )))
    }

    fn set_index(&self, _key: &Value, _value: Value) -> Result<(), EvalError> {
        Err(EvalError::type_error(format!(
            "{} does not support index assignment",
            self.type_name()
        )))
    }

    fn ranged_index(&self, _lower: &Value, _upper: &Value) -> Result<Value, EvalError> {
        Err(EvalError::type_error(format!(
            "{} does not support ranged indexing",
            self.type_name()
        )))
    }

    fn length(&self) -> Result<Value, EvalError> {
        Err(EvalError::type_error(format!(
            "{} has no length",
            self.type_name()
        )))
    }

    fn binary_op(&self, _op: Separator, _rhs: &Value) -> Result<Value, EvalError> {
        Err(EvalError::type_error(format!(
            "{} does not support {:?}",
            self.type_name(),
            _op
        )))
    }

    fn prefix_increment(&self) -> Result<Value, EvalError> {
        Err(EvalError::type_error(format!(
            "{} does not support '++'",
            self.type_name()
        )))
    }

    fn postfix_increment(&self) -> Result<Value, EvalError> {
        self.prefix_increment()
    }

    fn prefix_decrement(&self) -> Result<Value, EvalError> {
        Err(EvalError::type_error(format!(
            "{} does not support '--'",
            self.type_name()
        )))
    }

    fn postfix_decrement(&self) -> Result<Value, EvalError> {
        self.prefix_decrement()
    }

    fn to_display_string(&self) -> String {
        format!("<native {}>", self.type_name())
    }
}

pub type NativeHandle = Rc<dyn NativeObject>;

/// A registered native class: `new Identifier(args)` looks this up by
/// name and delegates to its constructor. Plain function registration
/// (`Environment::bind`) is a separate, simpler path for native
/// functions that don't need a vtable.
#[derive(Clone)]
pub struct NativeClass {
    pub constructor: Rc<dyn Fn(&mut Environment, &[Value]) -> Result<Value, EvalError>>,
}

impl fmt::Debug for NativeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeClass").finish_non_exhaustive()
    }
}
