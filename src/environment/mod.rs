//! The runtime environment: string interning, the global table, native
//! registration, the argument-passing stack, and the `compile`/`bind`/
//! `call` entry points an embedder drives.
//!
//! Grounded on the teacher's `Interpreter::from_ast` constructor
//! (`interpreter/mod.rs`), generalized from owning just an AST to owning
//! every responsibility the language reference's Environment module
//! names. There is no stored `ExecutionProvider` field: the tree-walking
//! evaluator in `crate::interpreter` is invoked directly rather than
//! boxed behind a trait object, which would otherwise need a
//! self-referential `&mut Environment` borrow while already borrowed by
//! the provider that's supposed to be calling back into it. The
//! `ExecutionProvider` trait itself still exists, documenting the
//! contract, but `TreeWalkProvider` is a stateless marker invoked as a
//! free function.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::error::{Error, EvalError};
use crate::interpreter;
use crate::lexer::Lexer;
use crate::parser;
use crate::value::{FunctionRecord, NativeClass, NativeFn, Table, Value};

/// Compiles and runs scripts. The default (and only) strategy is a
/// tree-walking evaluator over the parsed AST; see `crate::interpreter`.
pub trait ExecutionProvider {
    fn compile(&self, env: &mut Environment, source: &str) -> Result<Value, Error>;
    fn bind(&self, env: &mut Environment, native: NativeFn) -> Value;
    fn call(&self, env: &mut Environment, callee: &Value, args: Vec<Value>) -> Result<Value, EvalError>;
}

/// Stateless marker implementing `ExecutionProvider` via the tree-walk
/// evaluator in `crate::interpreter`. Not stored on `Environment` —
/// constructed on demand at each call site.
pub struct TreeWalkProvider;

impl ExecutionProvider for TreeWalkProvider {
    fn compile(&self, env: &mut Environment, source: &str) -> Result<Value, Error> {
        env.compile(source)
    }

    fn bind(&self, env: &mut Environment, native: NativeFn) -> Value {
        env.bind(native)
    }

    fn call(&self, env: &mut Environment, callee: &Value, args: Vec<Value>) -> Result<Value, EvalError> {
        env.call(callee, args)
    }
}

pub struct Environment {
    interned: RefCell<HashSet<Rc<str>>>,
    /// Host/interpreter-installed string methods (`"abc".upper()`-style
    /// dispatch). Empty by default: a standard library is an explicit
    /// non-goal, but the mechanism an embedder would use to populate one
    /// is implemented.
    string_vtable: Table,
    native_classes: RefCell<HashMap<Rc<str>, NativeClass>>,
    globals: Table,
    arg_stack: RefCell<Vec<Vec<Value>>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        log::trace!("constructing a fresh environment");
        Self {
            interned: RefCell::new(HashSet::new()),
            string_vtable: Table::new(),
            native_classes: RefCell::new(HashMap::new()),
            globals: Table::new(),
            arg_stack: RefCell::new(Vec::new()),
        }
    }

    /// Interns `text`, returning the shared `Rc<str>` for it. Repeated
    /// calls with equal content return the *same* allocation (verified by
    /// `Rc::ptr_eq`), matching the language reference's interning
    /// property.
    pub fn intern(&self, text: &str) -> Rc<str> {
        if let Some(existing) = self.interned.borrow().get(text) {
            return Rc::clone(existing);
        }
        let rc: Rc<str> = Rc::from(text);
        self.interned.borrow_mut().insert(Rc::clone(&rc));
        rc
    }

    pub fn string_vtable(&self) -> &Table {
        &self.string_vtable
    }

    pub fn globals(&self) -> &Table {
        &self.globals
    }

    pub fn register_native_class(&self, name: &str, class: NativeClass) {
        self.native_classes
            .borrow_mut()
            .insert(self.intern(name), class);
    }

    /// Looks up a registered native class by name. Unlike a missing table
    /// key (which resolves to `Null`), an unregistered native class name
    /// is a `LookupError` — the narrower case the language reference
    /// reserves that error kind for.
    pub fn get_native_class(&self, name: &str) -> Result<NativeClass, EvalError> {
        self.native_classes
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::lookup(format!("no native class named '{name}'")))
    }

    /// Pushes a fresh argument frame (a function call's positional
    /// arguments), returning control to the caller once the callee has
    /// read what it needs via `arg`.
    pub fn push_args(&self, args: Vec<Value>) {
        self.arg_stack.borrow_mut().push(args);
    }

    pub fn pop_args(&self) {
        self.arg_stack.borrow_mut().pop();
    }

    pub fn arg(&self, index: usize) -> Value {
        self.arg_stack
            .borrow()
            .last()
            .and_then(|frame| frame.get(index))
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub fn arg_count(&self) -> usize {
        self.arg_stack.borrow().last().map(Vec::len).unwrap_or(0)
    }

    /// Lexes and parses `source`, wrapping the resulting top-level block
    /// as a zero-argument `Function` value the caller runs via `call`.
    pub fn compile(&mut self, source: &str) -> Result<Value, Error> {
        let tokens = Lexer::new(source).lex()?;
        let body = parser::parse(&tokens)?;
        log::debug!("compiled {} top-level statement(s)", body.len());
        let record = FunctionRecord::Interpreted {
            name: None,
            params: Vec::new(),
            body: Rc::new(crate::ast::ParseNode::Block(body)),
        };
        Ok(Value::Function(Rc::new(record)))
    }

    /// Registers a native function, returning the `Value` a script binds
    /// it to (e.g. by inserting into `globals`).
    pub fn bind(&mut self, native: NativeFn) -> Value {
        Value::Function(Rc::new(FunctionRecord::Native(native)))
    }

    /// Invokes a callable value with already-evaluated arguments.
    pub fn call(&mut self, callee: &Value, args: Vec<Value>) -> Result<Value, EvalError> {
        interpreter::call_value(self, callee, args)
    }
}
