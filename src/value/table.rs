use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::Value;

/// An open-addressed map from `Value` to `Value`, reference-counted so
/// table values share storage on copy the way `String`/`Array` do.
/// Doubles as a virtual table: a native class's operator slots live in
/// an ordinary table under reserved string keys (see `NativeObject`).
#[derive(Debug, Clone, Default)]
pub struct Table {
    entries: Rc<RefCell<HashMap<Value, Value>>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn set(&self, key: Value, value: Value) {
        self.entries.borrow_mut().insert(key, value);
    }

    pub fn contains(&self, key: &Value) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ptr_eq(&self, other: &Table) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }

    /// A stable per-allocation identity, used for `Hash`/`Eq` on `Value`
    /// where tables compare and hash by identity rather than content.
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.entries) as usize
    }
}
