use std::cell::RefCell;
use std::rc::Rc;

use super::Value;

/// Two shapes: a *managed* array owns a growable `Vec<Value>`; a *view*
/// borrows a managed array's storage through an `(offset, length)`
/// window. Cloning a view bumps the same `Rc`, so the backing storage
/// outlives any view into it.
#[derive(Debug, Clone)]
pub enum Array {
    Managed(Rc<RefCell<Vec<Value>>>),
    View {
        base: Rc<RefCell<Vec<Value>>>,
        offset: usize,
        length: usize,
    },
}

impl Array {
    pub fn new(items: Vec<Value>) -> Self {
        Array::Managed(Rc::new(RefCell::new(items)))
    }

    pub fn len(&self) -> usize {
        match self {
            Array::Managed(v) => v.borrow().len(),
            Array::View { length, .. } => *length,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn storage(&self) -> &Rc<RefCell<Vec<Value>>> {
        match self {
            Array::Managed(v) => v,
            Array::View { base, .. } => base,
        }
    }

    fn base_offset(&self) -> usize {
        match self {
            Array::Managed(_) => 0,
            Array::View { offset, .. } => *offset,
        }
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        if index >= self.len() {
            return None;
        }
        self.storage().borrow().get(self.base_offset() + index).cloned()
    }

    pub fn set(&self, index: usize, value: Value) -> bool {
        if index >= self.len() {
            return false;
        }
        let abs = self.base_offset() + index;
        if let Some(slot) = self.storage().borrow_mut().get_mut(abs) {
            *slot = value;
            true
        } else {
            false
        }
    }

    /// Appends in place to the *underlying* storage — per the language
    /// reference, `+` on an array mutates the shared storage rather than
    /// copying, even through a view.
    pub fn push(&self, value: Value) {
        self.storage().borrow_mut().push(value);
    }

    /// An inclusive `[lower, upper]` sub-array view, with negative
    /// indices counting from the end and bounds swapped if `lower > upper`.
    pub fn slice(&self, lower: isize, upper: isize) -> Array {
        let len = self.len() as isize;
        let normalize = |i: isize| -> isize {
            if i < 0 {
                (len + i).max(0)
            } else {
                i.min(len.saturating_sub(1).max(0))
            }
        };
        let (mut lo, mut hi) = (normalize(lower), normalize(upper));
        if lo > hi {
            std::mem::swap(&mut lo, &mut hi);
        }
        if len == 0 {
            return Array::View {
                base: Rc::clone(self.storage()),
                offset: self.base_offset(),
                length: 0,
            };
        }
        let offset = self.base_offset() + lo as usize;
        let length = (hi - lo + 1).max(0) as usize;
        Array::View {
            base: Rc::clone(self.storage()),
            offset,
            length,
        }
    }

    pub fn iter(&self) -> Vec<Value> {
        (0..self.len()).filter_map(|i| self.get(i)).collect()
    }

    pub fn ptr_eq(&self, other: &Array) -> bool {
        Rc::ptr_eq(self.storage(), other.storage())
    }

    /// A stable per-allocation identity, used for `Hash`/`Eq` on `Value`
    /// where arrays compare and hash by storage identity rather than
    /// content (two views into the same storage share an identity).
    pub fn identity(&self) -> usize {
        Rc::as_ptr(self.storage()) as usize
    }
}
