//! Storage cells.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::Object;

struct Slot {
    value: RefCell<Object>,
    readonly: Cell<bool>,
}

/// A shared, mutable cell holding one [`Object`].
///
/// Every variable, property, and array element lives in a `Pointer`.
/// Cloning shares the cell. Once frozen a cell stays read-only.
#[derive(Clone)]
pub struct Pointer(Rc<Slot>);

impl Pointer {
    pub fn new(obj: Object, readonly: bool) -> Self {
        Pointer(Rc::new(Slot {
            value: RefCell::new(obj),
            readonly: Cell::new(readonly),
        }))
    }

    /// The object currently stored.
    #[inline]
    pub fn obj(&self) -> Object {
        self.0.value.borrow().clone()
    }

    /// Store `obj`. Returns `false`, leaving the cell untouched, if it is
    /// read-only.
    pub fn set(&self, obj: Object) -> bool {
        if self.readonly() {
            return false;
        }
        *self.0.value.borrow_mut() = obj;
        true
    }

    /// Store `obj` regardless of the read-only flag. Initializers only.
    pub(crate) fn overwrite(&self, obj: Object) {
        *self.0.value.borrow_mut() = obj;
    }

    #[inline]
    pub fn readonly(&self) -> bool {
        self.0.readonly.get()
    }

    pub fn freeze(&self) {
        self.0.readonly.set(true);
    }

    /// Whether both handles refer to the same cell.
    #[inline]
    pub fn same(&self, other: &Pointer) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pointer")
            .field("ty", &self.0.value.borrow().ty())
            .field("readonly", &self.readonly())
            .finish()
    }
}
