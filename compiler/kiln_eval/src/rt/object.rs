//! Runtime values.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use kiln_ir::{FunctionId, Name, TypeId};

use super::{Pointer, PropertyMap};

/// A function reference, optionally bound to a receiver.
#[derive(Clone, Debug)]
pub struct FunctionStub {
    pub function: FunctionId,
    pub this: Option<Object>,
}

/// The representation an object carries besides its properties.
#[derive(Debug)]
pub enum ObjectValue {
    /// Null, class instances, dynamic objects, and prototypes.
    None,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Array(RefCell<Vec<Pointer>>),
    Function(FunctionStub),
    /// A cell reference produced by address-of.
    Pointer(Pointer),
}

struct ObjectData {
    ty: TypeId,
    value: ObjectValue,
    properties: PropertyMap,
    proto: Option<Object>,
}

/// A runtime value, shared by reference.
///
/// Identity is the allocation: clones are the same object. Property
/// lookups fall back to `proto` when the key is not an own property.
#[derive(Clone)]
pub struct Object(Rc<ObjectData>);

impl Object {
    pub fn new(ty: TypeId, value: ObjectValue, proto: Option<Object>) -> Self {
        Object(Rc::new(ObjectData {
            ty,
            value,
            properties: PropertyMap::new(),
            proto,
        }))
    }

    pub fn null() -> Self {
        Object::new(TypeId::NULL, ObjectValue::None, None)
    }

    #[inline]
    pub fn ty(&self) -> TypeId {
        self.0.ty
    }

    #[inline]
    pub fn value(&self) -> &ObjectValue {
        &self.0.value
    }

    #[inline]
    pub fn properties(&self) -> &PropertyMap {
        &self.0.properties
    }

    #[inline]
    pub fn proto(&self) -> Option<&Object> {
        self.0.proto.as_ref()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.ty == TypeId::NULL
    }

    /// Whether both handles refer to the same object.
    #[inline]
    pub fn same(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value() {
            ObjectValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.value() {
            ObjectValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.value() {
            ObjectValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// # Panics
    /// Panics if this is not a bool; the binder guarantees conditions are.
    pub fn bool_value(&self) -> bool {
        self.as_bool()
            .unwrap_or_else(|| panic!("expected a bool, found {self:?}"))
    }

    /// # Panics
    /// Panics if this is not a number.
    pub fn number_value(&self) -> f64 {
        self.as_number()
            .unwrap_or_else(|| panic!("expected a number, found {self:?}"))
    }

    /// # Panics
    /// Panics if this is not a string.
    pub fn string_value(&self) -> &str {
        match self.value() {
            ObjectValue::String(s) => s,
            _ => panic!("expected a string, found {self:?}"),
        }
    }

    /// # Panics
    /// Panics if this is not an array.
    pub fn array_value(&self) -> &RefCell<Vec<Pointer>> {
        match self.value() {
            ObjectValue::Array(elements) => elements,
            _ => panic!("expected an array, found {self:?}"),
        }
    }

    /// # Panics
    /// Panics if this is not a function.
    pub fn function_value(&self) -> &FunctionStub {
        match self.value() {
            ObjectValue::Function(stub) => stub,
            _ => panic!("expected a function, found {self:?}"),
        }
    }

    /// # Panics
    /// Panics if this is not a pointer.
    pub fn pointer_value(&self) -> &Pointer {
        match self.value() {
            ObjectValue::Pointer(ptr) => ptr,
            _ => panic!("expected a pointer, found {self:?}"),
        }
    }

    /// Whether `key` is an own property or reachable through the
    /// prototype chain.
    pub fn has_property(&self, key: &str) -> bool {
        let mut current = Some(self);
        while let Some(obj) = current {
            if obj.properties().contains(key) {
                return true;
            }
            current = obj.proto();
        }
        false
    }

    /// Cell for property `key` as seen by this object.
    ///
    /// See [`Object::property_addr_for_this`].
    pub fn property_addr(&self, key: &str, init: bool, for_write: bool) -> Option<Pointer> {
        self.property_addr_for_this(self, key, init, for_write)
    }

    /// Cell for property `key`, looked up on `self` and its prototype chain
    /// on behalf of `this`.
    ///
    /// `self` differs from `this` for `super` accesses, where the lookup
    /// starts at the base prototype. A hit on an object other than `this`
    /// is adapted to `this`:
    /// - reading an unbound method yields a read-only cell holding the
    ///   method bound to `this`
    /// - writing creates (or reuses) an own cell on `this`, copied from
    ///   the hit, so prototypes are never mutated through instances
    ///
    /// A complete miss yields a fresh null own cell on `self` when `init`
    /// is set, otherwise `None`.
    pub fn property_addr_for_this(
        &self,
        this: &Object,
        key: &str,
        init: bool,
        for_write: bool,
    ) -> Option<Pointer> {
        if let Some(ptr) = self.properties().get_addr(key, false) {
            if self.same(this) {
                return Some(ptr);
            }
            return Some(this.adopt(key, &ptr, for_write));
        }
        let mut fallback = self.proto();
        while let Some(holder) = fallback {
            if let Some(ptr) = holder.properties().get_addr(key, false) {
                return Some(this.adopt(key, &ptr, for_write));
            }
            fallback = holder.proto();
        }
        if init {
            return Some(self.properties().get_or_insert_addr(key));
        }
        None
    }

    fn adopt(&self, key: &str, found: &Pointer, for_write: bool) -> Pointer {
        if for_write {
            if let Some(own) = self.properties().get_addr(key, false) {
                return own;
            }
            return self
                .properties()
                .init_addr(Name::new(key), found.obj(), found.readonly());
        }
        let value = found.obj();
        match value.value() {
            ObjectValue::Function(stub) if stub.this.is_none() => {
                let bound = Object::new(
                    value.ty(),
                    ObjectValue::Function(FunctionStub {
                        function: stub.function,
                        this: Some(self.clone()),
                    }),
                    None,
                );
                Pointer::new(bound, true)
            }
            _ => found.clone(),
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("ty", &self.ty())
            .field("value", self.value())
            .field("properties", self.properties())
            .finish()
    }
}

/// Largest array a sized `new` or an index write may produce.
pub const MAX_ARRAY_LENGTH: u32 = 1 << 24;

/// Truncate `n` to an array length, or `None` when it is negative, not
/// finite, or above [`MAX_ARRAY_LENGTH`].
pub fn array_length(n: f64) -> Option<usize> {
    if !(0.0..=f64::from(MAX_ARRAY_LENGTH)).contains(&n) {
        return None;
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "range checked above; fractions truncate"
    )]
    let len = n as usize;
    Some(len)
}

/// Truncate `n` to an array index. Indices stay below
/// [`MAX_ARRAY_LENGTH`] so growing to `index + 1` elements is in range.
pub fn array_index(n: f64) -> Option<usize> {
    array_length(n).filter(|&index| index < MAX_ARRAY_LENGTH as usize)
}

/// The equality rule of `==`, `!=`, and `switch`.
///
/// Identity, except that primitives compare by value and any two nulls are
/// equal.
#[expect(clippy::float_cmp, reason = "language equality is exact")]
pub fn objects_equal(a: &Object, b: &Object) -> bool {
    if a.same(b) {
        return true;
    }
    match (a.value(), b.value()) {
        (ObjectValue::Bool(x), ObjectValue::Bool(y)) => x == y,
        (ObjectValue::Number(x), ObjectValue::Number(y)) => x == y,
        (ObjectValue::String(x), ObjectValue::String(y)) => x == y,
        _ => a.is_null() && b.is_null(),
    }
}
