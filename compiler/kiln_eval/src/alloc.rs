//! Object allocation.
//!
//! Every object the evaluator creates goes through [`Allocator`] so that
//! the new-object hook sees it.

use kiln_ir::{Constant, FunctionId, Name, Span, TypeId};

use crate::hooks::SharedHooks;
use crate::rt::{FunctionStub, Object, ObjectValue, Pointer};

pub struct Allocator {
    hooks: Option<SharedHooks>,
}

impl Allocator {
    pub fn new(hooks: Option<SharedHooks>) -> Self {
        Allocator { hooks }
    }

    fn track(&self, span: Span, obj: Object) -> Object {
        if let Some(hooks) = &self.hooks {
            hooks.on_new_object(span, &obj);
        }
        obj
    }

    pub fn new_object(&self, span: Span, ty: TypeId, proto: Option<Object>) -> Object {
        self.track(span, Object::new(ty, ObjectValue::None, proto))
    }

    pub fn new_null(&self, span: Span) -> Object {
        self.track(span, Object::null())
    }

    pub fn new_bool(&self, span: Span, value: bool) -> Object {
        self.track(span, Object::new(TypeId::BOOL, ObjectValue::Bool(value), None))
    }

    pub fn new_number(&self, span: Span, value: f64) -> Object {
        self.track(
            span,
            Object::new(TypeId::NUMBER, ObjectValue::Number(value), None),
        )
    }

    pub fn new_string(&self, span: Span, value: &str) -> Object {
        self.track(
            span,
            Object::new(TypeId::STRING, ObjectValue::String(value.into()), None),
        )
    }

    pub fn new_array(&self, span: Span, ty: TypeId, elements: Vec<Pointer>) -> Object {
        self.track(
            span,
            Object::new(ty, ObjectValue::Array(elements.into()), None),
        )
    }

    pub fn new_function(
        &self,
        span: Span,
        ty: TypeId,
        function: FunctionId,
        this: Option<Object>,
    ) -> Object {
        self.track(
            span,
            Object::new(
                ty,
                ObjectValue::Function(FunctionStub { function, this }),
                None,
            ),
        )
    }

    pub fn new_pointer(&self, span: Span, ty: TypeId, ptr: Pointer) -> Object {
        self.track(span, Object::new(ty, ObjectValue::Pointer(ptr), None))
    }

    /// Lift a host constant into a runtime object.
    ///
    /// Arrays become `dynamic[]`; objects become dynamic property bags
    /// without a prototype.
    pub fn new_constant(&self, span: Span, constant: &Constant) -> Object {
        match constant {
            Constant::Null => self.new_null(span),
            Constant::Bool(b) => self.new_bool(span, *b),
            Constant::Number(n) => self.new_number(span, *n),
            Constant::String(s) => self.new_string(span, s),
            Constant::Array(items) => {
                let elements = items
                    .iter()
                    .map(|item| Pointer::new(self.new_constant(span, item), false))
                    .collect();
                self.new_array(span, TypeId::DYNAMIC_ARRAY, elements)
            }
            Constant::Object(props) => {
                let obj = self.new_object(span, TypeId::DYNAMIC, None);
                for (key, value) in props {
                    let value = self.new_constant(span, value);
                    obj.properties().init_addr(Name::clone(key), value, false);
                }
                obj
            }
        }
    }
}
