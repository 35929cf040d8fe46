//! Native functions bound to `Intrinsic` bodies.
//!
//! A function whose body is [`FunctionBody::Intrinsic`](kiln_ir::FunctionBody)
//! carries a token such as `kiln:print`; calling it runs the native function
//! registered under that token. Arity and argument types are the binder's
//! responsibility, so intrinsics destructure their arguments directly.

use kiln_ir::{Name, Span};
use rustc_hash::FxHashMap;

use crate::errors;
use crate::interpreter::{display, Interpreter};
use crate::rt::{Object, ObjectValue, Unwind};

/// Arguments of one intrinsic call.
pub struct IntrinsicCall<'a> {
    /// The call site.
    pub span: Span,
    pub this: Option<&'a Object>,
    pub args: &'a [Object],
}

pub type IntrinsicFn =
    fn(&mut Interpreter<'_>, IntrinsicCall<'_>) -> Result<Option<Object>, Unwind>;

/// Token to native function table.
#[derive(Clone, Default)]
pub struct IntrinsicRegistry {
    table: FxHashMap<Name, IntrinsicFn>,
}

impl IntrinsicRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the `kiln:` built-ins.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("kiln:print", intrinsic_print);
        registry.register("kiln:println", intrinsic_println);
        registry.register("kiln:dynamic:get", intrinsic_dynamic_get);
        registry.register("kiln:dynamic:set", intrinsic_dynamic_set);
        registry.register("kiln:is_function", intrinsic_is_function);
        registry.register("kiln:array:length", intrinsic_array_length);
        registry
    }

    /// Register `function` under `token`, replacing any previous entry.
    pub fn register(&mut self, token: impl Into<Name>, function: IntrinsicFn) {
        self.table.insert(token.into(), function);
    }

    pub fn get(&self, token: &str) -> Option<IntrinsicFn> {
        self.table.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.table.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Registered tokens, sorted.
    pub fn tokens(&self) -> Vec<Name> {
        let mut tokens: Vec<Name> = self.table.keys().cloned().collect();
        tokens.sort();
        tokens
    }
}

fn intrinsic_print(
    interp: &mut Interpreter<'_>,
    call: IntrinsicCall<'_>,
) -> Result<Option<Object>, Unwind> {
    let [value] = call.args else {
        panic!("kiln:print expects 1 argument, got {}", call.args.len());
    };
    interp
        .print_handler()
        .print(&display(interp.program(), value));
    Ok(None)
}

fn intrinsic_println(
    interp: &mut Interpreter<'_>,
    call: IntrinsicCall<'_>,
) -> Result<Option<Object>, Unwind> {
    let [value] = call.args else {
        panic!("kiln:println expects 1 argument, got {}", call.args.len());
    };
    interp
        .print_handler()
        .println(&display(interp.program(), value));
    Ok(None)
}

/// Property key for a dynamic access: strings as-is, anything else by its
/// string form.
fn dynamic_key(interp: &Interpreter<'_>, key: &Object) -> Name {
    match key.as_str() {
        Some(text) => Name::new(text),
        None => Name::from(display(interp.program(), key)),
    }
}

/// `get(obj, key)`: read a property, creating a null one if missing.
fn intrinsic_dynamic_get(
    interp: &mut Interpreter<'_>,
    call: IntrinsicCall<'_>,
) -> Result<Option<Object>, Unwind> {
    let [obj, key] = call.args else {
        panic!("kiln:dynamic:get expects 2 arguments, got {}", call.args.len());
    };
    interp.check_this(call.span, obj)?;
    let key = dynamic_key(interp, key);
    let Some(cell) = interp.object_or_super_property(obj, None, &key, true, false) else {
        unreachable!("property cells are created on demand");
    };
    Ok(Some(cell.obj()))
}

/// `set(obj, key, value)`: write a property. Writing a read-only property
/// throws.
fn intrinsic_dynamic_set(
    interp: &mut Interpreter<'_>,
    call: IntrinsicCall<'_>,
) -> Result<Option<Object>, Unwind> {
    let [obj, key, value] = call.args else {
        panic!("kiln:dynamic:set expects 3 arguments, got {}", call.args.len());
    };
    interp.check_this(call.span, obj)?;
    let key = dynamic_key(interp, key);
    let Some(cell) = interp.object_or_super_property(obj, None, &key, true, true) else {
        unreachable!("property cells are created on demand");
    };
    if cell.readonly() {
        return Err(interp.throw_message(call.span, &errors::readonly_property(&key)));
    }
    if let Some(hooks) = &interp.hooks {
        let old = cell.obj();
        hooks.on_variable_assign(call.span, Some(obj), &key, Some(&old), value);
    }
    cell.set(value.clone());
    Ok(None)
}

fn intrinsic_is_function(
    interp: &mut Interpreter<'_>,
    call: IntrinsicCall<'_>,
) -> Result<Option<Object>, Unwind> {
    let [value] = call.args else {
        panic!("kiln:is_function expects 1 argument, got {}", call.args.len());
    };
    let is = matches!(value.value(), ObjectValue::Function(_));
    Ok(Some(interp.alloc.new_bool(call.span, is)))
}

fn intrinsic_array_length(
    interp: &mut Interpreter<'_>,
    call: IntrinsicCall<'_>,
) -> Result<Option<Object>, Unwind> {
    let [array] = call.args else {
        panic!("kiln:array:length expects 1 argument, got {}", call.args.len());
    };
    interp.check_this(call.span, array)?;
    #[allow(clippy::cast_precision_loss, reason = "lengths stay far below 2^53")]
    let len = array.array_value().borrow().len() as f64;
    Ok(Some(interp.alloc.new_number(call.span, len)))
}
