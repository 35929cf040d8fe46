//! Loads of symbols and members, and the l-values assignments go through.

use kiln_ir::{
    Expr, ExprKind, FunctionOwner, LocalRole, ModuleId, Name, Span, Symbol, TypeId, UnaryOp,
    VariableOwner,
};

use super::{display, Interpreter};
use crate::errors;
use crate::rt::{array_index, Object, ObjectValue, Pointer, Unwind};

/// A resolved storage location.
///
/// Produced by symbol and member loads. `this` is the object owning the
/// cell (`None` for locals, globals, and statics); `name` is the simple
/// member name used for hooks and diagnostics.
#[derive(Clone, Debug)]
pub struct Location {
    this: Option<Object>,
    name: Name,
    ty: TypeId,
    lval: bool,
    cell: Pointer,
}

impl Location {
    pub(crate) fn new(this: Option<Object>, name: Name, ty: TypeId, lval: bool, cell: Pointer) -> Self {
        Location {
            this,
            name,
            ty,
            lval,
            cell,
        }
    }

    pub fn this(&self) -> Option<&Object> {
        self.this.as_ref()
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Static type of the location.
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    /// Whether the location was loaded for writing.
    pub fn is_lval(&self) -> bool {
        self.lval
    }

    pub fn cell(&self) -> &Pointer {
        &self.cell
    }

    /// The object currently stored.
    pub fn value(&self) -> Object {
        self.cell.obj()
    }

    /// Store `value`, reporting a diagnostic instead if the cell is
    /// read-only. Returns whether the store happened.
    pub fn assign(&self, interpreter: &Interpreter<'_>, span: Span, value: Object) -> bool {
        if self.cell.readonly() {
            interpreter
                .sink
                .emit(errors::readonly_lvalue(span, &self.name));
            return false;
        }
        if let Some(hooks) = &interpreter.hooks {
            let old = self.cell.obj();
            hooks.on_variable_assign(span, self.this.as_ref(), &self.name, Some(&old), &value);
        }
        self.cell.set(value)
    }
}

impl Interpreter<'_> {
    /// Evaluate an expression that denotes storage.
    ///
    /// # Panics
    /// Panics if `expr` is not a load or a dereference.
    pub(crate) fn eval_lvalue(&mut self, expr: &Expr) -> Result<Location, Unwind> {
        match &expr.kind {
            ExprKind::LoadLocation { object, symbol } => {
                self.eval_load_location(expr.span, object.as_deref(), *symbol, true)
            }
            ExprKind::LoadDynamic { object, name } => {
                self.eval_load_dynamic(expr.span, object, name, true)
            }
            ExprKind::Unary {
                op: UnaryOp::Dereference,
                operand,
                ..
            } => {
                let pointer = self.eval_expr(operand)?;
                self.check_this(operand.span, &pointer)?;
                let cell = pointer.pointer_value().clone();
                Ok(Location::new(None, Name::new(""), expr.ty, true, cell))
            }
            other => panic!("{} expression is not an l-value", other.name()),
        }
    }

    pub(crate) fn eval_load_location(
        &mut self,
        span: Span,
        object: Option<&Expr>,
        symbol: Symbol,
        lval: bool,
    ) -> Result<Location, Unwind> {
        let this = match object {
            Some(object) => Some(self.eval_expr(object)?),
            None => None,
        };
        self.load_symbol(span, symbol, this, object, lval)
    }

    /// Resolve `symbol` to its cell.
    ///
    /// Exports are followed to their referent. Module members and statics
    /// trigger initialization of their owner; instance members are looked
    /// up on `this` (or, for `super.x`, starting at the base prototype).
    pub(crate) fn load_symbol(
        &mut self,
        span: Span,
        symbol: Symbol,
        this: Option<Object>,
        this_expr: Option<&Expr>,
        lval: bool,
    ) -> Result<Location, Unwind> {
        let program = self.program;
        let symbol = program.resolve_export(symbol);
        let name = program.symbol_name(symbol).clone();
        match symbol {
            Symbol::Local(local) => {
                assert!(this.is_none(), "local '{name}' loaded with a receiver");
                let Some(cell) = self.locals.value_addr(local, true) else {
                    unreachable!("value_addr registers missing locals");
                };
                Ok(Location::new(None, name, program.local(local).ty, lval, cell))
            }
            Symbol::Function(function) => {
                let decl = program.function(function);
                match decl.owner {
                    FunctionOwner::Module(module) => {
                        self.load_global(module, this, name, decl.ty, lval)
                    }
                    FunctionOwner::Class(class) if decl.is_static => {
                        self.load_static(class, this, name, decl.ty, lval)
                    }
                    FunctionOwner::Class(_) => {
                        self.load_member(span, this, this_expr, name, decl.ty, lval)
                    }
                }
            }
            Symbol::Variable(variable) => {
                let decl = program.variable(variable);
                match decl.owner {
                    VariableOwner::Module(module) => {
                        self.load_global(module, this, name, decl.ty, lval)
                    }
                    VariableOwner::Class(class) if decl.is_static => {
                        self.load_static(class, this, name, decl.ty, lval)
                    }
                    VariableOwner::Class(_) => {
                        self.load_member(span, this, this_expr, name, decl.ty, lval)
                    }
                }
            }
            Symbol::Class(class) => {
                let decl = program.class(class);
                let ty = program.prototype_type(decl.ty);
                if this.is_some() {
                    self.load_member(span, this, this_expr, name, ty, lval)
                } else {
                    self.load_global(decl.module, None, name, ty, lval)
                }
            }
            Symbol::Export(_) => unreachable!("exports are resolved before loading"),
        }
    }

    fn load_global(
        &mut self,
        module: ModuleId,
        this: Option<Object>,
        name: Name,
        ty: TypeId,
        lval: bool,
    ) -> Result<Location, Unwind> {
        assert!(this.is_none(), "module member '{name}' loaded with a receiver");
        self.ensure_module_init(module);
        let globals = self.module_globals(module);
        let Some(cell) = globals.get_addr(&name, false) else {
            panic!(
                "missing module member '{}:{name}'",
                self.program.module(module).name
            );
        };
        Ok(Location::new(None, name, ty, lval, cell))
    }

    fn load_static(
        &mut self,
        class: kiln_ir::ClassId,
        this: Option<Object>,
        name: Name,
        ty: TypeId,
        lval: bool,
    ) -> Result<Location, Unwind> {
        assert!(this.is_none(), "static member '{name}' loaded with a receiver");
        self.ensure_class_init(class);
        let statics = self.class_statics(class);
        let Some(cell) = statics.get_addr(&name, false) else {
            panic!(
                "missing static member '{}.{name}'",
                self.program.class_token(class)
            );
        };
        Ok(Location::new(None, name, ty, lval, cell))
    }

    fn load_member(
        &mut self,
        span: Span,
        this: Option<Object>,
        this_expr: Option<&Expr>,
        name: Name,
        ty: TypeId,
        lval: bool,
    ) -> Result<Location, Unwind> {
        let Some(this) = this else {
            panic!("instance member '{name}' loaded without a receiver");
        };
        self.check_this(span, &this)?;
        let dynamic = this.ty() == TypeId::DYNAMIC;
        let Some(cell) = self.object_or_super_property(&this, this_expr, &name, dynamic, lval)
        else {
            panic!(
                "missing instance member '{name}' on {}",
                self.program.type_token(this.ty())
            );
        };
        Ok(Location::new(Some(this), name, ty, lval, cell))
    }

    /// Look up `key` on `obj`, honoring `super`.
    ///
    /// When `obj_expr` is a bare load of a `super` pseudo-local the search
    /// starts at the base class prototype, with `obj` as the receiver.
    pub(crate) fn object_or_super_property(
        &mut self,
        obj: &Object,
        obj_expr: Option<&Expr>,
        key: &str,
        init: bool,
        for_write: bool,
    ) -> Option<Pointer> {
        let program = self.program;
        if let Some(class) = program.class_of(obj.ty()) {
            self.ensure_class_init(class);
        }

        if let Some(ExprKind::LoadLocation {
            object: None,
            symbol: Symbol::Local(local),
        }) = obj_expr.map(|expr| &expr.kind)
        {
            let decl = program.local(*local);
            if decl.role == LocalRole::Super {
                let base = self.get_prototype(decl.ty);
                return base.property_addr_for_this(obj, key, init, for_write);
            }
        }
        obj.property_addr(key, init, for_write)
    }

    /// `object[name]`: array elements by number, properties by string.
    ///
    /// Indexing past the end of an array grows it with null elements; a
    /// negative index faults. Other keys are converted to strings and
    /// missing properties are created on demand.
    pub(crate) fn eval_load_dynamic(
        &mut self,
        span: Span,
        object: &Expr,
        name: &Expr,
        lval: bool,
    ) -> Result<Location, Unwind> {
        let this = self.eval_expr(object)?;
        let key = self.eval_expr(name)?;
        self.check_this(span, &this)?;

        if let (Some(index), ObjectValue::Array(elements)) = (key.as_number(), this.value()) {
            let Some(index) = array_index(index) else {
                return Err(self.throw_message(span, &errors::array_index_out_of_range(index)));
            };
            let cell = {
                let mut elements = elements.borrow_mut();
                if index >= elements.len() {
                    elements.resize_with(index + 1, || Pointer::new(Object::null(), false));
                }
                elements[index].clone()
            };
            return Ok(Location::new(
                Some(this),
                Name::from(index.to_string()),
                TypeId::DYNAMIC,
                lval,
                cell,
            ));
        }

        let key = match key.as_str() {
            Some(text) => Name::new(text),
            None => Name::from(display(self.program, &key)),
        };
        let Some(cell) = self.object_or_super_property(&this, Some(object), &key, true, lval)
        else {
            unreachable!("property cells are created on demand");
        };
        Ok(Location::new(Some(this), key, TypeId::DYNAMIC, lval, cell))
    }
}
