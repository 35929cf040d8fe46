//! Lazy, once-only initialization of modules and classes.
//!
//! A module or class is marked before anything else happens, so cycles
//! (mutual imports, a class whose initializer touches itself) terminate
//! and each initializer runs at most once.

use kiln_ir::{ClassId, ClassMember, FunctionId, ModuleId, ModuleMember, Span};
use tracing::{debug, trace};

use super::Interpreter;
use crate::errors;
use crate::rt::{Object, Pointer, PropertyMap, Unwind};

impl Interpreter<'_> {
    /// Global property map of `module`, created on first use.
    pub fn module_globals(&mut self, module: ModuleId) -> PropertyMap {
        self.globals.entry(module).or_default().clone()
    }

    /// Static property map of `class`, created on first use.
    pub fn class_statics(&mut self, class: ClassId) -> PropertyMap {
        self.statics.entry(class).or_default().clone()
    }

    pub fn is_module_initialized(&self, module: ModuleId) -> bool {
        self.modules_initialized.contains(&module)
    }

    pub fn is_class_initialized(&self, class: ClassId) -> bool {
        self.classes_initialized.contains(&class)
    }

    /// Initialize `module` if that has not started yet.
    ///
    /// Imports are initialized first, in declared order. Every member gets
    /// a global cell (functions as closures, variables with their default
    /// or null, classes as their prototype), then the module initializer
    /// runs, then read-only variables are frozen.
    pub fn ensure_module_init(&mut self, module: ModuleId) {
        if !self.modules_initialized.insert(module) {
            return;
        }
        let program = self.program;
        let decl = program.module(module);
        debug!(module = %decl.name, "initializing module");

        for &import in &decl.imports {
            self.ensure_module_init(import);
        }

        let globals = self.module_globals(module);
        let mut readonly = Vec::new();
        for &member in &decl.members {
            let member = match member {
                ModuleMember::Function(function) => ClassMember::Method(function),
                ModuleMember::Variable(variable) => ClassMember::Property(variable),
                ModuleMember::Class(class) => ClassMember::Class(class),
                ModuleMember::Export(_) => continue,
            };
            if let Some(cell) = self.init_property(&globals, member) {
                readonly.push(cell);
            }
        }

        match decl.init {
            Some(init) => {
                if let Err(unwind) = self.run_initializer(decl.span, init) {
                    self.report_unhandled(unwind, |span, message, trace| {
                        errors::unhandled_init_exception(span, &decl.name, message, trace)
                    });
                }
            }
            None => trace!(module = %decl.name, "module has no initializer"),
        }

        for cell in readonly {
            cell.freeze();
        }
    }

    /// Initialize the statics of `class` if that has not started yet.
    ///
    /// The owning module and the base class come first. Statics of the
    /// whole base chain are populated into this class's table, the nearest
    /// declaration of a name winning, then the class initializer runs and
    /// read-only statics are frozen.
    pub fn ensure_class_init(&mut self, class: ClassId) {
        if !self.classes_initialized.insert(class) {
            return;
        }
        let program = self.program;
        let decl = program.class(class);
        let token = program.class_token(class);
        debug!(class = %token, "initializing class");

        self.ensure_module_init(decl.module);
        if let Some(base) = decl.extends.and_then(|ty| program.class_of(ty)) {
            self.ensure_class_init(base);
        }

        let statics = self.class_statics(class);
        let mut readonly = Vec::new();
        let mut current = Some(decl.ty);
        while let Some(ty) = current {
            for &member in program.type_members(ty) {
                if !program.member_is_static(member)
                    || statics.contains(program.member_name(member))
                {
                    continue;
                }
                if let Some(cell) = self.init_property(&statics, member) {
                    readonly.push(cell);
                }
            }
            current = program.base_type(ty);
        }

        match decl.init {
            Some(init) => {
                if let Err(unwind) = self.run_initializer(decl.span, init) {
                    self.report_unhandled(unwind, |span, message, trace| {
                        errors::unhandled_init_exception(span, &token, message, trace)
                    });
                }
            }
            None => trace!(class = %token, "class has no initializer"),
        }

        for cell in readonly {
            cell.freeze();
        }
    }

    fn run_initializer(&mut self, span: Span, init: FunctionId) -> Result<(), Unwind> {
        let function = self.program.function(init);
        assert!(
            function.params.is_empty() && function.ret.is_none(),
            "initializer {} must be niladic and return nothing",
            self.program.function_token(init)
        );
        let returned = self.eval_call(span, init, None, Vec::new())?;
        debug_assert!(returned.is_none());
        Ok(())
    }

    /// Store the initial value of `member` into `properties`.
    ///
    /// Returns the cell of a read-only variable; the caller freezes it once
    /// initialization is over. Method cells are read-only immediately.
    pub(crate) fn init_property(
        &mut self,
        properties: &PropertyMap,
        member: ClassMember,
    ) -> Option<Pointer> {
        let program = self.program;
        let key = program.member_name(member).clone();
        match member {
            ClassMember::Method(function) => {
                let decl = program.function(function);
                let closure = self.alloc.new_function(decl.span, decl.ty, function, None);
                properties.init_addr(key, closure, true);
                None
            }
            ClassMember::Property(variable) => {
                let decl = program.variable(variable);
                let value = match &decl.default {
                    Some(constant) => self.alloc.new_constant(decl.span, constant),
                    None => Object::null(),
                };
                let cell = properties.init_addr(key, value, false);
                decl.readonly.then_some(cell)
            }
            ClassMember::Class(class) => {
                let proto = self.get_prototype(program.class(class).ty);
                properties.init_addr(key, proto, false);
                None
            }
        }
    }
}
