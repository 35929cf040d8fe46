//! The bound program and its builder.

use crate::{
    Block, Class, ClassId, ClassMember, Constant, Export, ExportId, Function, FunctionBody,
    FunctionId, FunctionOwner, FunctionSig, Local, LocalId, LocalRole, Module, ModuleId,
    ModuleMember, Name, Span, Symbol, Type, TypeId, TypeTable, Variable, VariableId,
    VariableOwner, CONSTRUCTOR_NAME, ENTRY_POINT_NAME, INITIALIZER_NAME,
};

/// A fully bound package: every symbol table plus the type table.
///
/// Immutable once built. Every type the evaluator may ask for at runtime
/// (prototype types in particular) is interned by [`ProgramBuilder::finish`].
#[derive(Clone, Debug)]
pub struct Program {
    name: Name,
    modules: Vec<Module>,
    classes: Vec<Class>,
    functions: Vec<Function>,
    variables: Vec<Variable>,
    locals: Vec<Local>,
    exports: Vec<Export>,
    types: TypeTable,
    default_module: Option<ModuleId>,
}

impl Program {
    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn default_module(&self) -> Option<ModuleId> {
        self.default_module
    }

    #[inline]
    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()]
    }

    #[inline]
    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    #[inline]
    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.index()]
    }

    #[inline]
    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    #[inline]
    pub fn local(&self, id: LocalId) -> &Local {
        &self.locals[id.index()]
    }

    #[inline]
    pub fn export(&self, id: ExportId) -> &Export {
        &self.exports[id.index()]
    }

    #[inline]
    pub fn ty(&self, id: TypeId) -> &Type {
        self.types.get(id)
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules
            .iter()
            .enumerate()
            .map(|(i, m)| (ModuleId::from_len(i), m))
    }

    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &Class)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, c)| (ClassId::from_len(i), c))
    }

    /// The class a `Type::Class` id denotes.
    pub fn class_of(&self, ty: TypeId) -> Option<ClassId> {
        match self.ty(ty) {
            Type::Class(class) => Some(*class),
            _ => None,
        }
    }

    /// The declared base type of a class type.
    pub fn base_type(&self, ty: TypeId) -> Option<TypeId> {
        self.class_of(ty).and_then(|c| self.class(c).extends)
    }

    /// Members declared directly on `ty`; empty for non-class types.
    pub fn type_members(&self, ty: TypeId) -> &[ClassMember] {
        match self.class_of(ty) {
            Some(class) => &self.class(class).members,
            None => &[],
        }
    }

    pub fn member_name(&self, member: ClassMember) -> &Name {
        match member {
            ClassMember::Method(f) => &self.function(f).name,
            ClassMember::Property(v) => &self.variable(v).name,
            ClassMember::Class(c) => &self.class(c).name,
        }
    }

    pub fn member_is_static(&self, member: ClassMember) -> bool {
        match member {
            ClassMember::Method(f) => self.function(f).is_static,
            ClassMember::Property(v) => self.variable(v).is_static,
            ClassMember::Class(_) => false,
        }
    }

    /// The constructor declared directly on `ty`, if any.
    pub fn constructor(&self, ty: TypeId) -> Option<FunctionId> {
        self.type_members(ty).iter().find_map(|member| match *member {
            ClassMember::Method(f) if self.function(f).name == CONSTRUCTOR_NAME => Some(f),
            _ => None,
        })
    }

    /// The `main` function of a module.
    pub fn entry_point(&self, module: ModuleId) -> Option<FunctionId> {
        self.module(module)
            .members
            .iter()
            .find_map(|member| match *member {
                ModuleMember::Function(f) if self.function(f).name == ENTRY_POINT_NAME => Some(f),
                _ => None,
            })
    }

    /// The interned "prototype of `ty`" type.
    ///
    /// # Panics
    /// Panics if `ty` is neither a class type nor one of the predefined
    /// object-like types, since no prototype type was interned for it.
    pub fn prototype_type(&self, ty: TypeId) -> TypeId {
        match self.types.lookup(&Type::Prototype(ty)) {
            Some(id) => id,
            None => panic!("no prototype type interned for {}", self.type_token(ty)),
        }
    }

    /// Follow an export chain to the symbol it finally denotes.
    ///
    /// # Panics
    /// Panics on an export cycle.
    pub fn resolve_export(&self, symbol: Symbol) -> Symbol {
        let mut current = symbol;
        let mut hops = 0;
        while let Symbol::Export(export) = current {
            hops += 1;
            assert!(
                hops <= self.exports.len(),
                "export cycle through {}",
                self.export(export).name
            );
            current = self.export(export).referent;
        }
        current
    }

    /// Whether a value of type `from` may be used where `to` is expected.
    pub fn can_convert(&self, from: TypeId, to: TypeId) -> bool {
        if from == to
            || to == TypeId::OBJECT
            || to == TypeId::DYNAMIC
            || from == TypeId::DYNAMIC
            || from == TypeId::NULL
        {
            return true;
        }
        match (self.ty(from), self.ty(to)) {
            (Type::Class(_), Type::Class(_)) => self.is_subtype(from, to),
            (Type::Array(a), Type::Array(b)) | (Type::Prototype(a), Type::Prototype(b)) => {
                self.can_convert(*a, *b)
            }
            (Type::Pointer(a), Type::Pointer(b)) => a == b,
            (Type::Function(f), Type::Function(g)) => {
                f.params.len() == g.params.len()
                    && f
                        .params
                        .iter()
                        .zip(&g.params)
                        .all(|(fp, gp)| self.can_convert(*gp, *fp))
                    && match (f.ret, g.ret) {
                        (None, None) => true,
                        (Some(fr), Some(gr)) => self.can_convert(fr, gr),
                        _ => false,
                    }
            }
            _ => false,
        }
    }

    fn is_subtype(&self, from: TypeId, to: TypeId) -> bool {
        if from == to {
            return true;
        }
        let Some(class) = self.class_of(from) else {
            return false;
        };
        let class = self.class(class);
        class.extends.is_some_and(|base| self.is_subtype(base, to))
            || class.implements.iter().any(|&i| self.is_subtype(i, to))
    }

    /// Human-readable token for a type, as reported by `typeof`.
    pub fn type_token(&self, ty: TypeId) -> String {
        match self.ty(ty) {
            Type::Null => "null".to_owned(),
            Type::Bool => "bool".to_owned(),
            Type::Number => "number".to_owned(),
            Type::String => "string".to_owned(),
            Type::Dynamic => "dynamic".to_owned(),
            Type::Object => "object".to_owned(),
            Type::Array(elem) => format!("{}[]", self.type_token(*elem)),
            Type::Pointer(elem) => format!("*{}", self.type_token(*elem)),
            Type::Function(sig) => {
                let params: Vec<String> = sig.params.iter().map(|p| self.type_token(*p)).collect();
                match sig.ret {
                    Some(ret) => format!("({}){}", params.join(","), self.type_token(ret)),
                    None => format!("({})", params.join(",")),
                }
            }
            Type::Class(class) => self.class_token(*class),
            Type::Prototype(of) => format!("prototype<{}>", self.type_token(*of)),
        }
    }

    /// `module:Class` token of a class.
    pub fn class_token(&self, class: ClassId) -> String {
        let class = self.class(class);
        format!("{}:{}", self.module(class.module).name, class.name)
    }

    /// `module:name` or `module:Class.name` token of a function.
    pub fn function_token(&self, function: FunctionId) -> String {
        let function = self.function(function);
        match function.owner {
            FunctionOwner::Module(module) => {
                format!("{}:{}", self.module(module).name, function.name)
            }
            FunctionOwner::Class(class) => format!("{}.{}", self.class_token(class), function.name),
        }
    }

    /// Name of any symbol.
    pub fn symbol_name(&self, symbol: Symbol) -> &Name {
        match symbol {
            Symbol::Local(id) => &self.local(id).name,
            Symbol::Function(id) => &self.function(id).name,
            Symbol::Variable(id) => &self.variable(id).name,
            Symbol::Class(id) => &self.class(id).name,
            Symbol::Export(id) => &self.export(id).name,
        }
    }
}

/// Declaration of a function handed to [`ProgramBuilder::function`].
#[derive(Clone, Debug)]
pub struct FunctionDecl {
    pub owner: FunctionOwner,
    pub name: Name,
    pub is_static: bool,
    pub params: Vec<LocalId>,
    pub ret: Option<TypeId>,
    pub body: FunctionBody,
    pub span: Span,
}

impl FunctionDecl {
    pub fn new(owner: FunctionOwner, name: impl Into<Name>, body: FunctionBody) -> Self {
        FunctionDecl {
            owner,
            name: name.into(),
            is_static: false,
            params: Vec::new(),
            ret: None,
            body,
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn params(mut self, params: Vec<LocalId>) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn returns(mut self, ret: TypeId) -> Self {
        self.ret = Some(ret);
        self
    }

    #[must_use]
    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// Declaration of a member variable handed to [`ProgramBuilder::variable`].
#[derive(Clone, Debug)]
pub struct VariableDecl {
    pub owner: VariableOwner,
    pub name: Name,
    pub ty: TypeId,
    pub default: Option<Constant>,
    pub readonly: bool,
    pub is_static: bool,
    pub span: Span,
}

impl VariableDecl {
    pub fn new(owner: VariableOwner, name: impl Into<Name>, ty: TypeId) -> Self {
        VariableDecl {
            owner,
            name: name.into(),
            ty,
            default: None,
            readonly: false,
            is_static: false,
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Constant>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    #[must_use]
    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// Assembles a [`Program`] symbol by symbol.
///
/// This is the shape a binder emits; tests and embedders use it directly.
pub struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    pub fn new(name: impl Into<Name>) -> Self {
        ProgramBuilder {
            program: Program {
                name: name.into(),
                modules: Vec::new(),
                classes: Vec::new(),
                functions: Vec::new(),
                variables: Vec::new(),
                locals: Vec::new(),
                exports: Vec::new(),
                types: TypeTable::new(),
                default_module: None,
            },
        }
    }

    /// Read access to everything declared so far.
    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn intern_type(&mut self, ty: Type) -> TypeId {
        self.program.types.intern(ty)
    }

    pub fn array_type(&mut self, elem: TypeId) -> TypeId {
        self.intern_type(Type::Array(elem))
    }

    pub fn pointer_type(&mut self, elem: TypeId) -> TypeId {
        self.intern_type(Type::Pointer(elem))
    }

    pub fn function_type(&mut self, params: Vec<TypeId>, ret: Option<TypeId>) -> TypeId {
        self.intern_type(Type::Function(FunctionSig { params, ret }))
    }

    pub fn module(&mut self, name: impl Into<Name>) -> ModuleId {
        let id = ModuleId::from_len(self.program.modules.len());
        self.program.modules.push(Module {
            name: name.into(),
            imports: Vec::new(),
            members: Vec::new(),
            init: None,
            span: Span::DUMMY,
        });
        id
    }

    pub fn add_import(&mut self, module: ModuleId, imported: ModuleId) {
        self.program.modules[module.index()].imports.push(imported);
    }

    pub fn set_default_module(&mut self, module: ModuleId) {
        self.program.default_module = Some(module);
    }

    /// Declare a module-level class.
    pub fn class(&mut self, module: ModuleId, name: impl Into<Name>) -> ClassId {
        let id = self.new_class(module, name.into(), false);
        self.program.modules[module.index()]
            .members
            .push(ModuleMember::Class(id));
        id
    }

    /// Declare a module-level interface.
    pub fn interface(&mut self, module: ModuleId, name: impl Into<Name>) -> ClassId {
        let id = self.new_class(module, name.into(), true);
        self.program.modules[module.index()]
            .members
            .push(ModuleMember::Class(id));
        id
    }

    /// Declare a class nested inside `parent`.
    pub fn nested_class(&mut self, parent: ClassId, name: impl Into<Name>) -> ClassId {
        let module = self.program.class(parent).module;
        let id = self.new_class(module, name.into(), false);
        self.program.classes[parent.index()]
            .members
            .push(ClassMember::Class(id));
        id
    }

    fn new_class(&mut self, module: ModuleId, name: Name, interface: bool) -> ClassId {
        let id = ClassId::from_len(self.program.classes.len());
        let ty = self.intern_type(Type::Class(id));
        let this_local = self.push_local(Name::new("this"), ty, LocalRole::This);
        let super_local = self.push_local(Name::new("super"), TypeId::OBJECT, LocalRole::Super);
        self.program.classes.push(Class {
            name,
            module,
            ty,
            extends: None,
            implements: Vec::new(),
            members: Vec::new(),
            init: None,
            interface,
            this_local,
            super_local,
            span: Span::DUMMY,
        });
        id
    }

    pub fn set_extends(&mut self, class: ClassId, base: ClassId) {
        let base_ty = self.program.class(base).ty;
        let class = &mut self.program.classes[class.index()];
        class.extends = Some(base_ty);
        let super_local = class.super_local;
        self.program.locals[super_local.index()].ty = base_ty;
    }

    pub fn add_implements(&mut self, class: ClassId, interface: ClassId) {
        let ty = self.program.class(interface).ty;
        self.program.classes[class.index()].implements.push(ty);
    }

    pub fn set_class_span(&mut self, class: ClassId, span: Span) {
        self.program.classes[class.index()].span = span;
    }

    pub fn this_local(&self, class: ClassId) -> LocalId {
        self.program.class(class).this_local
    }

    pub fn super_local(&self, class: ClassId) -> LocalId {
        self.program.class(class).super_local
    }

    pub fn class_type(&self, class: ClassId) -> TypeId {
        self.program.class(class).ty
    }

    /// Declare a plain local or parameter.
    pub fn local(&mut self, name: impl Into<Name>, ty: TypeId) -> LocalId {
        self.push_local(name.into(), ty, LocalRole::Plain)
    }

    fn push_local(&mut self, name: Name, ty: TypeId, role: LocalRole) -> LocalId {
        let id = LocalId::from_len(self.program.locals.len());
        self.program.locals.push(Local { name, ty, role });
        id
    }

    /// Declare a function and register it as a member of its owner.
    pub fn function(&mut self, decl: FunctionDecl) -> FunctionId {
        let id = self.push_function(decl);
        let owner = self.program.function(id).owner;
        match owner {
            FunctionOwner::Module(module) => self.program.modules[module.index()]
                .members
                .push(ModuleMember::Function(id)),
            FunctionOwner::Class(class) => self.program.classes[class.index()]
                .members
                .push(ClassMember::Method(id)),
        }
        id
    }

    /// Declare the constructor of `class`.
    pub fn constructor(&mut self, class: ClassId, params: Vec<LocalId>, body: Block) -> FunctionId {
        let span = body.span;
        self.function(
            FunctionDecl::new(
                FunctionOwner::Class(class),
                CONSTRUCTOR_NAME,
                FunctionBody::Block(body),
            )
            .params(params)
            .at(span),
        )
    }

    /// Set the initializer of a module.
    pub fn module_initializer(&mut self, module: ModuleId, body: Block) -> FunctionId {
        let span = body.span;
        let id = self.push_function(
            FunctionDecl::new(
                FunctionOwner::Module(module),
                INITIALIZER_NAME,
                FunctionBody::Block(body),
            )
            .at(span),
        );
        self.program.modules[module.index()].init = Some(id);
        id
    }

    /// Set the static initializer of a class.
    pub fn class_initializer(&mut self, class: ClassId, body: Block) -> FunctionId {
        let span = body.span;
        let id = self.push_function(
            FunctionDecl::new(
                FunctionOwner::Class(class),
                INITIALIZER_NAME,
                FunctionBody::Block(body),
            )
            .static_member()
            .at(span),
        );
        self.program.classes[class.index()].init = Some(id);
        id
    }

    fn push_function(&mut self, decl: FunctionDecl) -> FunctionId {
        let param_types = decl
            .params
            .iter()
            .map(|p| self.program.local(*p).ty)
            .collect();
        let ty = self.function_type(param_types, decl.ret);
        let id = FunctionId::from_len(self.program.functions.len());
        self.program.functions.push(Function {
            name: decl.name,
            owner: decl.owner,
            is_static: decl.is_static,
            params: decl.params,
            ty,
            ret: decl.ret,
            body: decl.body,
            span: decl.span,
        });
        id
    }

    /// Replace the body of a declared function, for mutually recursive code.
    pub fn set_body(&mut self, function: FunctionId, body: FunctionBody) {
        self.program.functions[function.index()].body = body;
    }

    /// Declare a member variable and register it with its owner.
    pub fn variable(&mut self, decl: VariableDecl) -> VariableId {
        let id = VariableId::from_len(self.program.variables.len());
        match decl.owner {
            VariableOwner::Module(module) => self.program.modules[module.index()]
                .members
                .push(ModuleMember::Variable(id)),
            VariableOwner::Class(class) => self.program.classes[class.index()]
                .members
                .push(ClassMember::Property(id)),
        }
        self.program.variables.push(Variable {
            name: decl.name,
            owner: decl.owner,
            ty: decl.ty,
            default: decl.default,
            readonly: decl.readonly,
            is_static: decl.is_static,
            span: decl.span,
        });
        id
    }

    /// Re-export `referent` from `module` under `name`.
    pub fn export(&mut self, module: ModuleId, name: impl Into<Name>, referent: Symbol) -> ExportId {
        let id = ExportId::from_len(self.program.exports.len());
        self.program.exports.push(Export {
            name: name.into(),
            module,
            referent,
            span: Span::DUMMY,
        });
        self.program.modules[module.index()]
            .members
            .push(ModuleMember::Export(id));
        id
    }

    /// Finish the program, interning every type the evaluator may need.
    pub fn finish(mut self) -> Program {
        let class_types: Vec<TypeId> = self.program.classes.iter().map(|c| c.ty).collect();
        for ty in class_types
            .into_iter()
            .chain([TypeId::DYNAMIC, TypeId::OBJECT])
        {
            self.intern_type(Type::Prototype(ty));
        }
        self.program
    }
}

#[cfg(test)]
mod tests;
