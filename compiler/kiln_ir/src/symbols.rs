//! Symbol table entries produced by the binder.

use std::collections::BTreeMap;

use crate::{Block, ClassId, ExportId, FunctionId, LocalId, ModuleId, Name, Span, TypeId, VariableId};

/// Name of the method that constructs instances of a class.
pub const CONSTRUCTOR_NAME: &str = ".ctor";
/// Name given to synthesized module and class initializers.
pub const INITIALIZER_NAME: &str = ".init";
/// Name of the entry-point function of a module.
pub const ENTRY_POINT_NAME: &str = "main";

/// A compile-time constant: variable defaults and host-supplied arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Constant>),
    /// A dynamic object with properties in the given order.
    Object(Vec<(Name, Constant)>),
}

impl From<bool> for Constant {
    fn from(value: bool) -> Self {
        Constant::Bool(value)
    }
}

impl From<f64> for Constant {
    fn from(value: f64) -> Self {
        Constant::Number(value)
    }
}

impl From<&str> for Constant {
    fn from(value: &str) -> Self {
        Constant::String(value.to_owned())
    }
}

/// Named arguments supplied by a host to a top-level evaluation.
pub type Args = BTreeMap<Name, Constant>;

/// A member reference in declaration order of a module.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModuleMember {
    Function(FunctionId),
    Variable(VariableId),
    Class(ClassId),
    Export(ExportId),
}

#[derive(Clone, Debug)]
pub struct Module {
    pub name: Name,
    /// Modules whose initialization must precede this one, in order.
    pub imports: Vec<ModuleId>,
    pub members: Vec<ModuleMember>,
    /// Niladic initializer run once, after members are populated.
    pub init: Option<FunctionId>,
    pub span: Span,
}

/// A member reference in declaration order of a class.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClassMember {
    Method(FunctionId),
    Property(VariableId),
    /// Nested class; always an instance-level (prototype) member.
    Class(ClassId),
}

#[derive(Clone, Debug)]
pub struct Class {
    pub name: Name,
    pub module: ModuleId,
    /// The `Type::Class` id of this class.
    pub ty: TypeId,
    pub extends: Option<TypeId>,
    pub implements: Vec<TypeId>,
    pub members: Vec<ClassMember>,
    /// Niladic static initializer.
    pub init: Option<FunctionId>,
    pub interface: bool,
    /// Pseudo-local bound to the receiver inside instance methods.
    pub this_local: LocalId,
    /// Pseudo-local bound to the receiver, typed as the base class.
    pub super_local: LocalId,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FunctionOwner {
    Module(ModuleId),
    Class(ClassId),
}

#[derive(Clone, Debug)]
pub enum FunctionBody {
    Block(Block),
    /// Implemented natively; the token selects the registered intrinsic.
    Intrinsic(Name),
    /// Declared without a body (interface members).
    Abstract,
}

#[derive(Clone, Debug)]
pub struct Function {
    pub name: Name,
    pub owner: FunctionOwner,
    pub is_static: bool,
    pub params: Vec<LocalId>,
    /// The `Type::Function` id of this function.
    pub ty: TypeId,
    pub ret: Option<TypeId>,
    pub body: FunctionBody,
    pub span: Span,
}

impl Function {
    /// Whether calling this function requires a receiver.
    pub fn is_instance_method(&self) -> bool {
        matches!(self.owner, FunctionOwner::Class(_)) && !self.is_static
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VariableOwner {
    Module(ModuleId),
    Class(ClassId),
}

#[derive(Clone, Debug)]
pub struct Variable {
    pub name: Name,
    pub owner: VariableOwner,
    pub ty: TypeId,
    pub default: Option<Constant>,
    pub readonly: bool,
    pub is_static: bool,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LocalRole {
    Plain,
    This,
    Super,
}

#[derive(Clone, Debug)]
pub struct Local {
    pub name: Name,
    pub ty: TypeId,
    pub role: LocalRole,
}

/// A module member that re-exports another symbol.
#[derive(Clone, Debug)]
pub struct Export {
    pub name: Name,
    pub module: ModuleId,
    pub referent: Symbol,
    pub span: Span,
}

/// Any symbol a load can resolve.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    Local(LocalId),
    Function(FunctionId),
    Variable(VariableId),
    Class(ClassId),
    Export(ExportId),
}
