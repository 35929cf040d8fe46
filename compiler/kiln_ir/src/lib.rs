//! Kiln IR - the bound program tree consumed by the Kiln evaluator.
//!
//! The binder (outside this workspace) resolves names, computes types, and
//! emits a [`Program`]: symbol tables for modules, classes, functions,
//! member variables, locals, and exports, plus a [`TypeTable`]. Function
//! bodies are [`Block`]s of [`Stmt`] and [`Expr`] nodes whose symbol
//! references are already resolved to ids.
//!
//! [`ProgramBuilder`] assembles a program by hand.

mod ast;
mod ids;
mod name;
mod program;
mod span;
mod symbols;
mod types;

pub use ast::{
    BinaryOp, Block, CatchClause, Expr, ExprKind, PropertyInit, Stmt, StmtKind, SwitchCase,
    UnaryOp,
};
pub use ids::{ClassId, ExportId, FunctionId, LocalId, ModuleId, TypeId, VariableId};
pub use name::Name;
pub use program::{FunctionDecl, Program, ProgramBuilder, VariableDecl};
pub use span::Span;
pub use symbols::{
    Args, Class, ClassMember, Constant, Export, Function, FunctionBody, FunctionOwner, Local,
    LocalRole, Module, ModuleMember, Symbol, Variable, VariableOwner, CONSTRUCTOR_NAME,
    ENTRY_POINT_NAME, INITIALIZER_NAME,
};
pub use types::{FunctionSig, Type, TypeTable};
