//! Interpreter tests over hand-built programs.
#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

mod expr_tests;

use kiln_ir::{
    ClassId, Constant, FunctionBody, FunctionDecl, FunctionId, FunctionOwner, LocalId, ModuleId,
    Program, ProgramBuilder, Stmt, StmtKind, TypeId,
};

use crate::test_helpers::{block, stmt};

/// Declare `name() -> ret` in `module`.
fn function(
    b: &mut ProgramBuilder,
    module: ModuleId,
    name: &str,
    ret: Option<TypeId>,
    body: Vec<Stmt>,
) -> FunctionId {
    let mut decl = FunctionDecl::new(
        FunctionOwner::Module(module),
        name,
        FunctionBody::Block(block(body)),
    );
    if let Some(ret) = ret {
        decl = decl.returns(ret);
    }
    b.function(decl)
}

/// Declare instance method `name() -> ret` on `class`.
fn method(
    b: &mut ProgramBuilder,
    class: ClassId,
    name: &str,
    ret: Option<TypeId>,
    body: Vec<Stmt>,
) -> FunctionId {
    let mut decl = FunctionDecl::new(
        FunctionOwner::Class(class),
        name,
        FunctionBody::Block(block(body)),
    );
    if let Some(ret) = ret {
        decl = decl.returns(ret);
    }
    b.function(decl)
}

/// Declare a function whose body is the intrinsic `token`.
fn intrinsic(
    b: &mut ProgramBuilder,
    module: ModuleId,
    token: &str,
    params: Vec<LocalId>,
    ret: Option<TypeId>,
) -> FunctionId {
    let mut decl = FunctionDecl::new(
        FunctionOwner::Module(module),
        token,
        FunctionBody::Intrinsic(token.into()),
    )
    .params(params);
    if let Some(ret) = ret {
        decl = decl.returns(ret);
    }
    b.function(decl)
}

fn fn_ty(b: &ProgramBuilder, function: FunctionId) -> TypeId {
    b.program().function(function).ty
}

/// `let local = value;`
fn let_const(local: LocalId, value: impl Into<Constant>) -> Stmt {
    stmt(StmtKind::LocalVariable {
        local,
        default: Some(value.into()),
    })
}

/// A program whose module `main` holds `f() -> ret`. `build` declares
/// whatever else the test needs and returns the body of `f`.
fn single(
    ret: TypeId,
    build: impl FnOnce(&mut ProgramBuilder, ModuleId) -> Vec<Stmt>,
) -> (Program, FunctionId) {
    let mut b = ProgramBuilder::new("pkg");
    let m = b.module("main");
    let body = build(&mut b, m);
    let f = function(&mut b, m, "f", Some(ret), body);
    (b.finish(), f)
}
