//! Shorthands for building bound trees and interpreters in tests.

use std::cell::RefCell;
use std::rc::Rc;

use kiln_diagnostic::{DiagnosticBuffer, ErrorCode};
use kiln_ir::{
    BinaryOp, Block, Expr, ExprKind, FunctionId, LocalId, ModuleId, Program, Span, Stmt, StmtKind,
    Symbol, TypeId, UnaryOp,
};

use crate::hooks::{InterpreterHooks, LeaveHook};
use crate::interpreter::{display, Interpreter, InterpreterBuilder};
use crate::print_handler::{buffer_handler, SharedPrintHandler};
use crate::rt::Object;

pub(crate) fn sp(offset: u32) -> Span {
    Span::new(offset, offset + 1)
}

pub(crate) fn expr(kind: ExprKind, ty: TypeId) -> Expr {
    Expr::new(kind, ty, Span::DUMMY)
}

pub(crate) fn num(n: f64) -> Expr {
    expr(ExprKind::Number(n), TypeId::NUMBER)
}

pub(crate) fn string(s: &str) -> Expr {
    expr(ExprKind::String(s.to_owned()), TypeId::STRING)
}

pub(crate) fn boolean(b: bool) -> Expr {
    expr(ExprKind::Bool(b), TypeId::BOOL)
}

pub(crate) fn null() -> Expr {
    expr(ExprKind::Null, TypeId::NULL)
}

pub(crate) fn load(symbol: Symbol, ty: TypeId) -> Expr {
    expr(
        ExprKind::LoadLocation {
            object: None,
            symbol,
        },
        ty,
    )
}

pub(crate) fn local(id: LocalId, ty: TypeId) -> Expr {
    load(Symbol::Local(id), ty)
}

/// `object.symbol`.
pub(crate) fn member(object: Expr, symbol: Symbol, ty: TypeId) -> Expr {
    expr(
        ExprKind::LoadLocation {
            object: Some(Box::new(object)),
            symbol,
        },
        ty,
    )
}

/// `object[name]`.
pub(crate) fn index(object: Expr, name: Expr) -> Expr {
    expr(
        ExprKind::LoadDynamic {
            object: Box::new(object),
            name: Box::new(name),
        },
        TypeId::DYNAMIC,
    )
}

pub(crate) fn binary(op: BinaryOp, left: Expr, right: Expr, ty: TypeId) -> Expr {
    expr(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        ty,
    )
}

pub(crate) fn assign(target: Expr, value: Expr) -> Expr {
    let ty = target.ty;
    binary(BinaryOp::Assign, target, value, ty)
}

pub(crate) fn unary(op: UnaryOp, operand: Expr, postfix: bool, ty: TypeId) -> Expr {
    expr(
        ExprKind::Unary {
            op,
            operand: Box::new(operand),
            postfix,
        },
        ty,
    )
}

pub(crate) fn invoke(function: Expr, args: Vec<Expr>, ty: TypeId) -> Expr {
    expr(
        ExprKind::Invoke {
            function: Box::new(function),
            args,
        },
        ty,
    )
}

pub(crate) fn call(function: FunctionId, ty: TypeId, args: Vec<Expr>, ret: TypeId) -> Expr {
    invoke(load(Symbol::Function(function), ty), args, ret)
}

pub(crate) fn new_object(ty: TypeId, args: Vec<Expr>) -> Expr {
    expr(ExprKind::New { args }, ty)
}

pub(crate) fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Span::DUMMY)
}

pub(crate) fn eval(e: Expr) -> Stmt {
    stmt(StmtKind::Expression(e))
}

pub(crate) fn ret(e: Expr) -> Stmt {
    stmt(StmtKind::Return(Some(e)))
}

pub(crate) fn declare(id: LocalId) -> Stmt {
    stmt(StmtKind::LocalVariable {
        local: id,
        default: None,
    })
}

pub(crate) fn block(stmts: Vec<Stmt>) -> Block {
    Block::new(stmts, Span::DUMMY)
}

pub(crate) fn block_stmt(stmts: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Block(block(stmts)))
}

/// Interpreter over `program` collecting diagnostics and printed output.
pub(crate) struct Harness<'p> {
    pub(crate) interp: Interpreter<'p>,
    pub(crate) sink: Rc<DiagnosticBuffer>,
    pub(crate) output: SharedPrintHandler,
}

impl<'p> Harness<'p> {
    pub(crate) fn new(program: &'p Program) -> Self {
        Self::with(InterpreterBuilder::new(program))
    }

    pub(crate) fn with(builder: InterpreterBuilder<'p>) -> Self {
        let sink = Rc::new(DiagnosticBuffer::new());
        let output = buffer_handler();
        let interp = builder
            .sink(sink.clone())
            .print_handler(output.clone())
            .build();
        Harness {
            interp,
            sink,
            output,
        }
    }

    pub(crate) fn codes(&self) -> Vec<ErrorCode> {
        self.sink.codes()
    }

    /// Call a niladic function through the host entry point.
    pub(crate) fn run(&mut self, function: FunctionId) -> Option<Object> {
        self.interp
            .evaluate_function(function, None, &kiln_ir::Args::new())
    }

    /// Run `function` and read its result as a number.
    pub(crate) fn run_number(&mut self, function: FunctionId) -> f64 {
        let result = self.run(function);
        assert_eq!(self.codes(), Vec::<ErrorCode>::new(), "unexpected diagnostics");
        result
            .unwrap_or_else(|| panic!("function returned nothing"))
            .number_value()
    }

    /// Run `function` and render its result.
    pub(crate) fn run_display(&mut self, function: FunctionId) -> String {
        let result = self.run(function);
        assert_eq!(self.codes(), Vec::<ErrorCode>::new(), "unexpected diagnostics");
        let value = result.unwrap_or_else(|| panic!("function returned nothing"));
        display(self.interp.program(), &value)
    }

    /// Value of a module-level variable.
    pub(crate) fn global(&mut self, module: ModuleId, name: &str) -> Object {
        let globals = self.interp.module_globals(module);
        globals
            .get_addr(name, false)
            .unwrap_or_else(|| panic!("no global '{name}'"))
            .obj()
    }
}

/// Hooks that record every event as a line of text.
#[derive(Default)]
pub(crate) struct RecordingHooks {
    pub(crate) events: Rc<RefCell<Vec<String>>>,
}

impl RecordingHooks {
    pub(crate) fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

impl InterpreterHooks for RecordingHooks {
    fn on_variable_assign(
        &self,
        _span: Span,
        target: Option<&Object>,
        name: &str,
        _old: Option<&Object>,
        new: &Object,
    ) {
        let value = match new.as_number() {
            Some(n) => n.to_string(),
            None => format!("{:?}", new.value()),
        };
        let owner = if target.is_some() { "member" } else { "var" };
        self.events
            .borrow_mut()
            .push(format!("assign {owner} {name} = {value}"));
    }

    fn on_enter_package(&self, program: &Program) -> Option<LeaveHook> {
        self.events
            .borrow_mut()
            .push(format!("enter package {}", program.name()));
        let events = self.events.clone();
        Some(Box::new(move || events.borrow_mut().push("leave package".to_owned())))
    }

    fn on_enter_module(&self, program: &Program, module: ModuleId) -> Option<LeaveHook> {
        let name = program.module(module).name.clone();
        self.events
            .borrow_mut()
            .push(format!("enter module {name}"));
        let events = self.events.clone();
        Some(Box::new(move || {
            events.borrow_mut().push(format!("leave module {name}"));
        }))
    }

    fn on_enter_function(&self, program: &Program, function: FunctionId) -> Option<LeaveHook> {
        let token = program.function_token(function);
        self.events
            .borrow_mut()
            .push(format!("enter {token}"));
        let events = self.events.clone();
        Some(Box::new(move || {
            events.borrow_mut().push(format!("leave {token}"));
        }))
    }
}
