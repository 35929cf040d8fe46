//! Tree-walking interpreter for bound Kiln programs.
//!
//! # Architecture
//!
//! Statements evaluate to [`ExecResult`] and expressions to
//! [`EvalResult`](crate::rt::EvalResult);
//! every non-sequential control effect (`break`, `continue`, `return`,
//! `throw`) travels upward as an [`Unwind`] until a construct absorbs it.
//!
//! - `stmt` - statement dispatch, loops, `switch`, `try`
//! - `expr` - expression dispatch, literals, `new`, invocation
//! - `location` - symbol and member loads, l-values
//! - `call` - activation frames and argument binding
//! - `init` - lazy module and class initialization
//! - `prototype` - per-type prototype objects
//!
//! Module globals, class statics, and prototypes are created on first use
//! and live as long as the interpreter.

mod builder;
mod call;
mod expr;
mod format;
mod init;
mod location;
mod operators;
mod prototype;
mod scope_guard;
mod stmt;

pub use builder::InterpreterBuilder;
pub use format::{details, display, format_number};
pub use location::Location;
pub use scope_guard::ScopedInterpreter;

use std::rc::Rc;

use kiln_diagnostic::{Diagnostic, SharedSink};
use kiln_ir::{
    Args, ClassId, Constant, Expr, FunctionId, FunctionOwner, ModuleId, Program, Span, Symbol,
    TypeId,
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, trace};

use crate::alloc::Allocator;
use crate::config::EvalConfig;
use crate::environment::LocalScope;
use crate::errors;
use crate::hooks::{LeaveGuard, SharedHooks};
use crate::intrinsics::IntrinsicRegistry;
use crate::print_handler::SharedPrintHandler;
use crate::rt::{format_trace, ExecResult, Object, PropertyMap, StackFrame, Unwind};

/// The module and class a running function was declared in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct BindingContext {
    pub(crate) module: ModuleId,
    pub(crate) class: Option<ClassId>,
}

/// Evaluates one bound [`Program`].
///
/// All runtime state (globals, statics, prototypes, initialization marks)
/// belongs to the interpreter, so two interpreters over the same program
/// never observe each other.
pub struct Interpreter<'p> {
    pub(crate) program: &'p Program,
    pub(crate) config: EvalConfig,
    pub(crate) sink: SharedSink,
    pub(crate) hooks: Option<SharedHooks>,
    pub(crate) alloc: Allocator,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) intrinsics: IntrinsicRegistry,
    pub(crate) locals: LocalScope,
    /// Innermost interpreted call frame.
    pub(crate) stack: Option<Rc<StackFrame>>,
    pub(crate) call_depth: usize,
    pub(crate) context: Vec<BindingContext>,
    globals: FxHashMap<ModuleId, PropertyMap>,
    statics: FxHashMap<ClassId, PropertyMap>,
    prototypes: FxHashMap<TypeId, Object>,
    modules_initialized: FxHashSet<ModuleId>,
    classes_initialized: FxHashSet<ClassId>,
}

impl<'p> Interpreter<'p> {
    /// Create an interpreter with default settings.
    ///
    /// Diagnostics go to `tracing`, output to stdout. Use
    /// [`InterpreterBuilder`] for anything else.
    pub fn new(program: &'p Program) -> Self {
        InterpreterBuilder::new(program).build()
    }

    #[inline]
    pub fn program(&self) -> &'p Program {
        self.program
    }

    #[inline]
    pub fn sink(&self) -> &SharedSink {
        &self.sink
    }

    #[inline]
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    #[inline]
    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Module of the function currently running, if any.
    pub fn current_module(&self) -> Option<ModuleId> {
        self.context.last().map(|ctx| ctx.module)
    }

    /// Class of the method currently running, if any.
    pub fn current_class(&self) -> Option<ClassId> {
        self.context.last().and_then(|ctx| ctx.class)
    }

    /// Number of interpreted calls currently active.
    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    /// Evaluate the entry point of the program's default module.
    pub fn evaluate_package(&mut self, args: &Args) {
        let program = self.program;
        info!(package = %program.name(), "evaluating package");
        let _leave = LeaveGuard::new(
            self.hooks
                .as_ref()
                .and_then(|hooks| hooks.on_enter_package(program)),
        );

        match program.default_module() {
            Some(module) => self.evaluate_module(module, args),
            None => self.sink.emit(errors::missing_default_module(program.name())),
        }

        self.log_completion("package", program.name());
    }

    /// Evaluate the `main` function of `module`.
    pub fn evaluate_module(&mut self, module: ModuleId, args: &Args) {
        let program = self.program;
        let decl = program.module(module);
        info!(module = %decl.name, "evaluating module");
        let _leave = LeaveGuard::new(
            self.hooks
                .as_ref()
                .and_then(|hooks| hooks.on_enter_module(program, module)),
        );

        match program.entry_point(module) {
            Some(entry) => {
                self.evaluate_function(entry, None, args);
            }
            None => self
                .sink
                .emit(errors::missing_entry_point(decl.span, &decl.name)),
        }

        self.log_completion("module", &decl.name);
    }

    /// Call `function` with host-supplied named arguments.
    ///
    /// Arguments are matched to parameters by name and checked for count
    /// and type; every mismatch is reported and, if any was, the call is
    /// skipped. An exception escaping the call is reported as unhandled.
    /// Returns the function's result, if it produced one.
    pub fn evaluate_function(
        &mut self,
        function: FunctionId,
        this: Option<Object>,
        args: &Args,
    ) -> Option<Object> {
        let program = self.program;
        let decl = program.function(function);
        let token = program.function_token(function);
        info!(function = %token, "evaluating function");

        match decl.owner {
            FunctionOwner::Module(module) => self.ensure_module_init(module),
            FunctionOwner::Class(class) => self.ensure_class_init(class),
        }

        let errors_before = self.sink.error_count();
        if decl.params.len() != args.len() {
            self.sink.emit(errors::argument_count_mismatch(
                decl.span,
                &token,
                decl.params.len(),
                args.len(),
            ));
        }

        let mut argv = Vec::with_capacity(decl.params.len());
        for &param in &decl.params {
            let local = program.local(param);
            let Some(constant) = args.get(local.name.as_str()) else {
                self.sink
                    .emit(errors::missing_argument(decl.span, &token, &local.name));
                continue;
            };
            let arg = self.alloc.new_constant(decl.span, constant);
            if program.can_convert(arg.ty(), local.ty) {
                argv.push(arg);
            } else {
                self.sink.emit(errors::incorrect_argument_type(
                    decl.span,
                    &token,
                    &local.name,
                    &program.type_token(local.ty),
                    &program.type_token(arg.ty()),
                ));
            }
        }
        for name in args.keys() {
            let known = decl
                .params
                .iter()
                .any(|&param| program.local(param).name == *name);
            if !known {
                self.sink
                    .emit(errors::unrecognized_argument(decl.span, &token, name));
            }
        }

        let mut result = None;
        if self.sink.error_count() == errors_before {
            match self.eval_call(decl.span, function, this, argv) {
                Ok(returned) => result = returned,
                Err(unwind) => self.report_unhandled(unwind, errors::unhandled_exception),
            }
        } else {
            debug!(function = %token, "skipping call after argument errors");
        }

        self.dump_state();
        self.log_completion("function", &token);
        result
    }

    /// Resolve `symbol` to its storage cell without walking an expression.
    ///
    /// `this` is the receiver for instance members. With `lval`, a member
    /// found only on a prototype is copied onto the receiver first.
    ///
    /// # Panics
    /// Panics if resolving faults, which only a null receiver can cause.
    pub fn load_location(
        &mut self,
        span: Span,
        symbol: Symbol,
        this: Option<Object>,
        lval: bool,
    ) -> Location {
        match self.load_symbol(span, symbol, this, None, lval) {
            Ok(location) => location,
            Err(unwind) => panic!(
                "unexpected {} while loading '{}'; possible null receiver for an instance member",
                unwind.kind_name(),
                self.program.symbol_name(symbol)
            ),
        }
    }

    /// Lift a host constant into a runtime object.
    pub fn new_constant_object(&self, span: Span, constant: &Constant) -> Object {
        self.alloc.new_constant(span, constant)
    }

    /// Throw a string exception at `span`, capturing the current stack.
    pub(crate) fn throw_message(&self, span: Span, message: &str) -> Unwind {
        let thrown = self.alloc.new_string(span, message);
        Unwind::throw(thrown, span, self.stack.clone())
    }

    /// Fault with the null-reference exception if `this` is null.
    pub(crate) fn check_this(&self, span: Span, this: &Object) -> ExecResult {
        if this.is_null() {
            return Err(self.throw_message(span, &errors::null_reference()));
        }
        Ok(())
    }

    /// Report an exception that escaped to the top of an evaluation.
    pub(crate) fn report_unhandled(
        &self,
        unwind: Unwind,
        report: impl FnOnce(Span, &str, &str) -> Diagnostic,
    ) {
        let Unwind::Throw(exception) = unwind else {
            panic!("unexpected {} escaped a top-level call", unwind.kind_name());
        };
        let message = match exception.thrown.as_str() {
            Some(text) => text.to_owned(),
            None => format!("\n{}", details(self.program, &exception.thrown, "\t")),
        };
        let trace = format_trace(
            self.program,
            exception.stack.as_deref(),
            exception.node,
            "\t",
        );
        self.sink.emit(report(exception.node, &message, &trace));
    }

    /// Modules and classes initialized so far, alphabetically.
    pub fn state_summary(&self) -> Vec<String> {
        let program = self.program;
        let mut modules: Vec<String> = self
            .modules_initialized
            .iter()
            .map(|&module| program.module(module).name.to_string())
            .collect();
        modules.sort();
        let mut classes: Vec<String> = self
            .classes_initialized
            .iter()
            .map(|&class| program.class_token(class))
            .collect();
        classes.sort();

        modules
            .into_iter()
            .map(|module| format!("Module init: {module}"))
            .chain(classes.into_iter().map(|class| format!("Class init: {class}")))
            .collect()
    }

    fn dump_state(&self) {
        if self.config.dump_state {
            info!("evaluator state dump");
            for line in self.state_summary() {
                info!("{line}");
            }
        } else if tracing::enabled!(tracing::Level::TRACE) {
            trace!("evaluator state dump");
            for line in self.state_summary() {
                trace!("{line}");
            }
        }
    }

    fn log_completion(&self, what: &str, name: &str) {
        debug!(
            warnings = self.sink.warning_count(),
            errors = self.sink.error_count(),
            "evaluation of {what} '{name}' completed"
        );
    }

    /// Evaluate argument expressions left to right.
    pub(crate) fn eval_args(&mut self, args: &[Expr]) -> Result<Vec<Object>, Unwind> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    /// Discard the value of an expression.
    pub(crate) fn eval_for_effect(&mut self, expr: &Expr) -> ExecResult {
        self.eval_expr(expr).map(drop)
    }
}

#[cfg(test)]
mod tests;
