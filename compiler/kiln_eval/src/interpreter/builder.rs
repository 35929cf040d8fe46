//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use std::rc::Rc;

use kiln_diagnostic::{SharedSink, TracingSink};
use kiln_ir::{Name, Program};
use rustc_hash::{FxHashMap, FxHashSet};

use super::Interpreter;
use crate::alloc::Allocator;
use crate::config::EvalConfig;
use crate::environment::LocalScope;
use crate::hooks::SharedHooks;
use crate::intrinsics::{IntrinsicFn, IntrinsicRegistry};
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Builder for creating Interpreter instances with various configurations.
///
/// Defaults: diagnostics are forwarded to `tracing`, printing goes to
/// stdout, no hooks, the built-in intrinsics, and [`EvalConfig::default`].
pub struct InterpreterBuilder<'p> {
    program: &'p Program,
    config: EvalConfig,
    sink: Option<SharedSink>,
    hooks: Option<SharedHooks>,
    print_handler: Option<SharedPrintHandler>,
    intrinsics: IntrinsicRegistry,
}

impl<'p> InterpreterBuilder<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            config: EvalConfig::default(),
            sink: None,
            hooks: None,
            print_handler: None,
            intrinsics: IntrinsicRegistry::with_builtins(),
        }
    }

    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Set where diagnostics are reported.
    #[must_use]
    pub fn sink(mut self, sink: SharedSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the observer notified of allocations, assignments, and scope
    /// entry.
    #[must_use]
    pub fn hooks(mut self, hooks: SharedHooks) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Set the print handler used by the print intrinsics.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Register a native function for `token`, replacing any built-in of
    /// the same name.
    #[must_use]
    pub fn intrinsic(mut self, token: impl Into<Name>, function: IntrinsicFn) -> Self {
        self.intrinsics.register(token, function);
        self
    }

    /// Build the interpreter.
    pub fn build(self) -> Interpreter<'p> {
        Interpreter {
            program: self.program,
            config: self.config,
            sink: self.sink.unwrap_or_else(|| Rc::new(TracingSink::new())),
            alloc: Allocator::new(self.hooks.clone()),
            hooks: self.hooks,
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            intrinsics: self.intrinsics,
            locals: LocalScope::new(),
            stack: None,
            call_depth: 0,
            context: Vec::new(),
            globals: FxHashMap::default(),
            statics: FxHashMap::default(),
            prototypes: FxHashMap::default(),
            modules_initialized: FxHashSet::default(),
            classes_initialized: FxHashSet::default(),
        }
    }
}
