//! Observer callbacks for tracing and debugging embedders.

use std::rc::Rc;

use kiln_ir::{FunctionId, ModuleId, Program, Span};

use crate::rt::Object;

/// Callback run when a package, module, or function is left.
pub type LeaveHook = Box<dyn FnOnce()>;

/// Events raised by the evaluator. Every method defaults to doing nothing.
pub trait InterpreterHooks {
    /// A runtime object was allocated.
    fn on_new_object(&self, _span: Span, _obj: &Object) {}

    /// A variable, property, or array element received a value. `target`
    /// is the owning object for properties and elements, `None` for locals.
    fn on_variable_assign(
        &self,
        _span: Span,
        _target: Option<&Object>,
        _name: &str,
        _old: Option<&Object>,
        _new: &Object,
    ) {
    }

    fn on_enter_package(&self, _program: &Program) -> Option<LeaveHook> {
        None
    }

    fn on_enter_module(&self, _program: &Program, _module: ModuleId) -> Option<LeaveHook> {
        None
    }

    fn on_enter_function(&self, _program: &Program, _function: FunctionId) -> Option<LeaveHook> {
        None
    }
}

pub type SharedHooks = Rc<dyn InterpreterHooks>;

/// Runs a [`LeaveHook`] when dropped, on every exit path.
pub(crate) struct LeaveGuard(Option<LeaveHook>);

impl LeaveGuard {
    pub(crate) fn new(hook: Option<LeaveHook>) -> Self {
        LeaveGuard(hook)
    }
}

impl Drop for LeaveGuard {
    fn drop(&mut self) {
        if let Some(leave) = self.0.take() {
            leave();
        }
    }
}
