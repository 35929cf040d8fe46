//! RAII-style scope guards for Interpreter scope management.
//!
//! The guard holds `&mut Interpreter` and implements `Deref`/`DerefMut`, so
//! the interpreter is used through it unchanged. Dropping the guard pops the
//! scope block it pushed (and, for call frames, the stack frame and binding
//! context), on every exit path including `?` and panics.

use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use kiln_ir::{FunctionId, Span};

use super::{BindingContext, Interpreter};
use crate::rt::StackFrame;

#[derive(Copy, Clone, PartialEq, Eq)]
enum ScopeKind {
    Block,
    Frame,
}

/// RAII guard that pops the scope it pushed when dropped.
pub struct ScopedInterpreter<'guard, 'p> {
    interpreter: &'guard mut Interpreter<'p>,
    kind: ScopeKind,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        let interpreter = &mut *self.interpreter;
        if self.kind == ScopeKind::Frame {
            let parent = interpreter
                .stack
                .take()
                .and_then(|frame| frame.parent.clone());
            interpreter.stack = parent;
            interpreter.call_depth = interpreter.call_depth.saturating_sub(1);
            interpreter.context.pop();
        }
        interpreter.locals.pop();
    }
}

impl<'p> Deref for ScopedInterpreter<'_, 'p> {
    type Target = Interpreter<'p>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'p> Interpreter<'p> {
    /// Push a lexical block scope, popped when the guard drops.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_, 'p> {
        self.locals.push(false);
        ScopedInterpreter {
            interpreter: self,
            kind: ScopeKind::Block,
        }
    }

    /// Push an activation frame for a call to `function` from `caller`.
    ///
    /// Locals of enclosing frames are invisible until the guard drops.
    pub(crate) fn framed(
        &mut self,
        function: FunctionId,
        caller: Span,
        context: BindingContext,
    ) -> ScopedInterpreter<'_, 'p> {
        let frame = StackFrame {
            function,
            caller,
            parent: self.stack.take(),
        };
        self.stack = Some(Rc::new(frame));
        self.call_depth += 1;
        self.context.push(context);
        self.locals.push(true);
        ScopedInterpreter {
            interpreter: self,
            kind: ScopeKind::Frame,
        }
    }
}
