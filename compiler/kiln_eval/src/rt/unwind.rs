//! Non-local control flow.

use std::rc::Rc;

use kiln_ir::{Name, Span};

use super::{Object, StackFrame};

/// A thrown value with the place it was thrown from.
#[derive(Debug)]
pub struct Exception {
    pub thrown: Object,
    /// The `throw` statement or faulting node.
    pub node: Span,
    /// Innermost frame at the time of the throw.
    pub stack: Option<Rc<StackFrame>>,
}

/// Why evaluation stopped before running to completion.
///
/// Statements return `Result<(), Unwind>` and expressions
/// `Result<Object, Unwind>`; `?` propagates an unwind to whichever
/// construct absorbs it (loops, labels, `switch`, `try`, calls).
#[derive(Debug)]
pub enum Unwind {
    Break(Option<Name>),
    Continue(Option<Name>),
    Return(Option<Object>),
    Throw(Box<Exception>),
}

impl Unwind {
    pub fn throw(thrown: Object, node: Span, stack: Option<Rc<StackFrame>>) -> Self {
        Unwind::Throw(Box::new(Exception {
            thrown,
            node,
            stack,
        }))
    }

    pub fn exception(&self) -> Option<&Exception> {
        match self {
            Unwind::Throw(exception) => Some(exception),
            _ => None,
        }
    }

    pub fn is_throw(&self) -> bool {
        matches!(self, Unwind::Throw(_))
    }

    /// Short name for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Unwind::Break(_) => "break",
            Unwind::Continue(_) => "continue",
            Unwind::Return(_) => "return",
            Unwind::Throw(_) => "throw",
        }
    }
}

/// Result of executing a statement.
pub type ExecResult = Result<(), Unwind>;
/// Result of evaluating an expression.
pub type EvalResult = Result<Object, Unwind>;
