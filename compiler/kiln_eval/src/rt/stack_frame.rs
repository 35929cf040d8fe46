//! Interpreted call frames.

use std::rc::Rc;

use kiln_ir::{FunctionId, Program, Span};

/// One activation in the interpreted call chain.
///
/// Frames form a linked list through `parent`; a thrown exception keeps
/// the list alive by holding the innermost frame.
#[derive(Debug)]
pub struct StackFrame {
    pub function: FunctionId,
    /// Call site in the caller.
    pub caller: Span,
    pub parent: Option<Rc<StackFrame>>,
}

impl StackFrame {
    /// This frame followed by its ancestors, innermost first.
    pub fn iter(&self) -> impl Iterator<Item = &StackFrame> {
        std::iter::successors(Some(self), |frame| frame.parent.as_deref())
    }

    pub fn depth(&self) -> usize {
        self.iter().count()
    }
}

/// Render a stack trace, one `at` line per frame, innermost first.
///
/// The innermost frame is located at `node` (the throw site); every outer
/// frame at the call site of the frame inside it.
pub fn format_trace(program: &Program, stack: Option<&StackFrame>, node: Span, indent: &str) -> String {
    let Some(top) = stack else {
        return format!("{indent}at <top level> ({node})");
    };
    let mut lines = Vec::new();
    let mut location = node;
    for frame in top.iter() {
        lines.push(format!(
            "{indent}at {} ({location})",
            program.function_token(frame.function)
        ));
        location = frame.caller;
    }
    lines.join("\n")
}
