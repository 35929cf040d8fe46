//! The runtime object model: objects, cells, property maps, call frames,
//! and unwinds.

mod object;
mod pointer;
mod properties;
mod stack_frame;
mod unwind;

pub use object::{
    array_index, array_length, objects_equal, FunctionStub, Object, ObjectValue, MAX_ARRAY_LENGTH,
};
pub use pointer::Pointer;
pub use properties::PropertyMap;
pub use stack_frame::{format_trace, StackFrame};
pub use unwind::{EvalResult, ExecResult, Exception, Unwind};
