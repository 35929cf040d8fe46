//! Centralized messages for runtime faults and diagnostics.
//!
//! Runtime faults (null receivers, bad array sizes, failed casts) become
//! thrown string values that the program can catch. Problems with the
//! host's call or with assignments to frozen cells are reported as
//! diagnostics and never reach the program.

use kiln_diagnostic::{Diagnostic, ErrorCode};
use kiln_ir::Span;

use crate::interpreter::format_number;
use crate::rt::MAX_ARRAY_LENGTH;

// Runtime faults (thrown as strings)

pub fn null_reference() -> String {
    "Target object is null".to_owned()
}

pub fn invalid_array_size(size: f64) -> String {
    let size = format_number(size);
    format!("Invalid array size {size} (must be in 0..={MAX_ARRAY_LENGTH})")
}

pub fn too_many_array_elements(expected: usize, got: usize) -> String {
    format!("Invalid number of array elements; expected <={expected}, got {got}")
}

pub fn invalid_cast(from: &str, to: &str) -> String {
    format!("Cannot cast object of type '{from}' to '{to}'")
}

pub fn array_index_out_of_range(index: f64) -> String {
    let index = format_number(index);
    format!("Array index {index} is out of range (must be in 0..{MAX_ARRAY_LENGTH})")
}

pub fn call_depth_exceeded(max: usize) -> String {
    format!("Maximum call depth of {max} exceeded")
}

pub fn readonly_property(name: &str) -> String {
    format!("Cannot assign read-only property '{name}'")
}

// Host call diagnostics

pub fn argument_count_mismatch(span: Span, function: &str, expected: usize, got: usize) -> Diagnostic {
    Diagnostic::error(ErrorCode::E6001)
        .with_message(format!(
            "Function '{function}' expects {expected} argument(s), got {got}"
        ))
        .with_label(span, "called here")
}

pub fn unrecognized_argument(span: Span, function: &str, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E6002)
        .with_message(format!(
            "Function '{function}' has no parameter named '{name}'"
        ))
        .with_label(span, "called here")
}

pub fn missing_argument(span: Span, function: &str, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E6003)
        .with_message(format!(
            "Missing argument for parameter '{name}' of '{function}'"
        ))
        .with_label(span, "called here")
}

pub fn incorrect_argument_type(
    span: Span,
    function: &str,
    name: &str,
    expected: &str,
    got: &str,
) -> Diagnostic {
    Diagnostic::error(ErrorCode::E6004)
        .with_message(format!(
            "Argument '{name}' of '{function}' has type '{got}', which is not convertible to '{expected}'"
        ))
        .with_label(span, "called here")
}

pub fn missing_entry_point(span: Span, module: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E6010)
        .with_message(format!("Module '{module}' has no entry point function 'main'"))
        .with_label(span, "")
}

pub fn missing_default_module(package: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E6011)
        .with_message(format!("Package '{package}' has no default module"))
}

// Evaluation diagnostics

pub fn unhandled_exception(span: Span, message: &str, trace: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E6005)
        .with_message(format!(
            "An unhandled exception terminated the program: {message}"
        ))
        .with_label(span, "thrown here")
        .with_note(trace)
}

pub fn unhandled_init_exception(span: Span, subject: &str, message: &str, trace: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E6006)
        .with_message(format!(
            "An unhandled exception occurred while initializing '{subject}': {message}"
        ))
        .with_label(span, "thrown here")
        .with_note(trace)
}

pub fn readonly_lvalue(span: Span, name: &str) -> Diagnostic {
    let what = if name.is_empty() { "location" } else { name };
    Diagnostic::error(ErrorCode::E6007)
        .with_message(format!("Illegal assignment to read-only '{what}'"))
        .with_label(span, "assigned here")
}
