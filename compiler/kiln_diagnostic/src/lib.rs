//! Diagnostics for the Kiln evaluator.
//!
//! A [`Diagnostic`] carries:
//! - an [`ErrorCode`] for searchability
//! - a message saying what went wrong
//! - labeled spans saying where
//! - notes with extra context (stack traces, for runtime failures)
//!
//! Diagnostics are handed to a [`DiagnosticSink`]. The evaluator never
//! formats or prints them itself.

mod diagnostic;
mod error_code;
mod sink;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use sink::{DiagnosticBuffer, DiagnosticSink, SharedSink, TracingSink};
