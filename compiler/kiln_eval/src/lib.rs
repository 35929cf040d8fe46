//! Kiln Eval - tree-walking evaluator for bound Kiln programs.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `Interpreter`: statement/expression dispatch over a bound [`Program`](kiln_ir::Program)
//! - `rt`: the object model (objects, cells, property maps, frames, unwinds)
//! - `LocalScope`: lexical scopes for locals, with activation blocks per call
//! - `Allocator`: every object creation, observed by the new-object hook
//! - `IntrinsicRegistry`: native functions behind `Intrinsic` bodies
//!
//! Runtime faults are thrown as catchable string exceptions; problems the
//! program cannot catch are reported to a
//! [`DiagnosticSink`](kiln_diagnostic::DiagnosticSink).

mod alloc;
mod config;
mod environment;
pub mod errors;
mod hooks;
pub mod interpreter;
mod intrinsics;
mod print_handler;
pub mod rt;
mod stack;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

pub use alloc::Allocator;
pub use config::{ConfigError, EvalConfig, DUMP_STATE_VAR, MAX_CALL_DEPTH_VAR};
pub use environment::LocalScope;
pub use hooks::{InterpreterHooks, LeaveHook, SharedHooks};
pub use interpreter::{
    details, display, format_number, Interpreter, InterpreterBuilder, Location, ScopedInterpreter,
};
pub use intrinsics::{IntrinsicCall, IntrinsicFn, IntrinsicRegistry};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler,
};
pub use stack::ensure_sufficient_stack;

/// Environment variable holding the log filter; `RUST_LOG` is the fallback.
pub const LOG_VAR: &str = "KILN_LOG";

static TRACING_INIT: Once = Once::new();

/// Initialize the tracing subscriber.
///
/// Does nothing unless `KILN_LOG` or `RUST_LOG` is set. Safe to call more
/// than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = EnvFilter::try_from_env(LOG_VAR).or_else(|_| EnvFilter::try_from_default_env());
        if let Ok(filter) = filter {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
