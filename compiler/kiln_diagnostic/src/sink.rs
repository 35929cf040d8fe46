//! Destinations for emitted diagnostics.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use crate::{Diagnostic, Severity};

/// Receives diagnostics as they are reported.
///
/// Takes `&self` so one sink can be shared between the evaluator and its
/// embedder; implementations use interior mutability.
pub trait DiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic);

    fn error_count(&self) -> usize;

    fn warning_count(&self) -> usize;

    fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Shared, single-threaded handle to a sink.
pub type SharedSink = Rc<dyn DiagnosticSink>;

/// Collects diagnostics in emission order.
#[derive(Debug, Default)]
pub struct DiagnosticBuffer {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl DiagnosticBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Ref<'_, Vec<Diagnostic>> {
        self.diagnostics.borrow()
    }

    /// Codes of everything collected so far, in order.
    pub fn codes(&self) -> Vec<crate::ErrorCode> {
        self.diagnostics.borrow().iter().map(|d| d.code).collect()
    }

    /// Remove and return everything collected so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

impl DiagnosticSink for DiagnosticBuffer {
    fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }
}

/// Forwards diagnostics to `tracing` events, keeping only counts.
#[derive(Debug, Default)]
pub struct TracingSink {
    errors: Cell<usize>,
    warnings: Cell<usize>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let span = diagnostic.primary_span().unwrap_or_default();
        match diagnostic.severity {
            Severity::Error => {
                self.errors.set(self.errors.get() + 1);
                tracing::error!(code = %diagnostic.code, %span, "{}", diagnostic.message);
            }
            Severity::Warning => {
                self.warnings.set(self.warnings.get() + 1);
                tracing::warn!(code = %diagnostic.code, %span, "{}", diagnostic.message);
            }
            Severity::Note | Severity::Help => {
                tracing::info!(code = %diagnostic.code, %span, "{}", diagnostic.message);
            }
        }
        for note in &diagnostic.notes {
            tracing::info!(code = %diagnostic.code, "note: {note}");
        }
    }

    fn error_count(&self) -> usize {
        self.errors.get()
    }

    fn warning_count(&self) -> usize {
        self.warnings.get()
    }
}
