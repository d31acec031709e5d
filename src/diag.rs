//! Diagnostic reporting.
//!
//! Invalid input is reported through a [`Reporter`] held by the caller, usually inside a
//! [`Linalg`](crate::Linalg) context. Each [`Diagnostic`] carries the source location of the
//! failing call, the operation name and a human-readable message.
//!
//! - [`TracingReporter`]: forwards to `tracing` (`error!` / `warn!`)
//! - [`CaptureReporter`]: keeps diagnostics in memory, for tests and batch tools
//! - [`NullReporter`]: discards everything

use crate::LinalgError;
use std::cell::RefCell;
use std::fmt;
use std::panic::Location;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A single reported condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Name of the operation the caller invoked.
    pub operation: &'static str,
    /// Source location of the call.
    pub location: &'static Location<'static>,
    pub message: String,
}

impl Diagnostic {
    /// Build a diagnostic for `err`, located at the caller.
    #[track_caller]
    pub fn from_error(operation: &'static str, err: &LinalgError) -> Self {
        Self {
            severity: err.severity(),
            operation,
            location: Location::caller(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}: {}",
            self.severity, self.location, self.operation, self.message
        )
    }
}

/// Sink for diagnostics.
pub trait Reporter {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report(&self, diagnostic: &Diagnostic) {
        (**self).report(diagnostic)
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report(&self, diagnostic: &Diagnostic) {
        (**self).report(diagnostic)
    }
}

/// Emits each diagnostic as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, d: &Diagnostic) {
        match d.severity {
            Severity::Error => tracing::error!(
                operation = d.operation,
                location = %d.location,
                "{}",
                d.message
            ),
            Severity::Warning => tracing::warn!(
                operation = d.operation,
                location = %d.location,
                "{}",
                d.message
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _: &Diagnostic) {}
}

/// Records diagnostics in memory.
///
/// Single-threaded, like the rest of the crate.
#[derive(Debug, Default)]
pub struct CaptureReporter {
    records: RefCell<Vec<Diagnostic>>,
}

impl CaptureReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded diagnostics, oldest first.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.records.borrow().clone()
    }

    pub fn errors(&self) -> Vec<Diagnostic> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.with_severity(Severity::Warning)
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }

    fn with_severity(&self, severity: Severity) -> Vec<Diagnostic> {
        self.records
            .borrow()
            .iter()
            .filter(|d| d.severity == severity)
            .cloned()
            .collect()
    }
}

impl Reporter for CaptureReporter {
    fn report(&self, diagnostic: &Diagnostic) {
        self.records.borrow_mut().push(diagnostic.clone());
    }
}
