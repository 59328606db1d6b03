//! Diagnostic events emitted while extracting fields.
//!
//! The extractor reports every decision to a [`DiagnosticSink`]. The default
//! sink forwards to `tracing`; tests and UIs can collect events instead.
//! Sinks never influence the parse result.

use std::sync::Mutex;

use tracing::{debug, warn};

use super::values::NormalizeError;
use crate::models::FieldId;

/// Why a line produced no field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoColon,
    EmptyValue,
    UnknownLabel(String),
}

/// One extraction decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A line was ignored
    LineSkipped { line: usize, reason: SkipReason },
    /// A field value was accepted
    FieldExtracted { line: usize, field: FieldId },
    /// A recognized field's value could not be normalized
    NormalizationFailed {
        line: usize,
        field: FieldId,
        error: NormalizeError,
    },
    /// Extraction finished
    Finished { lines: usize, fields: usize },
}

/// Receiver for diagnostic events.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: &Diagnostic);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: &Diagnostic) {
        match event {
            Diagnostic::LineSkipped { line, reason } => {
                debug!(line, ?reason, "skipping line");
            }
            Diagnostic::FieldExtracted { line, field } => {
                debug!(line, field = field.as_str(), "extracted field");
            }
            Diagnostic::NormalizationFailed { line, field, error } => {
                warn!(line, field = field.as_str(), %error, "could not normalize value");
            }
            Diagnostic::Finished { lines, fields } => {
                debug!(lines, fields, "structured text parsed");
            }
        }
    }
}

/// Discards events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _event: &Diagnostic) {}
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events.
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Drain recorded events.
    pub fn take(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl DiagnosticSink for CollectingSink {
    fn record(&self, event: &Diagnostic) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingSink::new();
        sink.record(&Diagnostic::LineSkipped {
            line: 1,
            reason: SkipReason::NoColon,
        });
        sink.record(&Diagnostic::Finished { lines: 1, fields: 0 });

        assert_eq!(sink.events().len(), 2);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.events().is_empty());
    }
}
