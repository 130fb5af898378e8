//! Accumulating event log for non-fatal geometry diagnostics.
//!
//! Curve modification operations never return `Err` for "bad but plausible"
//! input data. They record an event here, return `None` or a partial result,
//! and let the caller inspect the accumulated log after the fact. Events are
//! additionally emitted through `tracing` as they are recorded.

/// Severity of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Error,
    Warning,
    Note,
}

/// A single recorded diagnostic.
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub message: String,
}

/// Checkpoint into an [`EventLog`], used to roll back partial diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint(usize);

/// Append-only diagnostic log owned by the caller.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error-severity event. Always returns `true`.
    pub fn record_error(&mut self, message: impl Into<String>) -> bool {
        let message = message.into();
        tracing::error!(target: "curvekit", "{message}");
        self.events.push(Event {
            kind: EventKind::Error,
            message,
        });
        true
    }

    /// Records a warning-severity event. Always returns `true`.
    pub fn record_warning(&mut self, message: impl Into<String>) -> bool {
        let message = message.into();
        tracing::warn!(target: "curvekit", "{message}");
        self.events.push(Event {
            kind: EventKind::Warning,
            message,
        });
        true
    }

    /// Records a note-severity event. Always returns `true`.
    pub fn record_note(&mut self, message: impl Into<String>) -> bool {
        let message = message.into();
        tracing::info!(target: "curvekit", "{message}");
        self.events.push(Event {
            kind: EventKind::Note,
            message,
        });
        true
    }

    /// All recorded events, in recording order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Messages of all error-severity events.
    #[must_use]
    pub fn errors(&self) -> Vec<&str> {
        self.by_kind(EventKind::Error)
    }

    /// Messages of all warning-severity events.
    #[must_use]
    pub fn warnings(&self) -> Vec<&str> {
        self.by_kind(EventKind::Warning)
    }

    /// Returns whether any error-severity event has been recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.events.iter().any(|e| e.kind == EventKind::Error)
    }

    /// Marks the current log position.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.events.len())
    }

    /// Discards every event recorded after `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.events.truncate(checkpoint.0);
    }

    fn by_kind(&self, kind: EventKind) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.message.as_str())
            .collect()
    }
}
