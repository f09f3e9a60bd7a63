//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording session events
//! (observed messages, consensus attempts, termination, extraction and
//! validation results) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the session
//! history in a machine-readable format (JSONL).

use serde_json::Value;

/// Event type identifiers emitted by
/// [`ConsensusSession`](crate::use_cases::consensus_session::ConsensusSession).
pub mod event_types {
    pub const MESSAGE_OBSERVED: &str = "message_observed";
    pub const CONSENSUS_ATTEMPT: &str = "consensus_attempt";
    pub const TERMINATION: &str = "termination";
    pub const EXTRACTION: &str = "extraction";
    pub const VALIDATION: &str = "validation";
}

/// A structured conversation event for logging.
///
/// Implementations stamp each event with a UTC timestamp when writing it.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    /// Event type identifier (see [`event_types`]).
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging conversation events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// `log` is synchronous and non-fallible; a failed write must not interrupt
/// the session.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
