//! Application layer for concord
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::SessionParams;
pub use ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger, event_types,
};
pub use use_cases::consensus_session::{ConsensusSession, SessionOutcome, StepReport};
pub use use_cases::replay_transcript::{
    ReplayTranscriptInput, ReplayTranscriptOutput, ReplayTranscriptUseCase, SessionError,
    TranscriptEntry,
};
