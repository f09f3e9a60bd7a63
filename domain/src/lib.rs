//! Domain layer for concord
//!
//! This crate contains the conversation heuristics, document extraction, and
//! shape validation. It has no dependencies on infrastructure or presentation
//! concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! A conversation is a sequence of messages from several participants,
//! grouped into rounds (one round per message):
//!
//! - **ConversationTracker**: per-conversation state that decides when to stop
//! - **ConsensusAnalyzer**: stateless-per-call scoring over any message batch
//!
//! ## Termination
//!
//! A conversation ends on the round limit, an explicit consensus marker, a
//! stalemate, repetition, or too many consensus attempts, checked in that
//! order. See [`TerminationReason`].
//!
//! ## Documents
//!
//! - **StructuredExtractor**: recovers a JSON document from free text
//! - **ShapeValidator**: accepts the document against a schema or a known
//!   structural shape

pub mod consensus;
pub mod conversation;
pub mod core;
pub mod extraction;
pub mod intake;
pub mod lexicon;
pub mod validation;

// Re-export commonly used types
pub use consensus::{AnalyzerSummary, ConsensusAnalyzer, ConsensusAssessment, ConsensusAttempt};
pub use conversation::{
    BatchMessage, ConversationSummary, ConversationTracker, MessageRecord, TerminationReason,
};
pub use core::{
    error::DomainError,
    thresholds::{DEFAULT_MAX_ROUNDS, DetectionThresholds},
};
pub use extraction::{Extraction, ExtractionStrategy, StructuredExtractor};
pub use intake::{BriefLayout, ProjectBrief, parse_brief};
pub use validation::{SchemaError, SchemaRule, ShapeRule, ShapeValidator, ValidationResult, Verdict};
