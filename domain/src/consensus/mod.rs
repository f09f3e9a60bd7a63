//! Consensus scoring over arbitrary message batches
//!
//! Unlike [`ConversationTracker`](crate::ConversationTracker), the analyzer
//! keeps no conversation lifecycle: it can re-score a replayed transcript or
//! any slice of one. It shares its phrase tables with the tracker through
//! [`lexicon`](crate::lexicon).

pub mod analyzer;

pub use analyzer::{AnalyzerSummary, ConsensusAnalyzer, ConsensusAssessment, ConsensusAttempt};
