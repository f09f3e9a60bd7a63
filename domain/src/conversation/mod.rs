//! Single-conversation lifecycle tracking
//!
//! A [`ConversationTracker`] is created per conversation and mutated one
//! message at a time. It is not internally synchronized: share it across
//! threads only behind a lock held by a single writer.

pub mod message;
pub mod termination;
pub mod tracker;

pub use message::{BatchMessage, MessageRecord};
pub use termination::TerminationReason;
pub use tracker::{ConversationSummary, ConversationTracker};
