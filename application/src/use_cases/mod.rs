//! Use cases
//!
//! - [`consensus_session`]: observe a live conversation message by message
//! - [`replay_transcript`]: run a recorded conversation through a session

pub mod consensus_session;
pub mod replay_transcript;
