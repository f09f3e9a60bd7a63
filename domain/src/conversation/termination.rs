//! Reasons a tracked conversation should stop

use serde::{Deserialize, Serialize};

/// Why [`ConversationTracker::should_terminate`](super::ConversationTracker::should_terminate)
/// asked the conversation to stop.
///
/// Variants are listed in evaluation priority: the round ceiling always wins,
/// an explicit consensus marker short-circuits the stalemate and repetition
/// checks, and the attempt count is consulted last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Round count reached the configured ceiling
    MaxRounds,
    /// A recent message carried a terminal consensus marker
    ConsensusReached,
    /// Recent messages are dense with stalemate phrases
    Stalemate,
    /// Recent messages are near-duplicates of each other
    Repetition,
    /// Consensus was proposed repeatedly without resolution
    ConsensusAttemptsExhausted,
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::MaxRounds => "max rounds reached",
            TerminationReason::ConsensusReached => "consensus reached",
            TerminationReason::Stalemate => "stalemate detected",
            TerminationReason::Repetition => "repetition detected",
            TerminationReason::ConsensusAttemptsExhausted => {
                "multiple consensus attempts without resolution"
            }
        }
    }

    /// Whether the conversation ended because the participants converged
    pub fn is_consensus(&self) -> bool {
        matches!(self, TerminationReason::ConsensusReached)
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(TerminationReason::MaxRounds.to_string(), "max rounds reached");
        assert_eq!(
            TerminationReason::ConsensusAttemptsExhausted.to_string(),
            "multiple consensus attempts without resolution"
        );
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&TerminationReason::ConsensusReached).unwrap();
        assert_eq!(json, "\"consensus_reached\"");
    }

    #[test]
    fn test_is_consensus() {
        assert!(TerminationReason::ConsensusReached.is_consensus());
        assert!(!TerminationReason::Stalemate.is_consensus());
    }
}
