//! Tunable cutoffs for the conversation heuristics.

use serde::{Deserialize, Serialize};

/// Default round ceiling for a tracked conversation
pub const DEFAULT_MAX_ROUNDS: usize = 25;

/// Cutoffs shared by [`ConversationTracker`](crate::ConversationTracker) and
/// [`ConsensusAnalyzer`](crate::ConsensusAnalyzer).
///
/// The defaults reproduce the stock heuristic behavior; callers validate
/// custom values before construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionThresholds {
    /// Batch agreement below this counts toward a stalemate
    pub low_agreement: f64,
    /// Pairwise Jaccard similarity above this is a repetition
    pub repetition_similarity: f64,
    /// Agreement level a converged batch must reach
    pub consensus: f64,
    /// Confidence a converged batch must reach
    pub confidence: f64,
    /// Round count at which the analyzer recommends forcing a decision
    pub force_after_rounds: usize,
    /// Consensus attempts that end a conversation without resolution
    pub max_consensus_attempts: usize,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            low_agreement: 0.3,
            repetition_similarity: 0.7,
            consensus: 0.7,
            confidence: 0.6,
            force_after_rounds: 15,
            max_consensus_attempts: 3,
        }
    }
}
