//! Session parameters: per-conversation limits and heuristic cutoffs.
//!
//! [`SessionParams`] groups the static parameters a
//! [`ConsensusSession`](crate::use_cases::consensus_session::ConsensusSession)
//! is built from. They are resolved once from configuration and never change
//! for the lifetime of a session.

use concord_domain::extraction::DEFAULT_MAX_REGEX_INPUT_BYTES;
use concord_domain::{DEFAULT_MAX_ROUNDS, DetectionThresholds};
use serde::{Deserialize, Serialize};

/// Per-session control parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionParams {
    /// Round ceiling; the conversation stops once this many messages arrive.
    pub max_rounds: usize,
    /// Cutoffs shared by the tracker and the analyzer.
    pub thresholds: DetectionThresholds,
    /// Input size above which the extractor skips its regex fallback.
    pub max_regex_input_bytes: usize,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            thresholds: DetectionThresholds::default(),
            max_regex_input_bytes: DEFAULT_MAX_REGEX_INPUT_BYTES,
        }
    }
}

impl SessionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, max: usize) -> Self {
        self.max_rounds = max;
        self
    }

    pub fn with_thresholds(mut self, thresholds: DetectionThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_max_regex_input_bytes(mut self, max: usize) -> Self {
        self.max_regex_input_bytes = max;
        self
    }
}
