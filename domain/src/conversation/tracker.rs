//! Incremental state for one conversation
//!
//! The tracker accumulates messages and keeps derived signals up to date as
//! each one arrives:
//!
//! | Signal | Updated by | Reset by |
//! |--------|------------|----------|
//! | round count / history | [`ConversationTracker::add_message`] | [`ConversationTracker::reset`] |
//! | agreement level (±0.1 per message) | [`ConversationTracker::add_message`] | [`ConversationTracker::reset`] |
//! | participation, topic tags | [`ConversationTracker::add_message`] | [`ConversationTracker::reset`] |
//! | consensus attempts | [`ConversationTracker::detect_consensus_attempt`] | [`ConversationTracker::reset`] |
//! | stalemate flag (sticky) | [`ConversationTracker::detect_stalemate`] | [`ConversationTracker::reset`] |

use super::message::{BatchMessage, MessageRecord};
use super::termination::TerminationReason;
use crate::core::text::max_pairwise_similarity;
use crate::core::thresholds::{DEFAULT_MAX_ROUNDS, DetectionThresholds};
use crate::lexicon::{
    AGREEMENT_PHRASES, CONSENSUS_MARKERS, DISAGREEMENT_PHRASES, STALEMATE_PHRASES, contains_any,
    count_hits, has_terminal_marker, topics_in,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

const AGREEMENT_STEP: f64 = 0.1;
const REPETITION_WINDOW: usize = 3;
const STALEMATE_WINDOW: usize = 5;
const STALEMATE_MIN_PHRASES: usize = 2;
const TERMINAL_MARKER_WINDOW: usize = 3;

/// Tracks one conversation and decides when it should stop.
///
/// # Example
///
/// ```
/// use concord_domain::{ConversationTracker, TerminationReason};
///
/// let mut tracker = ConversationTracker::new(2);
/// tracker.add_message("I think we should focus on UX", Some("Alex"));
/// assert_eq!(tracker.should_terminate(None), None);
///
/// tracker.add_message("I agree with Alex on UX", Some("Max"));
/// assert_eq!(tracker.should_terminate(None), Some(TerminationReason::MaxRounds));
/// ```
#[derive(Debug, Clone)]
pub struct ConversationTracker {
    max_rounds: usize,
    thresholds: DetectionThresholds,
    messages: Vec<MessageRecord>,
    agreement_level: f64,
    participation: BTreeMap<String, usize>,
    topic_tags: Vec<String>,
    consensus_attempts: usize,
    last_consensus_round: Option<usize>,
    stalemate_flag: bool,
    started_at: DateTime<Utc>,
}

impl Default for ConversationTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ROUNDS)
    }
}

impl ConversationTracker {
    /// Create a tracker with the given round ceiling and default thresholds
    pub fn new(max_rounds: usize) -> Self {
        Self::with_thresholds(max_rounds, DetectionThresholds::default())
    }

    /// Create a tracker with custom detection thresholds
    pub fn with_thresholds(max_rounds: usize, thresholds: DetectionThresholds) -> Self {
        Self {
            max_rounds,
            thresholds,
            messages: Vec::new(),
            agreement_level: 0.0,
            participation: BTreeMap::new(),
            topic_tags: Vec::new(),
            consensus_attempts: 0,
            last_consensus_round: None,
            stalemate_flag: false,
            started_at: Utc::now(),
        }
    }

    // ==================== Mutation ====================

    /// Append a message and update every derived signal.
    ///
    /// The agreement level moves by one step toward whichever of the
    /// agreement or disagreement phrase sets has more hits in `content`;
    /// a tie (including no hits at all) leaves it unchanged.
    pub fn add_message(&mut self, content: impl Into<String>, author: Option<&str>) {
        let content = content.into();
        let round = self.messages.len() + 1;

        if let Some(author) = author {
            *self.participation.entry(author.to_string()).or_insert(0) += 1;
        }

        self.topic_tags
            .extend(topics_in(&content).into_iter().map(str::to_string));
        self.update_agreement_level(&content);

        self.messages.push(MessageRecord::new(
            content,
            author.map(str::to_string),
            round,
        ));
    }

    fn update_agreement_level(&mut self, content: &str) {
        let lowered = content.to_lowercase();
        let agreement = count_hits(&lowered, AGREEMENT_PHRASES);
        let disagreement = count_hits(&lowered, DISAGREEMENT_PHRASES);

        if agreement > disagreement {
            self.agreement_level = (self.agreement_level + AGREEMENT_STEP).min(1.0);
        } else if disagreement > agreement {
            self.agreement_level = (self.agreement_level - AGREEMENT_STEP).max(0.0);
        }
    }

    /// Clear all derived state, keeping the configured round ceiling.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.agreement_level = 0.0;
        self.participation.clear();
        self.topic_tags.clear();
        self.consensus_attempts = 0;
        self.last_consensus_round = None;
        self.stalemate_flag = false;
        self.started_at = Utc::now();
    }

    // ==================== Detection ====================

    /// Whether any two of the last three messages are near-duplicates.
    pub fn detect_repetition(&self) -> bool {
        if self.messages.len() < REPETITION_WINDOW {
            return false;
        }
        let recent = &self.messages[self.messages.len() - REPETITION_WINDOW..];
        max_pairwise_similarity(recent.iter().map(|m| m.content.as_str()))
            > self.thresholds.repetition_similarity
    }

    /// Whether the last five messages contain at least two stalemate phrases.
    ///
    /// A positive result latches the stalemate flag until [`reset`](Self::reset).
    pub fn detect_stalemate(&mut self) -> bool {
        if self.messages.len() < STALEMATE_WINDOW {
            return false;
        }
        let recent = self.messages[self.messages.len() - STALEMATE_WINDOW..]
            .iter()
            .map(|m| m.content.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");

        let stalled = count_hits(&recent, STALEMATE_PHRASES) >= STALEMATE_MIN_PHRASES;
        if stalled {
            self.stalemate_flag = true;
        }
        stalled
    }

    /// Whether the most recent message proposes consensus.
    ///
    /// Each hit is counted toward the attempt total used by
    /// [`should_terminate`](Self::should_terminate).
    pub fn detect_consensus_attempt(&mut self) -> bool {
        let Some(latest) = self.messages.last() else {
            return false;
        };
        let found = contains_any(&latest.content.to_lowercase(), CONSENSUS_MARKERS);
        if found {
            self.consensus_attempts += 1;
            self.last_consensus_round = Some(self.round_count());
        }
        found
    }

    /// Decide whether the conversation should stop.
    ///
    /// Checks run in a fixed order and the first match wins:
    ///
    /// 1. round ceiling reached
    /// 2. a terminal consensus marker in the last three messages of
    ///    `recent_messages` (when supplied)
    /// 3. stalemate
    /// 4. repetition
    /// 5. too many consensus attempts
    pub fn should_terminate(
        &mut self,
        recent_messages: Option<&[BatchMessage]>,
    ) -> Option<TerminationReason> {
        if self.round_count() >= self.max_rounds {
            return Some(TerminationReason::MaxRounds);
        }

        if let Some(batch) = recent_messages {
            let start = batch.len().saturating_sub(TERMINAL_MARKER_WINDOW);
            if batch[start..]
                .iter()
                .any(|m| has_terminal_marker(&m.content))
            {
                return Some(TerminationReason::ConsensusReached);
            }
        }

        if self.detect_stalemate() {
            return Some(TerminationReason::Stalemate);
        }

        if self.detect_repetition() {
            return Some(TerminationReason::Repetition);
        }

        if self.consensus_attempts >= self.thresholds.max_consensus_attempts {
            return Some(TerminationReason::ConsensusAttemptsExhausted);
        }

        None
    }

    // ==================== Accessors ====================

    /// Number of messages recorded so far
    pub fn round_count(&self) -> usize {
        self.messages.len()
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    pub fn thresholds(&self) -> &DetectionThresholds {
        &self.thresholds
    }

    /// Recorded messages in conversational order
    pub fn messages(&self) -> &[MessageRecord] {
        &self.messages
    }

    /// Recorded messages as an analysis batch
    pub fn batch(&self) -> Vec<BatchMessage> {
        self.messages.iter().map(BatchMessage::from).collect()
    }

    /// Running agreement level, always within [0.0, 1.0]
    pub fn agreement_level(&self) -> f64 {
        self.agreement_level
    }

    pub fn participation(&self) -> &BTreeMap<String, usize> {
        &self.participation
    }

    /// Every topic tag observed, with repeats
    pub fn topic_tags(&self) -> &[String] {
        &self.topic_tags
    }

    pub fn consensus_attempts(&self) -> usize {
        self.consensus_attempts
    }

    /// Round of the most recent consensus attempt
    pub fn last_consensus_round(&self) -> Option<usize> {
        self.last_consensus_round
    }

    pub fn is_stalemated(&self) -> bool {
        self.stalemate_flag
    }

    /// Wall-clock time since creation or the last reset
    pub fn elapsed(&self) -> Duration {
        (Utc::now() - self.started_at).to_std().unwrap_or_default()
    }

    /// Snapshot of the conversation state
    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            round_count: self.round_count(),
            max_rounds: self.max_rounds,
            consensus_attempts: self.consensus_attempts,
            stalemate_detected: self.stalemate_flag,
            agreement_level: self.agreement_level,
            participation: self.participation.clone(),
            elapsed_ms: self.elapsed().as_millis() as u64,
            topics: self.topic_tags.iter().cloned().collect(),
        }
    }
}

/// Serializable snapshot returned by [`ConversationTracker::summary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub round_count: usize,
    pub max_rounds: usize,
    pub consensus_attempts: usize,
    pub stalemate_detected: bool,
    pub agreement_level: f64,
    pub participation: BTreeMap<String, usize>,
    /// Milliseconds since the tracker was created or reset
    pub elapsed_ms: u64,
    /// Distinct topic tags observed
    pub topics: BTreeSet<String>,
}
