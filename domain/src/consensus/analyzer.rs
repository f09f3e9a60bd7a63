//! Batch consensus scoring
//!
//! [`ConsensusAnalyzer`] scores any slice of messages, independent of a live
//! conversation. Decisions depend only on the batch passed in; the analyzer's
//! two logs (agreement history and consensus attempts) accumulate across
//! calls and feed [`ConsensusAnalyzer::summary`] only.

use crate::conversation::BatchMessage;
use crate::core::text::max_pairwise_similarity;
use crate::core::thresholds::DetectionThresholds;
use crate::lexicon::{
    AGREEMENT_PATTERNS, CONSENSUS_MARKERS, NEGATIVE_WORDS, NEUTRAL_WORDS, POSITIVE_WORDS,
    STALEMATE_PHRASES, contains_any, count_hits,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const RECENT_WINDOW: usize = 3;
const STALEMATE_WINDOW: usize = 5;
const STALEMATE_MIN_PHRASES: usize = 2;
const LOW_AGREEMENT_MIN_MESSAGES: usize = 10;
const ATTEMPT_MIN_SCORE: f64 = 2.0;
const MARKER_WEIGHT: f64 = 1.0;
const PATTERN_WEIGHT: f64 = 0.5;
const AGREEMENT_WEIGHT: f64 = 0.7;
const MARKER_CONFIDENCE_WEIGHT: f64 = 0.3;
const SUMMARY_HISTORY_LEN: usize = 5;

/// A logged consensus bid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusAttempt {
    pub timestamp: DateTime<Utc>,
    /// Length of the batch the bid was found in
    pub message_count: usize,
    /// Bid score divided by the window size
    pub confidence: f64,
}

/// Cross-call statistics returned by [`ConsensusAnalyzer::summary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerSummary {
    /// The last five agreement levels, oldest first
    pub recent_agreement: Vec<f64>,
    /// Mean of `recent_agreement` (0.0 when empty)
    pub average_agreement: f64,
    pub consensus_attempts: usize,
    pub last_consensus_attempt: Option<ConsensusAttempt>,
}

/// Every analyzer signal for one batch, as returned by
/// [`ConsensusAnalyzer::assess`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsensusAssessment {
    pub agreement_level: f64,
    pub confidence: f64,
    pub consensus_attempt: bool,
    pub stalemate: bool,
    pub repetition: bool,
    pub force_consensus: bool,
    /// Agreement and confidence both cleared their thresholds
    pub converged: bool,
}

/// Stateless-per-call consensus scorer with persistent history logs.
///
/// Give each conversation its own analyzer: the logs are single-writer and
/// interleaving several conversations makes their summaries meaningless.
///
/// # Example
///
/// ```
/// use concord_domain::{BatchMessage, ConsensusAnalyzer};
///
/// let mut analyzer = ConsensusAnalyzer::new();
/// let batch: Vec<BatchMessage> = ["Yes, I agree", "Maybe", "No, that's wrong"]
///     .into_iter()
///     .map(BatchMessage::from)
///     .collect();
///
/// let level = analyzer.calculate_agreement_level(&batch);
/// assert!((0.0..=1.0).contains(&level));
/// assert_eq!(analyzer.summary().recent_agreement.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConsensusAnalyzer {
    thresholds: DetectionThresholds,
    agreement_history: Vec<f64>,
    attempt_log: Vec<ConsensusAttempt>,
}

impl ConsensusAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: DetectionThresholds) -> Self {
        Self {
            thresholds,
            ..Self::default()
        }
    }

    pub fn thresholds(&self) -> &DetectionThresholds {
        &self.thresholds
    }

    // ==================== Scoring ====================

    /// Whether the last three messages amount to a consensus bid.
    ///
    /// Each message scores 1.0 for a consensus marker plus 0.5 for an
    /// explicit agreement phrase. A total of 2.0 or more is a bid and is
    /// appended to the attempt log.
    pub fn detect_consensus_attempt(&mut self, batch: &[BatchMessage]) -> bool {
        if batch.len() < RECENT_WINDOW {
            return false;
        }

        let score: f64 = recent(batch, RECENT_WINDOW)
            .iter()
            .map(|message| {
                let lowered = message.content.to_lowercase();
                let mut score = 0.0;
                if contains_any(&lowered, CONSENSUS_MARKERS) {
                    score += MARKER_WEIGHT;
                }
                if contains_any(&lowered, AGREEMENT_PATTERNS) {
                    score += PATTERN_WEIGHT;
                }
                score
            })
            .sum();

        if score < ATTEMPT_MIN_SCORE {
            return false;
        }

        self.attempt_log.push(ConsensusAttempt {
            timestamp: Utc::now(),
            message_count: batch.len(),
            confidence: score / RECENT_WINDOW as f64,
        });
        true
    }

    /// Mean per-message agreement over the batch, appended to the history.
    ///
    /// A message with no indicator hits scores exactly 0.5. Otherwise it
    /// scores `(positive + 0.5 * neutral) / (positive + negative + neutral)`.
    /// An empty batch scores 0.0.
    pub fn calculate_agreement_level(&mut self, batch: &[BatchMessage]) -> f64 {
        if batch.is_empty() {
            return 0.0;
        }
        let total: f64 = batch.iter().map(|m| message_agreement(&m.content)).sum();
        let level = total / batch.len() as f64;
        self.agreement_history.push(level);
        level
    }

    /// Blend of agreement level and recent consensus markers, capped at 1.0.
    pub fn get_confidence(&mut self, batch: &[BatchMessage]) -> f64 {
        let agreement = self.calculate_agreement_level(batch);
        confidence_from(agreement, batch)
    }

    /// Whether the batch shows a stalemate, given its agreement level.
    ///
    /// Needs at least five messages. Long batches (more than ten messages)
    /// with agreement below the low-agreement cutoff are stalled outright;
    /// otherwise two stalemate phrases in the last five messages suffice.
    pub fn detect_stalemate(&self, batch: &[BatchMessage], agreement_level: f64) -> bool {
        if batch.len() < STALEMATE_WINDOW {
            return false;
        }
        if agreement_level < self.thresholds.low_agreement
            && batch.len() > LOW_AGREEMENT_MIN_MESSAGES
        {
            return true;
        }
        let joined = recent(batch, STALEMATE_WINDOW)
            .iter()
            .map(|m| m.content.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        count_hits(&joined, STALEMATE_PHRASES) >= STALEMATE_MIN_PHRASES
    }

    /// Whether any two of the last three messages are near-duplicates.
    pub fn detect_repetition(&self, batch: &[BatchMessage]) -> bool {
        if batch.len() < RECENT_WINDOW {
            return false;
        }
        max_pairwise_similarity(recent(batch, RECENT_WINDOW).iter().map(|m| m.content.as_str()))
            > self.thresholds.repetition_similarity
    }

    /// Whether the caller should stop debating and force a decision.
    pub fn should_force_consensus(&mut self, batch: &[BatchMessage], round_count: usize) -> bool {
        if round_count >= self.thresholds.force_after_rounds {
            return true;
        }
        let agreement = self.calculate_agreement_level(batch);
        self.force_without_rounds(batch, agreement)
    }

    fn force_without_rounds(&self, batch: &[BatchMessage], agreement: f64) -> bool {
        self.detect_stalemate(batch, agreement)
            || self.detect_repetition(batch)
            || self.attempt_log.len() >= self.thresholds.max_consensus_attempts
    }

    /// Compute every signal for one batch.
    ///
    /// The agreement level is calculated once, so the history grows by a
    /// single entry. A consensus bid found here is logged like
    /// [`detect_consensus_attempt`](Self::detect_consensus_attempt).
    pub fn assess(&mut self, batch: &[BatchMessage], round_count: usize) -> ConsensusAssessment {
        let consensus_attempt = self.detect_consensus_attempt(batch);
        let agreement_level = self.calculate_agreement_level(batch);
        let confidence = confidence_from(agreement_level, batch);
        let stalemate = self.detect_stalemate(batch, agreement_level);
        let repetition = self.detect_repetition(batch);
        let force_consensus = round_count >= self.thresholds.force_after_rounds
            || self.force_without_rounds(batch, agreement_level);

        ConsensusAssessment {
            agreement_level,
            confidence,
            consensus_attempt,
            stalemate,
            repetition,
            force_consensus,
            converged: agreement_level >= self.thresholds.consensus
                && confidence >= self.thresholds.confidence,
        }
    }

    // ==================== History ====================

    /// Every agreement level calculated so far, oldest first
    pub fn agreement_history(&self) -> &[f64] {
        &self.agreement_history
    }

    /// Every consensus bid logged so far, oldest first
    pub fn attempt_log(&self) -> &[ConsensusAttempt] {
        &self.attempt_log
    }

    pub fn summary(&self) -> AnalyzerSummary {
        let recent_agreement = recent(&self.agreement_history, SUMMARY_HISTORY_LEN).to_vec();
        let average_agreement = if recent_agreement.is_empty() {
            0.0
        } else {
            recent_agreement.iter().sum::<f64>() / recent_agreement.len() as f64
        };
        AnalyzerSummary {
            recent_agreement,
            average_agreement,
            consensus_attempts: self.attempt_log.len(),
            last_consensus_attempt: self.attempt_log.last().cloned(),
        }
    }
}

fn recent<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

fn message_agreement(content: &str) -> f64 {
    let lowered = content.to_lowercase();
    let positive = count_hits(&lowered, POSITIVE_WORDS) as f64;
    let negative = count_hits(&lowered, NEGATIVE_WORDS) as f64;
    let neutral = count_hits(&lowered, NEUTRAL_WORDS) as f64;

    let total = positive + negative + neutral;
    if total == 0.0 {
        return 0.5;
    }
    (positive + neutral * 0.5) / total
}

fn confidence_from(agreement: f64, batch: &[BatchMessage]) -> f64 {
    let markers = recent(batch, RECENT_WINDOW)
        .iter()
        .filter(|m| contains_any(&m.content.to_lowercase(), CONSENSUS_MARKERS))
        .count();
    (AGREEMENT_WEIGHT * agreement + MARKER_CONFIDENCE_WEIGHT * markers as f64 / RECENT_WINDOW as f64)
        .min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(texts: &[&str]) -> Vec<BatchMessage> {
        texts.iter().map(|t| BatchMessage::new(*t)).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ==================== detect_consensus_attempt Tests ====================

    #[test]
    fn test_attempt_needs_three_messages() {
        let mut analyzer = ConsensusAnalyzer::new();
        assert!(!analyzer.detect_consensus_attempt(&batch(&["consensus reached", "final decision"])));
        assert!(analyzer.attempt_log().is_empty());
    }

    #[test]
    fn test_attempt_detected_and_logged() {
        let mut analyzer = ConsensusAnalyzer::new();
        let messages = batch(&[
            "warming up",
            "I agree, consensus reached on the layout",
            "Final decision: exactly that",
            "ok",
        ]);
        // last three: 1.5 + 1.5 + 0.0
        assert!(analyzer.detect_consensus_attempt(&messages));

        let attempt = &analyzer.attempt_log()[0];
        assert_eq!(attempt.message_count, 4);
        assert!(approx(attempt.confidence, 1.0));
    }

    #[test]
    fn test_agreement_patterns_alone_are_not_enough() {
        let mut analyzer = ConsensusAnalyzer::new();
        let messages = batch(&["I agree", "good point", "makes sense"]);
        // 0.5 * 3 = 1.5
        assert!(!analyzer.detect_consensus_attempt(&messages));
    }

    // ==================== calculate_agreement_level Tests ====================

    #[test]
    fn test_agreement_empty_batch() {
        let mut analyzer = ConsensusAnalyzer::new();
        assert_eq!(analyzer.calculate_agreement_level(&[]), 0.0);
        assert!(analyzer.agreement_history().is_empty());
    }

    #[test]
    fn test_agreement_uninformative_message_is_half() {
        let mut analyzer = ConsensusAnalyzer::new();
        assert_eq!(analyzer.calculate_agreement_level(&batch(&["the sky"])), 0.5);
    }

    #[test]
    fn test_agreement_weighted_score() {
        let mut analyzer = ConsensusAnalyzer::new();
        // "support" positive, "perhaps" neutral: (1 + 0.5) / 2
        assert!(approx(
            analyzer.calculate_agreement_level(&batch(&["I support it, perhaps"])),
            0.75
        ));
        // "wrong" negative only
        assert_eq!(analyzer.calculate_agreement_level(&batch(&["wrong"])), 0.0);
        assert_eq!(analyzer.agreement_history().len(), 2);
    }

    #[test]
    fn test_agreement_mean_over_batch() {
        let mut analyzer = ConsensusAnalyzer::new();
        let level = analyzer.calculate_agreement_level(&batch(&["excellent", "wrong", "the sky"]));
        assert!(approx(level, 0.5));
    }

    #[test]
    fn test_agreement_always_in_unit_interval() {
        let mut analyzer = ConsensusAnalyzer::new();
        let samples = [
            "",
            "yes yes yes",
            "no no",
            "maybe perhaps consider",
            "I disagree, not sure, worried, against",
            "sounds good, works for me, I'm on board",
            "{\"app\": null}",
        ];
        for i in 0..samples.len() {
            let level = analyzer.calculate_agreement_level(&batch(&samples[..=i]));
            assert!((0.0..=1.0).contains(&level), "level {level} out of range");
        }
    }

    #[test]
    fn test_on_board_is_not_an_indicator() {
        let mut analyzer = ConsensusAnalyzer::new();
        let level = analyzer.calculate_agreement_level(&batch(&["I'm on board"]));
        assert!(approx(level, 0.5));
    }

    // ==================== get_confidence Tests ====================

    #[test]
    fn test_confidence_blends_markers() {
        let mut analyzer = ConsensusAnalyzer::new();
        let messages = batch(&["the sky", "the sea", "consensus achieved"]);
        // "consensus" is a positive word, so the third message scores 1.0
        let agreement = (0.5 + 0.5 + 1.0) / 3.0;
        let expected = 0.7 * agreement + 0.3 * (1.0 / 3.0);
        assert!(approx(analyzer.get_confidence(&messages), expected));
    }

    #[test]
    fn test_confidence_capped() {
        let mut analyzer = ConsensusAnalyzer::new();
        let messages = batch(&[
            "yes, consensus reached",
            "yes, final decision",
            "yes, we have consensus",
        ]);
        let confidence = analyzer.get_confidence(&messages);
        assert!(confidence <= 1.0);
        assert!(approx(confidence, 1.0));
    }

    // ==================== detect_stalemate Tests ====================

    #[test]
    fn test_stalemate_needs_five_messages() {
        let analyzer = ConsensusAnalyzer::new();
        assert!(!analyzer.detect_stalemate(&batch(&["stuck", "deadlock", "impasse", "x"]), 0.0));
    }

    #[test]
    fn test_stalemate_low_agreement_long_batch() {
        let mut analyzer = ConsensusAnalyzer::new();
        let messages = batch(&[
            "We cannot agree",
            "This is not working",
            "We're stuck",
            "That is wrong",
            "Another problem",
            "Big concern here",
            "I oppose this",
            "Still an issue",
            "Bad idea",
            "No",
            "Wrong again",
        ]);
        let level = analyzer.calculate_agreement_level(&messages);
        assert!(level < 0.3);
        assert!(analyzer.detect_stalemate(&messages, level));
    }

    #[test]
    fn test_low_agreement_short_batch_needs_phrases() {
        let analyzer = ConsensusAnalyzer::new();
        let messages = batch(&["a", "b", "c", "d", "e"]);
        assert!(!analyzer.detect_stalemate(&messages, 0.0));
        let stalled = batch(&["a", "b", "deadlock", "d", "going in circles"]);
        assert!(analyzer.detect_stalemate(&stalled, 0.9));
    }

    // ==================== should_force_consensus Tests ====================

    #[test]
    fn test_force_after_round_limit() {
        let mut analyzer = ConsensusAnalyzer::new();
        assert!(analyzer.should_force_consensus(&[], 15));
        assert!(!analyzer.should_force_consensus(&[], 14));
    }

    #[test]
    fn test_force_on_repetition() {
        let mut analyzer = ConsensusAnalyzer::new();
        let messages = batch(&["add a search bar", "add a search bar", "add a search bar"]);
        assert!(analyzer.detect_repetition(&messages));
        assert!(analyzer.should_force_consensus(&messages, 3));
    }

    #[test]
    fn test_force_after_logged_attempts() {
        let mut analyzer = ConsensusAnalyzer::new();
        let messages = batch(&[
            "I agree, consensus reached",
            "We agree, final decision made",
            "kick off",
        ]);
        for _ in 0..3 {
            assert!(analyzer.detect_consensus_attempt(&messages));
        }
        assert!(analyzer.should_force_consensus(&messages, 1));
    }

    #[test]
    fn test_no_force_for_healthy_discussion() {
        let mut analyzer = ConsensusAnalyzer::new();
        let messages = batch(&["add login", "use tabs for navigation", "dark mode later"]);
        assert!(!analyzer.should_force_consensus(&messages, 3));
    }

    // ==================== assess / summary Tests ====================

    #[test]
    fn test_assess_appends_single_history_entry() {
        let mut analyzer = ConsensusAnalyzer::new();
        let messages = batch(&["yes, I agree", "excellent, consensus reached", "works for me"]);
        let assessment = analyzer.assess(&messages, 3);

        assert_eq!(analyzer.agreement_history().len(), 1);
        assert!(assessment.agreement_level >= 0.7);
        assert!(assessment.converged);
        assert!(!assessment.force_consensus);
    }

    #[test]
    fn test_summary_empty() {
        let analyzer = ConsensusAnalyzer::new();
        let summary = analyzer.summary();
        assert!(summary.recent_agreement.is_empty());
        assert_eq!(summary.average_agreement, 0.0);
        assert_eq!(summary.consensus_attempts, 0);
        assert!(summary.last_consensus_attempt.is_none());
    }

    #[test]
    fn test_summary_keeps_last_five() {
        let mut analyzer = ConsensusAnalyzer::new();
        for text in ["wrong", "wrong", "yes", "yes", "yes", "yes", "yes"] {
            analyzer.calculate_agreement_level(&batch(&[text]));
        }
        let summary = analyzer.summary();
        assert_eq!(summary.recent_agreement, vec![1.0; 5]);
        assert_eq!(summary.average_agreement, 1.0);
    }
}
