//! Consensus session use case.
//!
//! Drives one conversation end to end: messages are observed one at a time,
//! the tracker decides when to stop, and the final message is turned into a
//! validated document.
//!
//! ```text
//! observe() ──► ConversationTracker ──► StepReport { round, termination }
//!                      │
//! finalize() ──► StructuredExtractor ──► ShapeValidator ──► SessionOutcome
//!                      │
//!                ConsensusAnalyzer (second opinion)
//! ```

use crate::config::SessionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger, event_types,
};
use chrono::{DateTime, Utc};
use concord_domain::core::text::truncate;
use concord_domain::{
    ConsensusAnalyzer, ConsensusAssessment, ConversationSummary, ConversationTracker,
    ExtractionStrategy, ShapeValidator, StructuredExtractor, TerminationReason, ValidationResult,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

const LOG_PREVIEW_LEN: usize = 200;

/// Result of observing a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Round number of the observed message (1-based)
    pub round: usize,
    /// Whether the message proposed consensus
    pub consensus_attempt: bool,
    /// Set when the conversation should stop after this message
    pub termination: Option<TerminationReason>,
}

impl StepReport {
    pub fn should_stop(&self) -> bool {
        self.termination.is_some()
    }
}

/// Everything known about a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// First termination reason reported, if the session stopped on its own
    pub termination: Option<TerminationReason>,
    /// Recovered document, if any
    pub document: Option<Value>,
    /// Which extraction stage recovered the document
    pub strategy: Option<ExtractionStrategy>,
    /// Validation of the recovered document
    pub validation: Option<ValidationResult>,
    /// Tracker snapshot at finalization
    pub conversation: ConversationSummary,
    /// Analyzer second opinion at finalization
    pub consensus: ConsensusAssessment,
    pub finished_at: DateTime<Utc>,
}

impl SessionOutcome {
    /// Consensus was reached and the document passed validation
    pub fn is_success(&self) -> bool {
        self.termination.is_some_and(|reason| reason.is_consensus())
            && self.validation.as_ref().is_some_and(|v| v.is_valid)
    }
}

/// One conversation's worth of heuristics.
///
/// Every session owns its own tracker and analyzer, so concurrent sessions
/// never share mutable state. The validator is read-only and may be shared.
pub struct ConsensusSession {
    tracker: ConversationTracker,
    analyzer: ConsensusAnalyzer,
    extractor: StructuredExtractor,
    validator: Arc<ShapeValidator>,
    conversation_logger: Arc<dyn ConversationLogger>,
    termination: Option<TerminationReason>,
}

impl ConsensusSession {
    /// Create a session with the built-in validator.
    pub fn new(params: SessionParams) -> Self {
        Self::with_validator(params, Arc::new(ShapeValidator::new()))
    }

    /// Create a session that validates with `validator`.
    pub fn with_validator(params: SessionParams, validator: Arc<ShapeValidator>) -> Self {
        Self {
            tracker: ConversationTracker::with_thresholds(params.max_rounds, params.thresholds),
            analyzer: ConsensusAnalyzer::with_thresholds(params.thresholds),
            extractor: StructuredExtractor::new()
                .with_max_regex_input_bytes(params.max_regex_input_bytes),
            validator,
            conversation_logger: Arc::new(NoConversationLogger),
            termination: None,
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    // ==================== Observation ====================

    /// Record one message and decide whether the conversation should stop.
    ///
    /// The session's own messages serve as the recent batch for the
    /// terminal-marker check. Observing after termination is allowed; the
    /// first reported reason is kept.
    pub fn observe(&mut self, content: &str, author: Option<&str>) -> StepReport {
        if let Some(reason) = self.termination {
            warn!("Observing message after termination ({})", reason);
        }

        self.tracker.add_message(content, author);
        let round = self.tracker.round_count();
        self.log(
            event_types::MESSAGE_OBSERVED,
            json!({
                "round": round,
                "author": author,
                "content": truncate(content, LOG_PREVIEW_LEN),
            }),
        );

        let consensus_attempt = self.tracker.detect_consensus_attempt();
        if consensus_attempt {
            info!(
                "Round {}: consensus attempt #{}",
                round,
                self.tracker.consensus_attempts()
            );
            self.log(
                event_types::CONSENSUS_ATTEMPT,
                json!({
                    "round": round,
                    "author": author,
                    "attempts": self.tracker.consensus_attempts(),
                }),
            );
        }

        let batch = self.tracker.batch();
        let termination = self.tracker.should_terminate(Some(&batch));
        if let Some(reason) = termination {
            info!("Round {}: terminating ({})", round, reason);
            self.log(
                event_types::TERMINATION,
                json!({ "round": round, "reason": reason }),
            );
            if self.termination.is_none() {
                self.termination = Some(reason);
            }
        } else {
            debug!(
                "Round {}: continuing (agreement {:.2})",
                round,
                self.tracker.agreement_level()
            );
        }

        StepReport {
            round,
            consensus_attempt,
            termination,
        }
    }

    /// Analyzer second opinion over every message observed so far.
    pub fn assessment(&mut self) -> ConsensusAssessment {
        let batch = self.tracker.batch();
        self.analyzer.assess(&batch, self.tracker.round_count())
    }

    // ==================== Finalization ====================

    /// Extract and validate a document from the most recent message.
    pub fn finalize(&mut self) -> SessionOutcome {
        let text = self
            .tracker
            .messages()
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.finalize_with(&text)
    }

    /// Extract and validate a document from `text`.
    pub fn finalize_with(&mut self, text: &str) -> SessionOutcome {
        let extraction = self.extractor.extract(text);
        match &extraction {
            Some(found) => info!("Document recovered via {}", found.strategy),
            None => warn!("No structured document found in final text"),
        }
        self.log(
            event_types::EXTRACTION,
            json!({
                "found": extraction.is_some(),
                "strategy": extraction.as_ref().map(|e| e.strategy),
            }),
        );

        let validation = extraction
            .as_ref()
            .map(|found| self.validator.validate(&found.document));
        if let Some(result) = &validation {
            if result.is_valid {
                info!("Document valid: {}", result.detail);
            } else {
                warn!("Document invalid: {}", result.detail);
            }
            self.log(
                event_types::VALIDATION,
                json!({
                    "is_valid": result.is_valid,
                    "rule": result.rule,
                    "detail": result.detail,
                }),
            );
        }

        let consensus = self.assessment();
        let (document, strategy) = match extraction {
            Some(found) => (Some(found.document), Some(found.strategy)),
            None => (None, None),
        };

        SessionOutcome {
            termination: self.termination,
            document,
            strategy,
            validation,
            conversation: self.tracker.summary(),
            consensus,
            finished_at: Utc::now(),
        }
    }

    // ==================== Accessors ====================

    pub fn termination(&self) -> Option<TerminationReason> {
        self.termination
    }

    pub fn tracker(&self) -> &ConversationTracker {
        &self.tracker
    }

    pub fn analyzer(&self) -> &ConsensusAnalyzer {
        &self.analyzer
    }

    fn log(&self, event_type: &'static str, payload: Value) {
        self.conversation_logger
            .log(ConversationEvent::new(event_type, payload));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    // ==================== Helpers ====================

    #[derive(Default)]
    pub(crate) struct RecordingLogger {
        pub(crate) events: Mutex<Vec<ConversationEvent>>,
    }

    impl RecordingLogger {
        pub(crate) fn types(&self) -> Vec<&'static str> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.event_type)
                .collect()
        }
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    const FINAL_MESSAGE: &str = r#"CONSENSUS REACHED: {"app": {"name": "Todo", "description": "Tasks", "screens": []}}"#;

    fn consensus_transcript() -> Vec<(&'static str, &'static str)> {
        vec![
            ("alice", "I think we should build a todo app with a home screen"),
            ("bob", "I agree, good point. Let's add a settings page too."),
            ("alice", FINAL_MESSAGE),
        ]
    }

    // ==================== Observation Tests ====================

    #[test]
    fn test_consensus_marker_terminates() {
        let mut session = ConsensusSession::new(SessionParams::default());
        let reports: Vec<StepReport> = consensus_transcript()
            .into_iter()
            .map(|(author, content)| session.observe(content, Some(author)))
            .collect();

        assert!(!reports[0].should_stop());
        assert!(!reports[1].should_stop());
        assert_eq!(reports[2].round, 3);
        assert!(reports[2].consensus_attempt);
        assert_eq!(
            reports[2].termination,
            Some(TerminationReason::ConsensusReached)
        );
        assert_eq!(
            session.termination(),
            Some(TerminationReason::ConsensusReached)
        );
    }

    #[test]
    fn test_max_rounds_terminates() {
        let mut session = ConsensusSession::new(SessionParams::default().with_max_rounds(2));
        assert_eq!(session.observe("Start with onboarding", None).termination, None);
        assert_eq!(
            session.observe("Then the dashboard layout", None).termination,
            Some(TerminationReason::MaxRounds)
        );
    }

    #[test]
    fn test_repetition_terminates() {
        let mut session = ConsensusSession::new(SessionParams::default());
        let mut last = None;
        for _ in 0..3 {
            last = Some(session.observe("Use a tab bar for navigation", Some("carol")));
        }
        assert_eq!(
            last.and_then(|r| r.termination),
            Some(TerminationReason::Repetition)
        );
    }

    #[test]
    fn test_first_termination_is_kept() {
        let mut session = ConsensusSession::new(SessionParams::default());
        for _ in 0..3 {
            session.observe("Use a tab bar for navigation", None);
        }
        let late = session.observe("consensus reached: {}", None);
        assert_eq!(late.termination, Some(TerminationReason::ConsensusReached));
        assert_eq!(session.termination(), Some(TerminationReason::Repetition));
    }

    // ==================== Finalization Tests ====================

    #[test]
    fn test_finalize_extracts_and_validates() {
        let mut session = ConsensusSession::new(SessionParams::default());
        for (author, content) in consensus_transcript() {
            session.observe(content, Some(author));
        }
        let outcome = session.finalize();

        assert_eq!(outcome.strategy, Some(ExtractionStrategy::ConsensusMarker));
        assert_eq!(outcome.document.as_ref().unwrap()["app"]["name"], "Todo");
        let validation = outcome.validation.as_ref().unwrap();
        assert!(validation.is_valid);
        assert_eq!(validation.detail, "valid against primary schema");
        assert_eq!(outcome.conversation.round_count, 3);
        assert_eq!(outcome.conversation.participation.get("alice"), Some(&2));
        assert!(outcome.is_success());
    }

    #[test]
    fn test_finalize_with_explicit_text() {
        let mut session = ConsensusSession::new(SessionParams::default());
        session.observe("Let's sketch the screens", Some("dana"));
        let outcome = session.finalize_with("```json\n{\"MVP\": {\"features\": [\"login\"]}}\n```");

        assert_eq!(outcome.strategy, Some(ExtractionStrategy::FencedBlock));
        assert_eq!(
            outcome.validation.map(|v| v.rule),
            Some(Some("mvp".to_string()))
        );
        assert!(outcome.termination.is_none());
    }

    #[test]
    fn test_finalize_without_messages() {
        let mut session = ConsensusSession::new(SessionParams::default());
        let outcome = session.finalize();
        assert!(outcome.document.is_none());
        assert!(outcome.strategy.is_none());
        assert!(outcome.validation.is_none());
        assert_eq!(outcome.conversation.round_count, 0);
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_assessment_tracks_history() {
        let mut session = ConsensusSession::new(SessionParams::default());
        session.observe("Yes, that sounds good", Some("erin"));
        let assessment = session.assessment();
        assert!(assessment.agreement_level > 0.5);
        assert_eq!(session.analyzer().agreement_history().len(), 1);
    }

    // ==================== Logging Tests ====================

    #[test]
    fn test_events_are_logged_in_order() {
        let logger = Arc::new(RecordingLogger::default());
        let mut session = ConsensusSession::new(SessionParams::default())
            .with_conversation_logger(logger.clone());
        for (author, content) in consensus_transcript() {
            session.observe(content, Some(author));
        }
        session.finalize();

        assert_eq!(
            logger.types(),
            vec![
                "message_observed",
                "message_observed",
                "message_observed",
                "consensus_attempt",
                "termination",
                "extraction",
                "validation",
            ]
        );

        let events = logger.events.lock().unwrap();
        assert_eq!(events[4].payload["reason"], "consensus_reached");
        assert_eq!(events[5].payload["strategy"], "consensus_marker");
    }
}
