//! Replay Transcript use case.
//!
//! Feeds a recorded conversation through a fresh [`ConsensusSession`] until
//! the session asks to stop or the transcript runs out, then finalizes.

use crate::config::SessionParams;
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::use_cases::consensus_session::{ConsensusSession, SessionOutcome};
use concord_domain::ShapeValidator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while replaying a transcript.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Transcript contains no messages")]
    EmptyTranscript,
}

/// One recorded message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub content: String,
}

impl TranscriptEntry {
    pub fn new(author: Option<&str>, content: impl Into<String>) -> Self {
        Self {
            author: author.map(str::to_string),
            content: content.into(),
        }
    }
}

/// Input for the [`ReplayTranscriptUseCase`].
#[derive(Debug, Clone)]
pub struct ReplayTranscriptInput {
    pub entries: Vec<TranscriptEntry>,
    pub params: SessionParams,
}

impl ReplayTranscriptInput {
    pub fn new(entries: Vec<TranscriptEntry>, params: SessionParams) -> Self {
        Self { entries, params }
    }
}

/// Output of the [`ReplayTranscriptUseCase`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayTranscriptOutput {
    /// Messages fed to the session before it stopped
    pub replayed: usize,
    /// Messages in the transcript
    pub total: usize,
    pub outcome: SessionOutcome,
}

/// Use case for replaying a recorded conversation.
#[derive(Clone)]
pub struct ReplayTranscriptUseCase {
    validator: Arc<ShapeValidator>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl Default for ReplayTranscriptUseCase {
    fn default() -> Self {
        Self::new(Arc::new(ShapeValidator::new()))
    }
}

impl ReplayTranscriptUseCase {
    pub fn new(validator: Arc<ShapeValidator>) -> Self {
        Self {
            validator,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn execute(
        &self,
        input: ReplayTranscriptInput,
    ) -> Result<ReplayTranscriptOutput, SessionError> {
        if input.entries.is_empty() {
            return Err(SessionError::EmptyTranscript);
        }

        let total = input.entries.len();
        info!("Replaying transcript of {} messages", total);

        let mut session = ConsensusSession::with_validator(input.params, self.validator.clone())
            .with_conversation_logger(self.conversation_logger.clone());

        let mut replayed = 0;
        for entry in &input.entries {
            replayed += 1;
            let report = session.observe(&entry.content, entry.author.as_deref());
            if report.should_stop() {
                break;
            }
        }

        if replayed < total {
            info!("Stopped after {} of {} messages", replayed, total);
        }

        Ok(ReplayTranscriptOutput {
            replayed,
            total,
            outcome: session.finalize(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::consensus_session::tests::RecordingLogger;
    use concord_domain::{ExtractionStrategy, TerminationReason};

    fn entries(items: &[(&str, &str)]) -> Vec<TranscriptEntry> {
        items
            .iter()
            .map(|(author, content)| TranscriptEntry::new(Some(author), *content))
            .collect()
    }

    #[test]
    fn test_empty_transcript_is_error() {
        let result = ReplayTranscriptUseCase::default()
            .execute(ReplayTranscriptInput::new(vec![], SessionParams::default()));
        assert_eq!(result.unwrap_err(), SessionError::EmptyTranscript);
    }

    #[test]
    fn test_replay_stops_at_consensus() {
        let transcript = entries(&[
            ("pm", "We need a simple budgeting app"),
            ("designer", "Agreed, one overview screen and one entry form"),
            (
                "pm",
                r#"consensus_reached ```json
{"app": {"name": "Budget", "description": "Track spending", "screens": [{"id": "overview"}]}}
```"#,
            ),
            ("designer", "Ignored after termination"),
        ]);
        let output = ReplayTranscriptUseCase::default()
            .execute(ReplayTranscriptInput::new(transcript, SessionParams::default()))
            .unwrap();

        assert_eq!(output.replayed, 3);
        assert_eq!(output.total, 4);
        assert_eq!(
            output.outcome.termination,
            Some(TerminationReason::ConsensusReached)
        );
        assert_eq!(output.outcome.strategy, Some(ExtractionStrategy::FencedBlock));
        assert!(output.outcome.is_success());
    }

    #[test]
    fn test_replay_exhausts_transcript() {
        let transcript = entries(&[
            ("a", "What about a map view?"),
            ("b", "Maybe, we could explore a list first"),
        ]);
        let output = ReplayTranscriptUseCase::default()
            .execute(ReplayTranscriptInput::new(transcript, SessionParams::default()))
            .unwrap();

        assert_eq!(output.replayed, 2);
        assert!(output.outcome.termination.is_none());
        assert!(output.outcome.document.is_none());
        assert!(!output.outcome.is_success());
    }

    #[test]
    fn test_replay_logs_events() {
        let logger = Arc::new(RecordingLogger::default());
        let use_case = ReplayTranscriptUseCase::default().with_conversation_logger(logger.clone());
        let transcript = vec![TranscriptEntry::new(None, "Just one thought")];
        use_case
            .execute(ReplayTranscriptInput::new(transcript, SessionParams::default()))
            .unwrap();

        assert_eq!(logger.types(), vec!["message_observed", "extraction"]);
    }

    #[test]
    fn test_entry_deserializes_without_author() {
        let entry: TranscriptEntry = serde_json::from_str(r#"{"content": "hi"}"#).unwrap();
        assert_eq!(entry, TranscriptEntry::new(None, "hi"));
    }
}
