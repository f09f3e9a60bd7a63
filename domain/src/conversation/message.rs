//! Conversation message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message appended to a tracked conversation.
///
/// Immutable once recorded. `round` is the 1-based position of the message
/// in its conversation at insertion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub round: usize,
}

impl MessageRecord {
    pub(crate) fn new(content: impl Into<String>, author: Option<String>, round: usize) -> Self {
        Self {
            content: content.into(),
            author,
            timestamp: Utc::now(),
            round,
        }
    }
}

/// A message as handed to batch analysis: content plus an optional author.
///
/// Batches may come from anywhere (live sessions, replayed transcripts), so
/// no round or timestamp is assumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMessage {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl BatchMessage {
    /// Message without an author
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: None,
        }
    }

    /// Message attributed to `author`
    pub fn from_author(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: Some(author.into()),
        }
    }
}

impl From<&MessageRecord> for BatchMessage {
    fn from(record: &MessageRecord) -> Self {
        Self {
            content: record.content.clone(),
            author: record.author.clone(),
        }
    }
}

impl From<&str> for BatchMessage {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}
