//! Conversation configuration from TOML (`[conversation]` section)

use concord_domain::DEFAULT_MAX_ROUNDS;
use serde::{Deserialize, Serialize};

/// Raw conversation configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConversationConfig {
    /// Round ceiling for each conversation
    pub max_rounds: usize,
}

impl Default for FileConversationConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}
