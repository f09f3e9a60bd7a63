//! Extraction configuration from TOML (`[extraction]` section)

use concord_domain::extraction::DEFAULT_MAX_REGEX_INPUT_BYTES;
use serde::{Deserialize, Serialize};

/// Raw extraction configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExtractionConfig {
    /// Inputs larger than this skip the regex fallback stage
    pub max_regex_input_bytes: usize,
}

impl Default for FileExtractionConfig {
    fn default() -> Self {
        Self {
            max_regex_input_bytes: DEFAULT_MAX_REGEX_INPUT_BYTES,
        }
    }
}
