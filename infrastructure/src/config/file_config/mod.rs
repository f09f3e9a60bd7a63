//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod conversation;
mod extraction;
mod logging;
mod validation;

pub use conversation::FileConversationConfig;
pub use extraction::FileExtractionConfig;
pub use logging::FileLoggingConfig;
pub use validation::FileValidationConfig;

use super::issue::{ConfigIssue, ConfigIssueCode, Severity};
use concord_application::SessionParams;
use concord_domain::DetectionThresholds;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Conversation limits
    pub conversation: FileConversationConfig,
    /// Heuristic cutoffs (uses domain type)
    pub thresholds: DetectionThresholds,
    /// Extraction limits
    pub extraction: FileExtractionConfig,
    /// Primary schema selection
    pub validation: FileValidationConfig,
    /// Structured event log
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks:
    /// 1. Ratios outside `[0, 1]`
    /// 2. Zero limits (round ceiling, attempt limit, regex cap)
    /// 3. A force threshold the round ceiling never reaches
    /// 4. A configured schema file that does not exist
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let thresholds = &self.thresholds;

        // 1. Ratios
        for (field, value) in [
            ("thresholds.low_agreement", thresholds.low_agreement),
            (
                "thresholds.repetition_similarity",
                thresholds.repetition_similarity,
            ),
            ("thresholds.consensus", thresholds.consensus),
            ("thresholds.confidence", thresholds.confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                issues.push(ConfigIssue {
                    severity: Severity::Error,
                    code: ConfigIssueCode::OutOfRange {
                        field: field.to_string(),
                        value,
                    },
                    message: format!("{field}: {value} is outside the range 0.0 to 1.0"),
                });
            }
        }

        // 2. Zero limits
        if self.conversation.max_rounds == 0 {
            issues.push(zero_limit(
                Severity::Error,
                "conversation.max_rounds",
                "conversation.max_rounds: must be at least 1",
            ));
        }
        if thresholds.max_consensus_attempts == 0 {
            issues.push(zero_limit(
                Severity::Error,
                "thresholds.max_consensus_attempts",
                "thresholds.max_consensus_attempts: 0 would end every conversation after its first message",
            ));
        }
        if self.extraction.max_regex_input_bytes == 0 {
            issues.push(zero_limit(
                Severity::Warning,
                "extraction.max_regex_input_bytes",
                "extraction.max_regex_input_bytes: 0 disables the regex fallback",
            ));
        }

        // 3. Force threshold
        if thresholds.force_after_rounds >= self.conversation.max_rounds
            && self.conversation.max_rounds > 0
        {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::UnreachableForce {
                    force_after_rounds: thresholds.force_after_rounds,
                    max_rounds: self.conversation.max_rounds,
                },
                message: format!(
                    "thresholds.force_after_rounds ({}) is not below conversation.max_rounds ({}); \
                     the round ceiling ends conversations first",
                    thresholds.force_after_rounds, self.conversation.max_rounds
                ),
            });
        }

        // 4. Schema file
        if let Some(path) = &self.validation.schema_path
            && !path.exists()
        {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::MissingFile {
                    field: "validation.schema_path".to_string(),
                    path: path.display().to_string(),
                },
                message: format!(
                    "validation.schema_path: {} not found, the built-in schema will be used",
                    path.display()
                ),
            });
        }

        issues
    }

    /// Apply a command-line round ceiling so it goes through [`Self::validate`]
    pub fn with_max_rounds_override(mut self, max_rounds: Option<usize>) -> Self {
        if let Some(max_rounds) = max_rounds {
            self.conversation.max_rounds = max_rounds;
        }
        self
    }

    /// Session parameters for the application layer
    pub fn session_params(&self) -> SessionParams {
        SessionParams::default()
            .with_max_rounds(self.conversation.max_rounds)
            .with_thresholds(self.thresholds)
            .with_max_regex_input_bytes(self.extraction.max_regex_input_bytes)
    }
}

fn zero_limit(severity: Severity, field: &str, message: &str) -> ConfigIssue {
    ConfigIssue {
        severity,
        code: ConfigIssueCode::ZeroLimit {
            field: field.to_string(),
        },
        message: message.to_string(),
    }
}
