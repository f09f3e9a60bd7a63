//! Configuration file loading for concord
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MAX_ROUNDS` environment variable
//! 2. `CONCORD_*` environment variables
//! 3. `--config <path>` specified file
//! 4. Project root: `./concord.toml` or `./.concord.toml`
//! 5. Global: `$XDG_CONFIG_HOME/concord/config.toml`
//! 6. Default values

mod file_config;
mod issue;
mod loader;

pub use file_config::{
    FileConfig, FileConversationConfig, FileExtractionConfig, FileLoggingConfig,
    FileValidationConfig,
};
pub use issue::{ConfigIssue, ConfigIssueCode, Severity};
pub use loader::{ConfigError, ConfigLoader};
