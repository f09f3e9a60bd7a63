//! Infrastructure layer for concord
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration, schema, and transcript
//! file loading.

pub mod config;
pub mod logging;
pub mod schema;
pub mod transcript;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigIssue, ConfigIssueCode, ConfigLoader, FileConfig, FileConversationConfig,
    FileExtractionConfig, FileLoggingConfig, FileValidationConfig, Severity,
};
pub use logging::JsonlConversationLogger;
pub use schema::{SchemaLoadError, SchemaLoader};
pub use transcript::{TranscriptError, load_transcript};
