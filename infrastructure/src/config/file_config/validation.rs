//! Validation configuration from TOML (`[validation]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw validation configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileValidationConfig {
    /// JSON Schema used as the primary rule. The built-in schema is used
    /// when unset.
    pub schema_path: Option<PathBuf>,
}
