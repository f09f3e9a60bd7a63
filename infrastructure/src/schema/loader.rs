//! JSON Schema file loader with built-in fallback

use concord_domain::{SchemaError, SchemaRule};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Reasons a schema file cannot be used
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Compile(#[from] SchemaError),
}

/// Loads the primary schema rule.
///
/// Loading never fails: a missing, unreadable, unparsable, or uncompilable
/// schema is reported with a warning and replaced by the built-in schema.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Load the schema at `path`, or the built-in schema when `path` is `None`.
    pub fn load(path: Option<&Path>) -> SchemaRule {
        let Some(path) = path else {
            debug!("No schema configured, using built-in schema");
            return SchemaRule::builtin();
        };

        match Self::try_load(path) {
            Ok(rule) => {
                debug!("Loaded schema from {}", path.display());
                rule
            }
            Err(e) => {
                warn!(
                    "Could not use schema {}: {}; falling back to built-in schema",
                    path.display(),
                    e
                );
                SchemaRule::builtin()
            }
        }
    }

    /// Load the schema at `path` without falling back.
    pub fn try_load(path: &Path) -> Result<SchemaRule, SchemaLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| SchemaLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let schema: serde_json::Value =
            serde_json::from_str(&content).map_err(|source| SchemaLoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(SchemaRule::from_schema(&schema)?)
    }
}
