//! Transcript file loading
//!
//! A transcript is a JSON array of `{"author": "...", "content": "..."}`
//! objects; `author` is optional.

use concord_application::TranscriptEntry;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading a transcript file
#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("Could not read transcript {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid transcript {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a transcript from `path`.
pub fn load_transcript(path: &Path) -> Result<Vec<TranscriptEntry>, TranscriptError> {
    let content = std::fs::read_to_string(path).map_err(|source| TranscriptError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| TranscriptError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
