//! JSONL file writer for conversation events.
//!
//! Each [`ConversationEvent`] becomes one JSON line: the payload's fields
//! plus `type`, `seq`, and an RFC 3339 `timestamp`. Lines are appended and
//! flushed one at a time so a crash loses at most the event being written.

use chrono::{DateTime, SecondsFormat, Utc};
use concord_application::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL conversation logger that appends one JSON object per line.
///
/// Thread-safe via `Mutex`. Sequence numbers restart at zero for every
/// logger, so several sessions appended to one file stay distinguishable.
pub struct JsonlConversationLogger {
    state: Mutex<WriterState>,
    path: PathBuf,
}

struct WriterState {
    writer: BufWriter<File>,
    seq: u64,
}

impl JsonlConversationLogger {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            state: Mutex::new(WriterState {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Build the JSON record for one event.
///
/// Object payloads are flattened into the record; anything else is nested
/// under `data`. The reserved keys always win over payload fields.
fn record(event: ConversationEvent, seq: u64, at: DateTime<Utc>) -> Value {
    let mut map = match event.payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert("type".to_string(), Value::from(event.event_type));
    map.insert("seq".to_string(), Value::from(seq));
    map.insert(
        "timestamp".to_string(),
        Value::from(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    Value::Object(map)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let line = record(event, state.seq, Utc::now()).to_string();
        state.seq += 1;

        let written = writeln!(state.writer, "{}", line).and_then(|_| state.writer.flush());
        if let Err(e) = written {
            warn!(
                "Could not write conversation log {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            let _ = state.writer.flush();
        }
    }
}
