// History persistence module
// Handles mirroring the conversation history to durable storage

use super::message::Message;
use crate::error::PersistenceError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Result of reading the stored history
#[derive(Debug)]
pub enum LoadOutcome {
    /// Nothing has been stored yet (or it was cleared)
    Empty,
    /// The stored records, in insertion order
    Loaded(Vec<Message>),
    /// A stored value exists but could not be parsed
    Malformed(PersistenceError),
}

impl LoadOutcome {
    /// Collapse the outcome into a list, treating malformed data as no history
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            LoadOutcome::Loaded(messages) => messages,
            LoadOutcome::Empty | LoadOutcome::Malformed(_) => Vec::new(),
        }
    }
}

/// Durable storage for the conversation history
///
/// Implementations keep an ordered, append-only list of records that survives
/// across sessions until `clear` is called.
pub trait HistoryStore {
    /// Add a record to the end of the stored list
    fn append(&mut self, message: &Message) -> Result<(), PersistenceError>;

    /// Read every stored record
    fn load_all(&self) -> LoadOutcome;

    /// Remove every stored record
    fn clear(&mut self) -> Result<(), PersistenceError>;
}

/// Decode a stored JSON array; `None` means nothing is stored.
/// Bytes that are not valid UTF-8 count as malformed JSON.
fn decode(raw: Option<&[u8]>) -> LoadOutcome {
    match raw {
        None => LoadOutcome::Empty,
        Some(json) => match serde_json::from_slice::<Vec<Message>>(json) {
            Ok(messages) => LoadOutcome::Loaded(messages),
            Err(e) => LoadOutcome::Malformed(e.into()),
        },
    }
}

/// Read-modify-write: existing records (malformed data counts as none) plus one
fn append_to(raw: Option<&[u8]>, message: &Message) -> Result<String, PersistenceError> {
    let mut messages = decode(raw).into_messages();
    messages.push(message.clone());
    Ok(serde_json::to_string(&messages)?)
}

/// History stored as a JSON array in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by the file at `path`.
    /// The file and its parent directory are created on first append.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<Option<Vec<u8>>, PersistenceError> {
        match fs::read(&self.path) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl HistoryStore for JsonFileStore {
    fn append(&mut self, message: &Message) -> Result<(), PersistenceError> {
        let raw = self.read_raw()?;
        let json = append_to(raw.as_deref(), message)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn load_all(&self) -> LoadOutcome {
        match self.read_raw() {
            Ok(raw) => decode(raw.as_deref()),
            Err(e) => LoadOutcome::Malformed(e),
        }
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// History kept in process memory, encoded exactly like the file store.
/// Useful for tests and for embedding the widget without touching disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    raw: Option<String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `raw` as its stored value
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
        }
    }

    /// The stored value, if any
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl HistoryStore for MemoryStore {
    fn append(&mut self, message: &Message) -> Result<(), PersistenceError> {
        self.raw = Some(append_to(self.raw.as_deref().map(str::as_bytes), message)?);
        Ok(())
    }

    fn load_all(&self) -> LoadOutcome {
        decode(self.raw.as_deref().map(str::as_bytes))
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        self.raw = None;
        Ok(())
    }
}
