//! Snapshot persistence.
//!
//! The ledger never touches storage. A [`SnapshotStore`] receives the whole
//! [`GameState`] after each change and hands it back on load.

use crate::ledger::GameState;
use derive_more::{Display, Error};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Where game snapshots live.
pub trait SnapshotStore {
    /// Last saved snapshot, if any.
    fn load(&self) -> Result<Option<GameState>, StoreError>;

    /// Replaces the saved snapshot.
    fn save(&mut self, state: &GameState) -> Result<(), StoreError>;

    /// Forgets the saved snapshot.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Keeps the snapshot in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Option<GameState>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<GameState>, StoreError> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, state: &GameState) -> Result<(), StoreError> {
        self.snapshot = Some(state.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.snapshot = None;
        Ok(())
    }
}

/// Stores the snapshot as pretty-printed JSON in one file.
///
/// A missing file loads as no game. So does a file that does not parse;
/// the corrupt content is left on disk until the next save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Option<GameState>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No saved game");
                return Ok(None);
            }
            Err(e) => return Err(StoreError::new(format!("Failed to read snapshot: {}", e))),
        };

        match serde_json::from_str(&content) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable snapshot");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, state), fields(path = %self.path.display()))]
    fn save(&mut self, state: &GameState) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| StoreError::new(format!("Failed to serialize snapshot: {}", e)))?;
        std::fs::write(&self.path, json)
            .map_err(|e| StoreError::new(format!("Failed to write snapshot: {}", e)))?;
        debug!("Snapshot saved");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn clear(&mut self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::new(format!("Failed to remove snapshot: {}", e))),
        }
    }
}

/// Snapshot storage error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::initialize;
    use crate::types::TeamConfig;

    fn state() -> GameState {
        initialize(vec![TeamConfig::preset(0).unwrap(), TeamConfig::preset(1).unwrap()]).unwrap()
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);
        store.save(&state()).unwrap();
        assert_eq!(store.load().unwrap(), Some(state()));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("game.json"));
        assert_eq!(store.load().unwrap(), None);

        store.save(&state()).unwrap();
        assert_eq!(store.load().unwrap(), Some(state()));

        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(JsonFileStore::new(path).load().unwrap(), None);
    }
}
