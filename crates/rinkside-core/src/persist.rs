//! Local persistence of the game state.
//!
//! The host saves a [`PersistedState`] after every committed change and
//! loads it once at startup. Storage sits behind [`StateStore`] so tests
//! and embedders can swap the backend.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rinkside_types::PersistedState;
use tracing::debug;

/// Storage key of the saved document (also the default file stem).
pub const STORAGE_KEY: &str = "hockey-scoreboard-storage";

/// Errors that can occur while saving or loading state.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Reading or writing the backing file failed.
    #[error("state file I/O error at {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The saved document is not valid state JSON.
    #[error("saved state is corrupt: {source}")]
    Corrupt {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// A previous writer panicked while holding the store lock.
    #[error("state store lock poisoned")]
    Poisoned,
}

/// Where the persisted game lives.
pub trait StateStore: Send + Sync {
    /// Load the saved state, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<PersistedState>, PersistError>;

    /// Replace the saved state.
    fn save(&self, state: &PersistedState) -> Result<(), PersistError>;

    /// Remove the saved state.
    fn clear(&self) -> Result<(), PersistError>;
}

/// JSON file store. Writes go to a sibling temp file that is then renamed
/// over the target, so a crash never leaves a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store state at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<PersistedState>, PersistError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        let state = serde_json::from_str(&contents)?;
        debug!(path = %self.path.display(), "Loaded saved state");
        Ok(Some(state))
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistError> {
        let json = serde_json::to_vec(state)?;
        let temp = self.temp_path();
        std::fs::write(&temp, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&temp, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        match std::fs::remove_file(&self.path) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(self.io_error(err)),
            _ => Ok(()),
        }
    }
}

/// In-memory store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<Option<PersistedState>>,
}

impl MemoryStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<PersistedState>, PersistError> {
        let guard = self.state.lock().map_err(|_err| PersistError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistError> {
        let mut guard = self.state.lock().map_err(|_err| PersistError::Poisoned)?;
        *guard = Some(state.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        let mut guard = self.state.lock().map_err(|_err| PersistError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rinkside_types::TeamSide;

    use super::*;
    use crate::engine::GameEngine;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "rinkside-{name}-{}-{}.json",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ))
    }

    #[test]
    fn missing_file_loads_as_none() {
        let store = JsonFileStore::new(temp_file("missing"));
        assert!(store.load().unwrap().is_none());
        assert!(store.clear().is_ok());
    }

    #[test]
    fn file_round_trip_is_exact() {
        let path = temp_file("roundtrip");
        let store = JsonFileStore::new(&path);

        let mut engine = GameEngine::default();
        engine.add_goal(TeamSide::Home);
        engine.add_shot(TeamSide::Away);
        let state = engine.persisted_state();

        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), Some(state));
        assert!(!store.temp_path().exists());

        store.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let path = temp_file("corrupt");
        std::fs::write(&path, "{ nope").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(PersistError::Corrupt { .. })));
        store.clear().unwrap();
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStateStore::new();
        assert!(store.load().unwrap().is_none());
        let state = GameEngine::default().persisted_state();
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), Some(state));
    }
}
