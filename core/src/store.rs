//! Snapshot persistence.
//!
//! RULE: only store implementations touch the filesystem.
//! The ledger hands them a whole ClubSnapshot; there are no partial writes.
//!
//! The file write is a plain overwrite, not an atomic rename. A crash
//! mid-write can leave a truncated file, which the next load treats as
//! "no prior state".

use crate::{
    error::{LedgerResult, StoreError},
    snapshot::ClubSnapshot,
    state::ClubState,
};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub trait StateStore {
    /// Human-readable location, for logs.
    fn describe(&self) -> String;

    /// Read the persisted snapshot. `Ok(None)` means nothing saved yet.
    fn load(&self) -> LedgerResult<Option<ClubSnapshot>>;

    /// Overwrite the persisted snapshot.
    fn save(&mut self, snapshot: &ClubSnapshot) -> LedgerResult<()>;

    /// Remove the persisted snapshot entirely.
    fn wipe(&mut self) -> LedgerResult<()>;
}

/// Load a ClubState, degrading to an empty one when the store has
/// nothing usable. Failures are logged, never raised.
pub fn load_state(store: &dyn StateStore, century_pivot: u32) -> ClubState {
    match store.load() {
        Ok(Some(snapshot)) => snapshot.into_state(century_pivot),
        Ok(None) => {
            log::info!("No saved state at {}; starting fresh", store.describe());
            ClubState::new().with_century_pivot(century_pivot)
        }
        Err(e) => {
            log::warn!("Could not load {}: {e}; starting fresh", store.describe());
            ClubState::new().with_century_pivot(century_pivot)
        }
    }
}

/// A JSON file on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl StateStore for JsonFileStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> LedgerResult<Option<ClubSnapshot>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e).into()),
        };
        let snapshot = serde_json::from_str(&content).map_err(StoreError::from)?;
        Ok(Some(snapshot))
    }

    fn save(&mut self, snapshot: &ClubSnapshot) -> LedgerResult<()> {
        let json = serde_json::to_string_pretty(snapshot).map_err(StoreError::from)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        log::debug!("Snapshot saved to {}", self.path.display());
        Ok(())
    }

    fn wipe(&mut self) -> LedgerResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e).into()),
        }
    }
}

/// Keeps the serialized snapshot in memory (used in tests).
#[derive(Debug, Default)]
pub struct MemoryStore {
    json:  Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing JSON document, as if read from disk.
    pub fn with_json(json: impl Into<String>) -> Self {
        Self { json: Some(json.into()), saves: 0 }
    }

    pub fn json(&self) -> Option<&str> {
        self.json.as_deref()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl StateStore for MemoryStore {
    fn describe(&self) -> String {
        "<memory>".to_string()
    }

    fn load(&self) -> LedgerResult<Option<ClubSnapshot>> {
        match &self.json {
            Some(json) => Ok(Some(serde_json::from_str(json).map_err(StoreError::from)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, snapshot: &ClubSnapshot) -> LedgerResult<()> {
        self.json = Some(serde_json::to_string(snapshot).map_err(StoreError::from)?);
        self.saves += 1;
        Ok(())
    }

    fn wipe(&mut self) -> LedgerResult<()> {
        self.json = None;
        Ok(())
    }
}
