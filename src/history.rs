use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// One completed round, as stored in the history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub winner: String,
    pub player_score: u32,
    pub opponent_score: u32,
    pub damage: u32,
}

/// Flat JSON array on disk. The file is opened and closed per call and
/// never held across loop iterations.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        HistoryStore { path: path.into() }
    }

    /// Read the stored rounds. A missing file is an empty history, not an
    /// error; a file that exists but does not parse is.
    pub fn load(&self) -> Result<Vec<RoundRecord>, TrackerError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        let records = serde_json::from_str(&raw)?;
        Ok(records)
    }

    /// Like `load`, but an unreadable or corrupt file degrades to an empty
    /// in-memory history. The error comes back alongside it so the caller
    /// can print one warning and keep going.
    pub fn load_or_empty(&self) -> (Vec<RoundRecord>, Option<TrackerError>) {
        match self.load() {
            Ok(records) => (records, None),
            Err(err) => (Vec::new(), Some(err)),
        }
    }

    /// Rewrite the file with the full history including the newest entry.
    /// The caller keeps its in-memory copy whether or not this succeeds.
    pub fn save(&self, records: &[RoundRecord]) -> Result<(), TrackerError> {
        let raw = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
