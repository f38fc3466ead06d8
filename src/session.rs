use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::backend::MovieRecord;
use crate::scoring::ScoreResult;

/// The last listing shown to the user, keyed by position.
///
/// `open 3` and `details 3` resolve their index against this file instead
/// of refetching, so the list a user acts on is exactly the list they saw.
/// This is the explicit, view-layer-owned replacement for keeping every
/// loaded movie in a global in-memory list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub entries: Vec<SessionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEntry {
    pub tmdb_id: Option<u64>,
    pub title: String,
    pub year: Option<String>,
    pub score: Option<u32>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            version: 1,
            saved_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    /// Snapshot a scored listing in display order.
    pub fn from_results(results: &[(MovieRecord, ScoreResult)]) -> Self {
        Self {
            version: 1,
            saved_at: Utc::now(),
            entries: results
                .iter()
                .map(|(record, result)| SessionEntry {
                    tmdb_id: record.tmdb_id,
                    title: record.title.clone(),
                    year: record.year.clone(),
                    score: result.score,
                })
                .collect(),
        }
    }

    /// Look up an entry by its 1-based display index.
    pub fn get(&self, index: usize) -> Option<&SessionEntry> {
        if index == 0 {
            return None;
        }
        self.entries.get(index - 1)
    }
}

/// Get the default session file path (~/.config/movie-oracle/last_results.json)
pub fn get_session_path() -> PathBuf {
    crate::config::get_config_dir().join("last_results.json")
}

/// Load the last listing from disk.
///
/// If the file doesn't exist, returns an empty state (the caller reports
/// "no previous results" on index lookup). An unsupported version is an
/// error.
pub fn load_session(path: &Path) -> Result<SessionState> {
    if !path.exists() {
        return Ok(SessionState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open session file at {}", path.display()))?;

    let state: SessionState =
        serde_json::from_reader(file).context("Failed to load session state")?;

    if state.version != 1 {
        anyhow::bail!("Unsupported session file version: {}", state.version);
    }

    Ok(state)
}

/// Save the listing atomically so an interrupted write never leaves a
/// corrupt file behind.
pub fn save_session(path: &Path, state: &SessionState) -> Result<()> {
    crate::config::ensure_config_dir()?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize session state")?;

    file.commit().context("Failed to save session state")?;

    Ok(())
}
