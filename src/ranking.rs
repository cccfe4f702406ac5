//! Persisted top-N high score table.
//!
//! Stored as a versioned JSON envelope and rewritten whole on every change
//! through a sibling temp file, so a crash mid-write leaves the previous
//! table in place.

use crate::{debug_log, info_log};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum number of entries kept.
pub const MAX_RANKING_ENTRIES: usize = 5;
pub const DEFAULT_RANKING_PATH: &str = "ranking.bin";
pub const RANKING_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("ranking file {path:?} could not be accessed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("ranking file {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("ranking file {path:?} has unsupported format version {version}")]
    UnsupportedVersion { path: PathBuf, version: u32 },
    #[error("ranking file {path:?} holds {count} entries, more than the table allows")]
    TooManyEntries { path: PathBuf, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub nickname: String,
    pub score: i32,
}

#[derive(Serialize, Deserialize)]
struct RankingFile {
    version: u32,
    entries: Vec<RankingEntry>,
}

pub fn encode_entries(entries: &[RankingEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&RankingFile {
        version: RANKING_FORMAT_VERSION,
        entries: entries.to_vec(),
    })
}

pub fn decode_entries(path: &Path, data: &str) -> Result<Vec<RankingEntry>, RankingError> {
    let file: RankingFile = serde_json::from_str(data).map_err(|source| RankingError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    if file.version != RANKING_FORMAT_VERSION {
        return Err(RankingError::UnsupportedVersion {
            path: path.to_path_buf(),
            version: file.version,
        });
    }
    if file.entries.len() > MAX_RANKING_ENTRIES {
        return Err(RankingError::TooManyEntries {
            path: path.to_path_buf(),
            count: file.entries.len(),
        });
    }
    Ok(file.entries)
}

/// High score table backed by a file.
#[derive(Debug)]
pub struct RankingStore {
    path: PathBuf,
    entries: Vec<RankingEntry>,
}

impl RankingStore {
    /// Loads the table at `path`. A missing file is an empty table; anything
    /// unreadable or malformed is an error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RankingError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(data) => decode_entries(&path, &data)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info_log!("No ranking at {}, starting fresh", path.display());
                Vec::new()
            }
            Err(source) => return Err(RankingError::Io { path, source }),
        };
        info_log!("Loaded {} ranking entries", entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn nickname_exists(&self, nickname: &str) -> bool {
        let wanted = nickname.to_lowercase();
        self.entries
            .iter()
            .any(|entry| entry.nickname.to_lowercase() == wanted)
    }

    /// Records a score and persists the table.
    ///
    /// Returns the 1-based rank achieved, or `None` if the entry did not
    /// survive truncation. The in-memory table is updated even if saving
    /// fails.
    pub fn add_score(&mut self, nickname: &str, score: i32) -> Result<Option<usize>, RankingError> {
        self.entries.push(RankingEntry {
            nickname: nickname.to_string(),
            score,
        });
        let new_index = self.entries.len() - 1;

        // Stable: equal scores keep their insertion order.
        let mut indexed: Vec<(usize, RankingEntry)> = self.entries.drain(..).enumerate().collect();
        indexed.sort_by(|a, b| b.1.score.cmp(&a.1.score));
        let rank = indexed
            .iter()
            .position(|(i, _)| *i == new_index)
            .filter(|&pos| pos < MAX_RANKING_ENTRIES)
            .map(|pos| pos + 1);
        self.entries = indexed
            .into_iter()
            .take(MAX_RANKING_ENTRIES)
            .map(|(_, entry)| entry)
            .collect();

        info_log!("Added {nickname} with {score} points, rank {rank:?}");
        self.save()?;
        Ok(rank)
    }

    /// Writes the whole table to a temp file, then renames it over the target.
    pub fn save(&self) -> Result<(), RankingError> {
        let io_err = |source: io::Error| RankingError::Io {
            path: self.path.clone(),
            source,
        };
        let data = encode_entries(&self.entries).map_err(|e| io_err(io::Error::other(e)))?;

        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, data).map_err(io_err)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(io_err(e));
        }
        debug_log!("Saved ranking to {}", self.path.display());
        Ok(())
    }
}
