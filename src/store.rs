//! On-device persistence for the phrase board and history.
//!
//! Each collection is a whole JSON array in its own file. Every save replaces
//! the file wholesale, so the last write wins and nothing is merged.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::history::HistoryEntry;
use crate::log_debug;
use crate::phrases::{default_phrases, PhraseRecord};

pub const PHRASES_FILE: &str = "phrases.json";
pub const HISTORY_FILE: &str = "history.json";

/// Platform data directory for the board, e.g. `~/.local/share/voxboard`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(env::temp_dir)
        .join("voxboard")
}

#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open (and create if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn phrases_path(&self) -> PathBuf {
        self.dir.join(PHRASES_FILE)
    }

    pub fn history_path(&self) -> PathBuf {
        self.dir.join(HISTORY_FILE)
    }

    /// Stored phrases, or the seed board when the file is missing or unreadable.
    pub fn load_phrases(&self) -> Vec<PhraseRecord> {
        read_collection(&self.phrases_path()).unwrap_or_else(default_phrases)
    }

    /// Stored history, or an empty log when the file is missing or unreadable.
    pub fn load_history(&self) -> Vec<HistoryEntry> {
        read_collection(&self.history_path()).unwrap_or_default()
    }

    pub fn save_phrases(&self, phrases: &[PhraseRecord]) -> Result<()> {
        write_collection(&self.phrases_path(), phrases)
    }

    pub fn save_history(&self, history: &[HistoryEntry]) -> Result<()> {
        write_collection(&self.history_path(), history)
    }
}

/// `None` for a missing file, unparsable JSON, or a JSON `null`.
fn read_collection<T: DeserializeOwned>(path: &Path) -> Option<Vec<T>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            log_debug(&format!("store: failed to read {}: {err}", path.display()));
            return None;
        }
    };
    match serde_json::from_str::<Option<Vec<T>>>(&raw) {
        Ok(items) => items,
        Err(err) => {
            log_debug(&format!(
                "store: ignoring corrupt {} ({err}); using defaults",
                path.display()
            ));
            None
        }
    }
}

fn write_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(items).context("failed to serialize collection")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("failed to replace {}", path.display()))?;
    tracing::debug!(path = %path.display(), items = items.len(), "collection saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(text: &str, time: &str) -> HistoryEntry {
        HistoryEntry {
            text: text.into(),
            time: time.into(),
        }
    }

    #[test]
    fn empty_directory_loads_defaults() {
        let dir = tempdir().expect("tempdir");
        let store = Store::open(dir.path()).expect("open store");
        assert_eq!(store.load_phrases(), default_phrases());
        assert!(store.load_history().is_empty());
    }

    #[test]
    fn open_creates_nested_directory() {
        let dir = tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        let store = Store::open(&nested).expect("open store");
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }

    #[test]
    fn phrases_round_trip_preserves_order_and_fields() {
        let dir = tempdir().expect("tempdir");
        let store = Store::open(dir.path()).expect("open store");
        let mut phrases = default_phrases();
        phrases[3].count = 7;
        phrases.push(PhraseRecord::custom("Hola mundo"));
        store.save_phrases(&phrases).expect("save");
        assert_eq!(store.load_phrases(), phrases);
    }

    #[test]
    fn history_round_trip_preserves_order() {
        let dir = tempdir().expect("tempdir");
        let store = Store::open(dir.path()).expect("open store");
        let history = vec![entry("Gracias", "10:01"), entry("Hola", "10:00")];
        store.save_history(&history).expect("save");
        assert_eq!(store.load_history(), history);
    }

    #[test]
    fn save_replaces_whole_collection() {
        let dir = tempdir().expect("tempdir");
        let store = Store::open(dir.path()).expect("open store");
        store.save_phrases(&default_phrases()).expect("save");
        let single = vec![PhraseRecord::custom("Solo esto")];
        store.save_phrases(&single).expect("save");
        assert_eq!(store.load_phrases(), single);
        assert!(!dir.path().join("phrases.json.tmp").exists());
    }

    #[test]
    fn empty_phrase_list_is_kept_not_reseeded() {
        let dir = tempdir().expect("tempdir");
        let store = Store::open(dir.path()).expect("open store");
        store.save_phrases(&[]).expect("save");
        assert!(store.load_phrases().is_empty());
    }

    #[test]
    fn corrupt_or_null_files_fall_back() {
        let dir = tempdir().expect("tempdir");
        let store = Store::open(dir.path()).expect("open store");
        fs::write(store.phrases_path(), "{not json").expect("write");
        fs::write(store.history_path(), "null").expect("write");
        assert_eq!(store.load_phrases(), default_phrases());
        assert!(store.load_history().is_empty());
    }

    #[test]
    fn collections_use_independent_files() {
        let dir = tempdir().expect("tempdir");
        let store = Store::open(dir.path()).expect("open store");
        store
            .save_history(&[entry("Hola", "07:30")])
            .expect("save history");
        assert!(store.history_path().exists());
        assert!(!store.phrases_path().exists());
        assert_eq!(store.load_phrases(), default_phrases());
    }
}
