//! Spoken-phrase history, newest first.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// One spoken utterance and the local time it was said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    /// Local `HH:MM`; display only.
    pub time: String,
}

/// Source of the `HH:MM` stamp so tests can pin the time.
pub trait Clock {
    fn hh_mm(&self) -> String;
}

/// Wall clock in the device's local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn hh_mm(&self) -> String {
        Local::now().format("%H:%M").to_string()
    }
}

/// Clock that always reports the same time.
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn hh_mm(&self) -> String {
        self.0.clone()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Most recent entry.
    pub fn head(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prepend `text` unless it repeats the current head exactly.
    ///
    /// Only the immediate repeat is dropped; older copies stay in the log.
    /// Returns whether an entry was inserted.
    pub fn record(&mut self, text: &str, clock: &dyn Clock) -> bool {
        if self.head().is_some_and(|head| head.text == text) {
            return false;
        }
        self.entries.insert(
            0,
            HistoryEntry {
                text: text.to_string(),
                time: clock.hh_mm(),
            },
        );
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
