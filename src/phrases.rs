//! Phrase records, the built-in seed board, and usage ranking.

use serde::{Deserialize, Serialize};

use crate::text::derive_label;

/// Emoji shown on phrases the user typed as free text.
pub const CUSTOM_PHRASE_EMOJI: &str = "💬";

/// One button on the phrase board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseRecord {
    pub text: String,
    pub emoji: String,
    pub label: String,
    #[serde(default)]
    pub count: u32,
}

impl PhraseRecord {
    pub fn new(text: impl Into<String>, emoji: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emoji: emoji.into(),
            label: label.into(),
            count: 0,
        }
    }

    /// Record created the first time a free-text utterance is spoken.
    pub fn custom(text: &str) -> Self {
        Self {
            text: text.to_string(),
            emoji: CUSTOM_PHRASE_EMOJI.to_string(),
            label: derive_label(text),
            count: 1,
        }
    }
}

/// Seed board used on first run or when stored phrases are unreadable.
pub fn default_phrases() -> Vec<PhraseRecord> {
    [
        ("Tengo sed, quiero agua", "💧", "Agua"),
        ("Tengo dolor, necesito medicina", "💊", "Dolor"),
        ("Quiero ir al baño", "🚽", "Baño"),
        ("¿Dónde está el bebé?", "👶", "Bebé"),
        ("Tengo hambre", "🍎", "Comida"),
        ("Tengo frío", "🥶", "Frío"),
        ("Tengo calor", "🥵", "Calor"),
        ("Te amo mucho", "❤️", "Te amo"),
        ("Gracias", "🙏", "Gracias"),
        ("Por favor", "✨", "Por favor"),
    ]
    .into_iter()
    .map(|(text, emoji, label)| PhraseRecord::new(text, emoji, label))
    .collect()
}

/// Indices into `phrases` ordered by usage count, most used first.
///
/// `sort_by` is stable, so phrases with equal counts keep their stored order
/// and the board does not reshuffle between renders.
pub fn rank_indices(phrases: &[PhraseRecord]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..phrases.len()).collect();
    order.sort_by(|&a, &b| phrases[b].count.cmp(&phrases[a].count));
    order
}

/// Display order of the board.
pub fn rank(phrases: &[PhraseRecord]) -> Vec<&PhraseRecord> {
    rank_indices(phrases)
        .into_iter()
        .map(|idx| &phrases[idx])
        .collect()
}

/// First phrase whose text matches case-insensitively.
pub fn find_index(phrases: &[PhraseRecord], text: &str) -> Option<usize> {
    let needle = text.to_lowercase();
    phrases
        .iter()
        .position(|phrase| phrase.text.to_lowercase() == needle)
}

/// What [`record_usage`] did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageUpdate {
    Incremented { index: usize, count: u32 },
    Added { index: usize },
}

/// Count one spoken use of `text`: bump the first matching record, or append a
/// new custom record when nothing matches.
pub fn record_usage(phrases: &mut Vec<PhraseRecord>, text: &str) -> UsageUpdate {
    match find_index(phrases, text) {
        Some(index) => {
            let phrase = &mut phrases[index];
            phrase.count = phrase.count.saturating_add(1);
            UsageUpdate::Incremented {
                index,
                count: phrase.count,
            }
        }
        None => {
            phrases.push(PhraseRecord::custom(text));
            UsageUpdate::Added {
                index: phrases.len() - 1,
            }
        }
    }
}

/// Remove every phrase whose text equals `text` exactly. Returns how many went.
pub fn remove_exact(phrases: &mut Vec<PhraseRecord>, text: &str) -> usize {
    let before = phrases.len();
    phrases.retain(|phrase| phrase.text != text);
    before - phrases.len()
}
