//! Single-flight speech dispatch.
//!
//! At most one utterance is in flight. A request that arrives while the engine
//! is still busy is dropped rather than queued. The engine's start/end
//! notifications are explicit [`SpeechSignal`] events applied by the UI loop.

mod engine;
#[cfg(test)]
pub(crate) mod testing;

pub use engine::{parse_voice_list, CommandVoiceEngine, VoiceEngine};

use anyhow::Result;
use std::time::{Duration, Instant};

use crate::log_debug;

pub const DEFAULT_PITCH: f32 = 1.0;
pub const DEFAULT_RATE: f32 = 1.0;
/// Language marker matched against voice tags when none is configured.
pub const DEFAULT_LANG_MARKER: &str = "es";

/// An installed engine voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Identifier passed back to the engine when selecting this voice.
    pub id: String,
    pub name: String,
    /// Language tag such as `es`, `es-419`, or `en-US`.
    pub lang: String,
}

/// One request to the voice engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub pitch: f32,
    pub rate: f32,
    /// `None` means the engine's default voice.
    pub voice: Option<Voice>,
    pub lang_marker: String,
}

/// Lifecycle notifications from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechSignal {
    Started,
    Ended,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechState {
    Idle,
    /// Submitted; the engine has not reported start yet.
    Pending,
    Speaking,
}

/// Result of a [`SpeechDispatcher::speak`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// Submitted; carries the normalized text that was spoken.
    Accepted(String),
    /// Another utterance is still in flight.
    Busy,
    /// Nothing left after trimming.
    Empty,
}

/// First voice whose language tag contains `marker` (case-insensitive).
pub fn select_voice<'a>(voices: &'a [Voice], marker: &str) -> Option<&'a Voice> {
    let marker = marker.to_lowercase();
    voices
        .iter()
        .find(|voice| voice.lang.to_lowercase().contains(&marker))
}

pub struct SpeechDispatcher {
    engine: Box<dyn VoiceEngine>,
    lang_marker: String,
    voices: Option<Vec<Voice>>,
    state: SpeechState,
}

impl SpeechDispatcher {
    pub fn new(engine: Box<dyn VoiceEngine>, lang_marker: &str) -> Self {
        Self {
            engine,
            lang_marker: lang_marker.to_string(),
            voices: None,
            state: SpeechState::Idle,
        }
    }

    pub fn state(&self) -> SpeechState {
        self.state
    }

    /// True while a request is pending or speaking.
    pub fn is_busy(&self) -> bool {
        self.state != SpeechState::Idle
    }

    /// Whether the "speaking" indicator should be lit.
    pub fn indicator_visible(&self) -> bool {
        self.state == SpeechState::Speaking
    }

    /// Engine voices, queried once and cached. An engine that cannot list
    /// voices is treated as having only its default voice.
    pub fn voices(&mut self) -> &[Voice] {
        if self.voices.is_none() {
            let voices = match self.engine.voices() {
                Ok(voices) => voices,
                Err(err) => {
                    log_debug(&format!("tts: voice listing unavailable: {err:#}"));
                    Vec::new()
                }
            };
            self.voices = Some(voices);
        }
        self.voices.as_deref().unwrap_or_default()
    }

    /// Submit `text` unless another utterance is in flight or the text is blank.
    ///
    /// An `Err` means the engine itself could not be started; state stays idle.
    pub fn speak(&mut self, text: &str) -> Result<SpeakOutcome> {
        if self.is_busy() {
            log_debug("tts: speech already in progress; request dropped");
            tracing::debug!(state = ?self.state, "speak rejected: busy");
            return Ok(SpeakOutcome::Busy);
        }
        let text = text.trim();
        if text.is_empty() {
            return Ok(SpeakOutcome::Empty);
        }

        let marker = self.lang_marker.clone();
        let voice = select_voice(self.voices(), &marker).cloned();
        let utterance = Utterance {
            text: text.to_string(),
            pitch: DEFAULT_PITCH,
            rate: DEFAULT_RATE,
            voice,
            lang_marker: marker,
        };
        self.engine.speak(&utterance)?;
        self.state = SpeechState::Pending;
        tracing::info!(
            voice = utterance.voice.as_ref().map(|v| v.id.as_str()).unwrap_or("default"),
            chars = utterance.text.chars().count(),
            "speak accepted"
        );
        Ok(SpeakOutcome::Accepted(utterance.text))
    }

    /// Apply one engine notification. Returns true when visible state changed.
    pub fn apply_signal(&mut self, signal: SpeechSignal) -> bool {
        let next = match &signal {
            SpeechSignal::Started => SpeechState::Speaking,
            SpeechSignal::Ended => SpeechState::Idle,
            SpeechSignal::Failed(reason) => {
                log_debug(&format!("tts: utterance failed: {reason}"));
                SpeechState::Idle
            }
        };
        // A late start for an utterance that already finished must not relight the indicator.
        if signal == SpeechSignal::Started && self.state == SpeechState::Idle {
            return false;
        }
        let changed = next != self.state;
        self.state = next;
        changed
    }

    /// Drain pending engine notifications without blocking.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Some(signal) = self.engine.try_signal() {
            changed |= self.apply_signal(signal);
        }
        changed
    }

    /// Block until the current utterance finishes or `timeout` elapses.
    /// Returns whether the dispatcher is idle afterwards.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_busy() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.engine.wait_signal(remaining) {
                Some(signal) => {
                    self.apply_signal(signal);
                }
                None => break,
            }
        }
        !self.is_busy()
    }
}
