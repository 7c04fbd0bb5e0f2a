//! In-memory voice engine for dispatcher and board tests.

use anyhow::{anyhow, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{SpeechSignal, Utterance, Voice, VoiceEngine};

#[derive(Default)]
pub(crate) struct FakeVoiceEngine {
    voices: Vec<Voice>,
    fail_speak: bool,
    spoken: Arc<Mutex<Vec<Utterance>>>,
    signals: Arc<Mutex<VecDeque<SpeechSignal>>>,
    voice_queries: Arc<Mutex<usize>>,
}

impl FakeVoiceEngine {
    pub(crate) fn with_voices(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            ..Self::default()
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail_speak: true,
            ..Self::default()
        }
    }

    /// Every utterance submitted so far.
    pub(crate) fn spoken(&self) -> Arc<Mutex<Vec<Utterance>>> {
        self.spoken.clone()
    }

    /// Queue that tests push engine notifications into.
    pub(crate) fn signals(&self) -> Arc<Mutex<VecDeque<SpeechSignal>>> {
        self.signals.clone()
    }

    pub(crate) fn voice_queries(&self) -> Arc<Mutex<usize>> {
        self.voice_queries.clone()
    }
}

impl VoiceEngine for FakeVoiceEngine {
    fn voices(&self) -> Result<Vec<Voice>> {
        *self.voice_queries.lock().unwrap() += 1;
        Ok(self.voices.clone())
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        if self.fail_speak {
            return Err(anyhow!("voice engine `fake` is unavailable"));
        }
        self.spoken.lock().unwrap().push(utterance.clone());
        Ok(())
    }

    fn try_signal(&mut self) -> Option<SpeechSignal> {
        self.signals.lock().unwrap().pop_front()
    }

    fn wait_signal(&mut self, _timeout: Duration) -> Option<SpeechSignal> {
        self.try_signal()
    }
}
