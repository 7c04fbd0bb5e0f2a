//! Board controller: the single owner of phrase, history, and UI toggle state.

use anyhow::Result;
use std::time::Duration;

use crate::config::AppConfig;
use crate::history::{Clock, HistoryEntry, HistoryLog, LocalClock};
use crate::phrases::{self, PhraseRecord, UsageUpdate};
use crate::speech::{CommandVoiceEngine, SpeakOutcome, SpeechDispatcher};
use crate::store::Store;
use crate::suggest;
use crate::theme::Theme;
use crate::{alert, outbound};
use crate::{log_debug, log_debug_content};

/// Maximum characters retained in the input box.
const INPUT_MAX_CHARS: usize = 1_000;

const STATUS_READY: &str = "Listo. Escribe o elige una frase.";

/// Caretaker contact used by the help-message link.
#[derive(Debug, Clone)]
pub struct ContactOptions {
    pub number: String,
    pub message: String,
    pub open_cmd: String,
}

impl ContactOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            number: config.contact_number.clone(),
            message: config.contact_message.clone(),
            open_cmd: config.open_cmd.clone(),
        }
    }
}

pub struct Board {
    phrases: Vec<PhraseRecord>,
    history: HistoryLog,
    store: Store,
    speech: SpeechDispatcher,
    clock: Box<dyn Clock>,
    contact: ContactOptions,
    input: String,
    /// Position in the ranked view, not in `phrases`.
    selected: usize,
    /// Focused chip in the suggestion row, if the user tabbed into it.
    suggestion_focus: Option<usize>,
    /// Set after a suggestion is accepted; the next edit shows the row again.
    suggestions_hidden: bool,
    edit_mode: bool,
    theme: Theme,
    sleeping: bool,
    status: String,
    redraw: bool,
}

impl Board {
    /// Build the board from CLI config: open the store, load state, and wire
    /// the configured TTS command.
    pub fn open(config: &AppConfig) -> Result<Self> {
        let store = Store::open(config.data_dir())?;
        let engine = CommandVoiceEngine::new(&config.tts_cmd)?;
        let speech = SpeechDispatcher::new(Box::new(engine), &config.lang_marker);
        let mut board = Self::with_parts(
            store,
            speech,
            Box::new(LocalClock),
            ContactOptions::from_config(config),
        );
        board.theme = config.theme;
        Ok(board)
    }

    /// Assemble a board from explicit parts. Collections are loaded from `store`.
    pub fn with_parts(
        store: Store,
        speech: SpeechDispatcher,
        clock: Box<dyn Clock>,
        contact: ContactOptions,
    ) -> Self {
        let phrases = store.load_phrases();
        let history = HistoryLog::from_entries(store.load_history());
        log_debug(&format!(
            "board: loaded {} phrases and {} history entries from {}",
            phrases.len(),
            history.len(),
            store.dir().display()
        ));
        Self {
            phrases,
            history,
            store,
            speech,
            clock,
            contact,
            input: String::new(),
            selected: 0,
            suggestion_focus: None,
            suggestions_hidden: false,
            edit_mode: false,
            theme: Theme::default(),
            sleeping: false,
            status: STATUS_READY.to_string(),
            redraw: true,
        }
    }

    pub fn phrases(&self) -> &[PhraseRecord] {
        &self.phrases
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    /// Phrases in display order (most used first).
    pub fn ranked(&self) -> Vec<&PhraseRecord> {
        phrases::rank(&self.phrases)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_phrase(&self) -> Option<&PhraseRecord> {
        phrases::rank_indices(&self.phrases)
            .get(self.selected)
            .map(|&idx| &self.phrases[idx])
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn is_speaking(&self) -> bool {
        self.speech.indicator_visible()
    }

    pub fn status_text(&self) -> &str {
        &self.status
    }

    pub fn suggestion_focus(&self) -> Option<usize> {
        self.suggestion_focus
    }

    /// Suggestion chips for the current input; `None` hides the row.
    pub fn suggestions(&self) -> Option<Vec<&PhraseRecord>> {
        if self.suggestions_hidden {
            return None;
        }
        suggest::filter(&self.phrases, &self.input).filter(|matches| !matches.is_empty())
    }

    fn request_redraw(&mut self) {
        self.redraw = true;
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.request_redraw();
    }

    /// Return and clear the pending redraw flag.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    /// Speak `text`, then count it on the board and log it to history.
    ///
    /// A busy engine or blank text leaves every collection untouched. An `Err`
    /// means the voice engine could not start; the status line says so.
    pub fn speak(&mut self, text: &str) -> Result<SpeakOutcome> {
        let outcome = match self.speech.speak(text) {
            Ok(outcome) => outcome,
            Err(err) => {
                log_debug(&format!("board: voice engine failed: {err:#}"));
                self.set_status(format!("Voz no disponible: {err:#}"));
                return Err(err);
            }
        };
        if let SpeakOutcome::Accepted(spoken) = &outcome {
            log_debug_content(&format!("board: spoke {spoken:?}"));
            self.set_status(format!("Hablando: {spoken}"));
            self.apply_usage(spoken);
            self.record_history(spoken);
        }
        Ok(outcome)
    }

    fn apply_usage(&mut self, spoken: &str) {
        let pinned = phrases::rank_indices(&self.phrases).get(self.selected).copied();
        let update = phrases::record_usage(&mut self.phrases, spoken);
        match update {
            UsageUpdate::Incremented { index, count } => {
                tracing::debug!(index, count, "phrase count incremented");
            }
            UsageUpdate::Added { index } => {
                tracing::debug!(index, "custom phrase added");
            }
        }
        // Re-ranking moves phrases around; keep the cursor on the same record.
        if let Some(pinned) = pinned {
            if let Some(pos) = phrases::rank_indices(&self.phrases)
                .iter()
                .position(|&i| i == pinned)
            {
                self.selected = pos;
            }
        }
        self.persist_phrases();
    }

    fn record_history(&mut self, spoken: &str) {
        if self.history.record(spoken, self.clock.as_ref()) {
            self.persist_history();
        }
    }

    fn persist_phrases(&mut self) {
        if let Err(err) = self.store.save_phrases(&self.phrases) {
            log_debug(&format!("board: failed to save phrases: {err:#}"));
            self.set_status(format!("No se pudo guardar: {err:#}"));
        }
    }

    fn persist_history(&mut self) {
        if let Err(err) = self.store.save_history(self.history.entries()) {
            log_debug(&format!("board: failed to save history: {err:#}"));
            self.set_status(format!("No se pudo guardar: {err:#}"));
        }
    }

    /// Remove every phrase whose text is exactly `text`.
    pub fn delete_phrase(&mut self, text: &str) -> usize {
        let removed = phrases::remove_exact(&mut self.phrases, text);
        self.persist_phrases();
        self.clamp_selection();
        if removed > 0 {
            self.set_status(format!("Frase eliminada: {text}"));
        }
        self.request_redraw();
        removed
    }

    /// Speak the selected phrase, or delete it in edit mode.
    pub fn activate_selected(&mut self) -> Result<()> {
        let Some(text) = self.selected_phrase().map(|p| p.text.clone()) else {
            return Ok(());
        };
        if self.edit_mode {
            self.delete_phrase(&text);
        } else {
            self.speak(&text)?;
        }
        Ok(())
    }

    /// Enter: accept a focused suggestion, else speak typed text, else the selected phrase.
    pub fn submit(&mut self) -> Result<()> {
        if self.suggestion_focus.is_some() {
            return self.accept_suggestion();
        }
        if !self.input.trim().is_empty() {
            let text = self.input.clone();
            self.speak(&text)?;
            return Ok(());
        }
        self.activate_selected()
    }

    /// Copy the focused suggestion into the input box and speak it.
    pub fn accept_suggestion(&mut self) -> Result<()> {
        let Some(focus) = self.suggestion_focus else {
            return Ok(());
        };
        let Some(text) = self
            .suggestions()
            .and_then(|matches| matches.get(focus).map(|p| p.text.clone()))
        else {
            self.suggestion_focus = None;
            return Ok(());
        };
        self.input = text.clone();
        self.suggestion_focus = None;
        self.suggestions_hidden = true;
        self.request_redraw();
        self.speak(&text)?;
        Ok(())
    }

    /// Tab: cycle focus through visible suggestion chips.
    pub fn focus_next_suggestion(&mut self) {
        let count = self.suggestions().map(|m| m.len()).unwrap_or(0);
        let next = match (count, self.suggestion_focus) {
            (0, _) => None,
            (_, None) => Some(0),
            (n, Some(i)) if i + 1 < n => Some(i + 1),
            _ => None,
        };
        self.suggestion_focus = next;
        self.request_redraw();
    }

    pub fn push_input_char(&mut self, ch: char) {
        if self.input.chars().count() >= INPUT_MAX_CHARS || ch.is_control() {
            return;
        }
        self.input.push(ch);
        self.input_edited();
    }

    pub fn backspace_input(&mut self) {
        self.input.pop();
        self.input_edited();
    }

    /// Clear the input box and hide suggestions.
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.input_edited();
    }

    fn input_edited(&mut self) {
        self.suggestion_focus = None;
        self.suggestions_hidden = false;
        self.request_redraw();
    }

    /// Move the board selection by `delta` cells, clamped to the board.
    pub fn move_selection(&mut self, delta: isize) {
        if self.phrases.is_empty() {
            return;
        }
        let last = self.phrases.len() - 1;
        let next = self.selected.saturating_add_signed(delta).min(last);
        self.selected = next;
        self.request_redraw();
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.phrases.len().saturating_sub(1));
    }

    pub fn toggle_edit_mode(&mut self) {
        let next = !self.edit_mode;
        self.edit_mode = next;
        self.set_status(if next {
            "Modo edición: Enter borra la frase seleccionada."
        } else {
            STATUS_READY
        });
    }

    pub fn toggle_theme(&mut self) {
        let next = self.theme.toggled();
        self.theme = next;
        self.request_redraw();
    }

    pub fn enter_sleep(&mut self) {
        self.sleeping = true;
        self.request_redraw();
    }

    pub fn wake(&mut self) {
        self.sleeping = false;
        self.request_redraw();
    }

    /// Speak the most recent history entry again.
    pub fn replay_last(&mut self) -> Result<()> {
        let Some(text) = self.history.head().map(|entry| entry.text.clone()) else {
            return Ok(());
        };
        self.speak(&text)?;
        Ok(())
    }

    /// Empty the history log (edit mode only).
    pub fn clear_history(&mut self) {
        if !self.edit_mode {
            return;
        }
        self.history.clear();
        self.persist_history();
        self.set_status("Historial borrado.".to_string());
    }

    pub fn trigger_alert(&mut self) {
        let status = match alert::play_alert() {
            Ok(()) => "¡Alerta!".to_string(),
            Err(err) => {
                log_debug(&format!("board: alert failed: {err:#}"));
                format!("No se pudo sonar la alerta: {err:#}")
            }
        };
        self.set_status(status);
    }

    /// Open the messaging deep link to the caretaker.
    pub fn open_contact_link(&mut self) {
        let link = outbound::whatsapp_link(&self.contact.number, &self.contact.message);
        let status = match outbound::open_link(&self.contact.open_cmd, &link) {
            Ok(()) => "Mensaje de ayuda abierto.".to_string(),
            Err(err) => {
                log_debug(&format!("board: failed to open link: {err:#}"));
                format!("No se pudo abrir el enlace: {err:#}")
            }
        };
        self.set_status(status);
    }

    /// Drain speech start/end signals. Returns true when the board should redraw.
    pub fn poll_speech(&mut self) -> bool {
        let was_speaking = self.speech.is_busy();
        let changed = self.speech.poll();
        if was_speaking && !self.speech.is_busy() && self.status.starts_with("Hablando") {
            self.set_status(STATUS_READY);
        }
        if changed {
            self.request_redraw();
        }
        changed
    }

    /// Block until the current utterance finishes (headless `--say`).
    pub fn wait_for_speech(&mut self, timeout: Duration) -> bool {
        self.speech.wait_idle(timeout)
    }
}
