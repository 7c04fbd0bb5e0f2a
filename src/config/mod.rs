//! Command-line parsing and validation helpers.

mod defaults;
mod validation;

use clap::Parser;
use std::path::PathBuf;

pub use defaults::{
    DEFAULT_SAY_TIMEOUT_MS, DEFAULT_TTS_CMD, MAX_SAY_TIMEOUT_MS, MIN_SAY_TIMEOUT_MS,
};

use crate::outbound::{default_open_cmd, DEFAULT_CONTACT_MESSAGE, DEFAULT_CONTACT_NUMBER};
use crate::speech::DEFAULT_LANG_MARKER;
use crate::store::default_data_dir;
use crate::theme::Theme;

/// CLI options for the VoxBoard phrase board. Validated values keep spawned
/// commands and stored files predictable.
#[derive(Debug, Parser, Clone)]
#[command(about = "VoxBoard: tap a phrase, hear it spoken", author, version)]
pub struct AppConfig {
    /// Directory holding phrases.json and history.json
    #[arg(long = "data-dir", env = "VOXBOARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Language marker matched against voice language tags
    #[arg(long = "lang-marker", env = "VOXBOARD_LANG", default_value = DEFAULT_LANG_MARKER)]
    pub lang_marker: String,

    /// Text-to-speech command (espeak-ng compatible flags)
    #[arg(long = "tts-cmd", env = "VOXBOARD_TTS_CMD", default_value = DEFAULT_TTS_CMD)]
    pub tts_cmd: String,

    /// Initial color theme
    #[arg(long, value_enum, default_value_t = Theme::Light)]
    pub theme: Theme,

    /// Phone number (digits only, with country code) for the help message link
    #[arg(long = "contact-number", env = "VOXBOARD_CONTACT", default_value = DEFAULT_CONTACT_NUMBER)]
    pub contact_number: String,

    /// Pre-filled text for the help message link
    #[arg(long = "contact-message", default_value = DEFAULT_CONTACT_MESSAGE)]
    pub contact_message: String,

    /// Command used to open the help message link
    #[arg(long = "open-cmd", default_value_t = default_open_cmd())]
    pub open_cmd: String,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "VOXBOARD_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "VOXBOARD_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow spoken phrase text in the debug log
    #[arg(
        long = "log-content",
        env = "VOXBOARD_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,

    /// Print the voices reported by the TTS command and exit
    #[arg(long = "list-voices", default_value_t = false)]
    pub list_voices: bool,

    /// Print the phrase board in display order and exit
    #[arg(long = "list-phrases", default_value_t = false)]
    pub list_phrases: bool,

    /// Speak one phrase without the board UI, then exit
    #[arg(long, value_name = "TEXT")]
    pub say: Option<String>,

    /// How long --say waits for speech to finish (milliseconds)
    #[arg(long = "say-timeout-ms", default_value_t = DEFAULT_SAY_TIMEOUT_MS)]
    pub say_timeout_ms: u64,
}

impl AppConfig {
    /// Effective data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}
