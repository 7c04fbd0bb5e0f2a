//! VoxBoard entrypoint: the phrase board UI, plus one-shot commands for
//! scripting (`--say`, `--list-phrases`, `--list-voices`).

use anyhow::{bail, Result};
use clap::Parser;
use std::ffi::OsString;
use std::io::{self, Write};
use std::time::Duration;
use voxboard::config::AppConfig;
use voxboard::phrases;
use voxboard::speech::{CommandVoiceEngine, SpeakOutcome, VoiceEngine};
use voxboard::store::Store;
use voxboard::text::display_safe;
use voxboard::{init_logging, log_debug, log_file_path, ui, Board};

fn main() -> Result<()> {
    let mut stdout = io::stdout();
    run_with_args(std::env::args_os(), &mut stdout)
}

fn run_with_args<I, T>(args: I, out: &mut impl Write) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut config = AppConfig::parse_from(args);
    config.validate()?;
    init_logging(&config);
    log_debug("=== VoxBoard Started ===");
    log_debug(&format!("Log file: {:?}", log_file_path()));

    if config.list_voices {
        return list_voices(&config, out);
    }
    if config.list_phrases {
        return list_phrases(&config, out);
    }
    if let Some(text) = config.say.clone() {
        return say_once(&config, &text, out);
    }

    let mut board = Board::open(&config)?;
    let result = ui::run_app(&mut board);
    log_debug("=== VoxBoard Exited ===");
    result
}

fn list_voices(config: &AppConfig, out: &mut impl Write) -> Result<()> {
    let engine = CommandVoiceEngine::new(&config.tts_cmd)?;
    let voices = engine.voices()?;
    if voices.is_empty() {
        writeln!(out, "No voices reported by {}", engine.program())?;
        return Ok(());
    }
    writeln!(out, "Voices reported by {}:", engine.program())?;
    for voice in voices {
        let marker = if voice
            .lang
            .to_lowercase()
            .contains(&config.lang_marker.to_lowercase())
        {
            "*"
        } else {
            " "
        };
        writeln!(out, "{marker} {:<12} {}", voice.lang, voice.name)?;
    }
    Ok(())
}

fn list_phrases(config: &AppConfig, out: &mut impl Write) -> Result<()> {
    let store = Store::open(config.data_dir())?;
    let phrases = store.load_phrases();
    for phrase in phrases::rank(&phrases) {
        writeln!(
            out,
            "{:>4}  {} {}",
            phrase.count,
            display_safe(&phrase.emoji),
            display_safe(&phrase.text)
        )?;
    }
    Ok(())
}

fn say_once(config: &AppConfig, text: &str, out: &mut impl Write) -> Result<()> {
    let mut board = Board::open(config)?;
    match board.speak(text)? {
        SpeakOutcome::Accepted(spoken) => {
            let timeout = Duration::from_millis(config.say_timeout_ms);
            if !board.wait_for_speech(timeout) {
                log_debug("say: engine still busy at timeout");
                eprintln!(
                    "voxboard: speech did not finish within {} ms",
                    config.say_timeout_ms
                );
            }
            writeln!(out, "{}", display_safe(&spoken))?;
            Ok(())
        }
        SpeakOutcome::Empty => bail!("--say needs non-empty text"),
        SpeakOutcome::Busy => bail!("voice engine is busy"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> Result<String> {
        let mut full = vec!["voxboard"];
        full.extend_from_slice(args);
        let mut out = Vec::new();
        run_with_args(full, &mut out)?;
        Ok(String::from_utf8(out).expect("utf8 output"))
    }

    #[test]
    fn list_phrases_prints_seed_board() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().to_str().expect("utf8 path");
        let printed = run(&["--no-logs", "--list-phrases", "--data-dir", path]).expect("run");
        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines[0].contains("Tengo sed, quiero agua"));
        assert!(lines[0].trim_start().starts_with('0'));
    }

    #[cfg(unix)]
    #[test]
    fn say_updates_board_and_history() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().to_str().expect("utf8 path");
        let printed = run(&[
            "--no-logs",
            "--tts-cmd",
            "true",
            "--data-dir",
            path,
            "--say",
            "  Gracias ",
        ])
        .expect("say");
        assert_eq!(printed.trim(), "Gracias");

        let listed = run(&["--no-logs", "--list-phrases", "--data-dir", path]).expect("list");
        let first = listed.lines().next().expect("first line");
        assert!(first.contains("Gracias"));
        assert!(first.trim_start().starts_with('1'));

        let history = std::fs::read_to_string(dir.path().join("history.json")).expect("history");
        assert!(history.contains("\"Gracias\""));
    }

    #[cfg(unix)]
    #[test]
    fn say_rejects_blank_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().to_str().expect("utf8 path");
        let err = run(&["--no-logs", "--tts-cmd", "true", "--data-dir", path, "--say", "  "])
            .expect_err("blank say");
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn invalid_config_is_reported() {
        let err = run(&["--no-logs", "--lang-marker", "zz", "--list-phrases"])
            .expect_err("invalid marker");
        assert!(err.to_string().contains("--lang-marker"));
    }
}
