//! Platform voice engines.
//!
//! The default engine drives an espeak-ng compatible command line. Each
//! utterance runs as a child process; a small worker thread reports when it
//! starts and when it exits.

use anyhow::{anyhow, bail, Context, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use super::{SpeechSignal, Utterance, Voice};
use crate::{log_debug, log_debug_content};

/// espeak-ng's default pitch (0-99) corresponds to a pitch multiplier of 1.0.
const ESPEAK_BASE_PITCH: f32 = 50.0;
/// espeak-ng's default speed in words per minute corresponds to a rate of 1.0.
const ESPEAK_BASE_WPM: f32 = 175.0;
const SIGNAL_CHANNEL_CAPACITY: usize = 16;

/// Text-to-speech backend the dispatcher submits utterances to.
pub trait VoiceEngine: Send {
    /// Installed voices with their language tags.
    fn voices(&self) -> Result<Vec<Voice>>;

    /// Begin speaking. Returns once the utterance is submitted, not when it ends.
    fn speak(&mut self, utterance: &Utterance) -> Result<()>;

    /// Next pending lifecycle signal, without blocking.
    fn try_signal(&mut self) -> Option<SpeechSignal>;

    /// Block up to `timeout` for the next lifecycle signal.
    fn wait_signal(&mut self, timeout: Duration) -> Option<SpeechSignal>;
}

/// Engine backed by an espeak-ng style CLI (`espeak-ng`, `espeak`, or a wrapper).
pub struct CommandVoiceEngine {
    program: String,
    base_args: Vec<String>,
    signal_tx: Sender<SpeechSignal>,
    signal_rx: Receiver<SpeechSignal>,
}

impl CommandVoiceEngine {
    /// Build from a command line such as `espeak-ng` or `espeak-ng -a 120`.
    pub fn new(command_line: &str) -> Result<Self> {
        let mut words = shell_words::split(command_line)
            .with_context(|| format!("invalid TTS command `{command_line}`"))?;
        if words.is_empty() {
            bail!("TTS command is empty");
        }
        let program = words.remove(0);
        let (signal_tx, signal_rx) = bounded(SIGNAL_CHANNEL_CAPACITY);
        Ok(Self {
            program,
            base_args: words,
            signal_tx,
            signal_rx,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for one utterance. Text goes through stdin, never argv, so a
    /// phrase starting with `-` cannot be read as a flag.
    pub(crate) fn utterance_args(&self, utterance: &Utterance) -> Vec<String> {
        let mut args = self.base_args.clone();
        if let Some(voice) = &utterance.voice {
            args.push("-v".into());
            args.push(voice.id.clone());
        }
        let pitch = (utterance.pitch * ESPEAK_BASE_PITCH).round().clamp(0.0, 99.0) as u32;
        let wpm = (utterance.rate * ESPEAK_BASE_WPM).round().clamp(80.0, 500.0) as u32;
        args.push("-p".into());
        args.push(pitch.to_string());
        args.push("-s".into());
        args.push(wpm.to_string());
        args
    }
}

impl VoiceEngine for CommandVoiceEngine {
    fn voices(&self) -> Result<Vec<Voice>> {
        let output = Command::new(&self.program)
            .args(&self.base_args)
            .arg("--voices")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .with_context(|| format!("failed to run `{} --voices`", self.program))?;
        if !output.status.success() {
            return Err(anyhow!(
                "`{} --voices` exited with {}",
                self.program,
                output.status
            ));
        }
        Ok(parse_voice_list(&String::from_utf8_lossy(&output.stdout)))
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(self.utterance_args(utterance))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("voice engine `{}` is unavailable", self.program))?;
        let mut stdin = child.stdin.take();
        let text = utterance.text.clone();
        let tx = self.signal_tx.clone();
        log_debug_content(&format!("tts: speaking {text:?}"));

        thread::spawn(move || {
            let _ = tx.send(SpeechSignal::Started);
            if let Some(mut pipe) = stdin.take() {
                // The engine may exit without reading; a broken pipe is fine.
                if let Err(err) = pipe.write_all(text.as_bytes()) {
                    log_debug(&format!("tts: stdin write failed: {err}"));
                }
            }
            let signal = match child.wait() {
                Ok(status) if status.success() => SpeechSignal::Ended,
                Ok(status) => SpeechSignal::Failed(format!("engine exited with {status}")),
                Err(err) => SpeechSignal::Failed(format!("engine wait failed: {err}")),
            };
            let _ = tx.send(signal);
        });
        Ok(())
    }

    fn try_signal(&mut self) -> Option<SpeechSignal> {
        self.signal_rx.try_recv().ok()
    }

    fn wait_signal(&mut self, timeout: Duration) -> Option<SpeechSignal> {
        match self.signal_rx.recv_timeout(timeout) {
            Ok(signal) => Some(signal),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

/// Parse the table printed by `espeak-ng --voices`:
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  es              --/M      Spanish_(Spain)    roa/es
/// ```
pub fn parse_voice_list(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            if columns.len() < 4 || columns[0] == "Pty" {
                return None;
            }
            if columns[0].parse::<u32>().is_err() {
                return None;
            }
            Some(Voice {
                id: columns[1].to_string(),
                name: columns[3].replace('_', " "),
                lang: columns[1].to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_VOICES: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 5  en-us           --/M      English_(America)  gmw/en-US            (en 8)
 5  es              --/M      Spanish_(Spain)    roa/es
 5  es-419          --/M      Spanish_(Latin_America) roa/es-419      (es-mx 6)
";

    fn utterance(voice: Option<Voice>) -> Utterance {
        Utterance {
            text: "Hola".into(),
            pitch: 1.0,
            rate: 1.0,
            voice,
            lang_marker: "es".into(),
        }
    }

    #[test]
    fn parses_espeak_voice_table() {
        let voices = parse_voice_list(SAMPLE_VOICES);
        assert_eq!(voices.len(), 4);
        assert_eq!(voices[2].id, "es");
        assert_eq!(voices[2].name, "Spanish (Spain)");
        assert_eq!(voices[3].lang, "es-419");
    }

    #[test]
    fn ignores_header_and_garbage_lines() {
        assert!(parse_voice_list("Pty Language Age/Gender VoiceName File\n").is_empty());
        assert!(parse_voice_list("not a voice table\n\n").is_empty());
    }

    #[test]
    fn command_line_is_split_into_program_and_args() {
        let engine = CommandVoiceEngine::new("espeak-ng -a 120").expect("engine");
        assert_eq!(engine.program(), "espeak-ng");
        let args = engine.utterance_args(&utterance(None));
        assert_eq!(args, ["-a", "120", "-p", "50", "-s", "175"]);
    }

    #[test]
    fn selected_voice_is_passed_with_v_flag() {
        let engine = CommandVoiceEngine::new("espeak-ng").expect("engine");
        let voice = Voice {
            id: "es".into(),
            name: "Spanish".into(),
            lang: "es".into(),
        };
        let args = engine.utterance_args(&utterance(Some(voice)));
        assert_eq!(args, ["-v", "es", "-p", "50", "-s", "175"]);
    }

    #[test]
    fn empty_or_unbalanced_command_is_rejected() {
        assert!(CommandVoiceEngine::new("").is_err());
        assert!(CommandVoiceEngine::new("espeak-ng \"unterminated").is_err());
    }

    #[test]
    fn missing_program_fails_at_submit() {
        let mut engine =
            CommandVoiceEngine::new("voxboard-definitely-missing-tts").expect("engine");
        let err = engine.speak(&utterance(None)).expect_err("spawn should fail");
        assert!(format!("{err:#}").contains("unavailable"));
        assert!(engine.try_signal().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn successful_child_reports_start_then_end() {
        // The espeak flags land in `$@` and are ignored by the script.
        let mut engine = CommandVoiceEngine::new("sh -c 'cat >/dev/null' sh").expect("engine");
        engine.speak(&utterance(None)).expect("speak");
        assert_eq!(
            engine.wait_signal(Duration::from_secs(5)),
            Some(SpeechSignal::Started)
        );
        assert_eq!(
            engine.wait_signal(Duration::from_secs(5)),
            Some(SpeechSignal::Ended)
        );
    }

    #[cfg(unix)]
    #[test]
    fn failing_child_reports_failure() {
        let mut engine = CommandVoiceEngine::new("false").expect("engine");
        engine.speak(&utterance(None)).expect("speak");
        assert_eq!(
            engine.wait_signal(Duration::from_secs(5)),
            Some(SpeechSignal::Started)
        );
        match engine.wait_signal(Duration::from_secs(5)) {
            Some(SpeechSignal::Failed(reason)) => assert!(reason.contains("exited")),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
