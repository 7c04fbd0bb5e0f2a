use super::defaults::{
    CONTACT_NUMBER_DIGITS, ISO_639_1_CODES, LANG_MARKER_CHARS, MAX_CONTACT_MESSAGE_CHARS,
    MAX_SAY_TIMEOUT_MS, MIN_SAY_TIMEOUT_MS,
};
use super::AppConfig;
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::{fs, path::Path};

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize them.
    pub fn validate(&mut self) -> Result<()> {
        let marker = self.lang_marker.trim().to_ascii_lowercase();
        if !LANG_MARKER_CHARS.contains(&marker.chars().count()) {
            bail!(
                "--lang-marker must be {} to {} characters, got '{}'",
                LANG_MARKER_CHARS.start(),
                LANG_MARKER_CHARS.end(),
                self.lang_marker
            );
        }
        if !marker
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        {
            bail!("--lang-marker must contain only letters, digits or '-'/'_' separators");
        }
        // Region suffixes (`419`, `mx`) are free-form; the leading subtag must be ISO-639-1.
        let primary = marker.split(['-', '_']).next().unwrap_or("");
        if !ISO_639_1_CODES.contains(&primary) {
            bail!(
                "--lang-marker must start with a valid ISO-639-1 code, got '{}'",
                self.lang_marker
            );
        }
        self.lang_marker = marker;

        self.tts_cmd = sanitize_command(&self.tts_cmd, "--tts-cmd")?;
        self.open_cmd = sanitize_command(&self.open_cmd, "--open-cmd")?;

        let number = self.contact_number.trim();
        if !CONTACT_NUMBER_DIGITS.contains(&number.len())
            || !number.chars().all(|ch| ch.is_ascii_digit())
        {
            bail!(
                "--contact-number must be {} to {} digits including country code, got '{}'",
                CONTACT_NUMBER_DIGITS.start(),
                CONTACT_NUMBER_DIGITS.end(),
                self.contact_number
            );
        }
        self.contact_number = number.to_string();

        let message_chars = self.contact_message.trim().chars().count();
        if message_chars == 0 || message_chars > MAX_CONTACT_MESSAGE_CHARS {
            bail!("--contact-message must be 1 to {MAX_CONTACT_MESSAGE_CHARS} characters");
        }

        if !(MIN_SAY_TIMEOUT_MS..=MAX_SAY_TIMEOUT_MS).contains(&self.say_timeout_ms) {
            bail!(
                "--say-timeout-ms must be between {MIN_SAY_TIMEOUT_MS} and {MAX_SAY_TIMEOUT_MS}, got {}",
                self.say_timeout_ms
            );
        }

        if let Some(dir) = &self.data_dir {
            if dir.as_os_str().is_empty() {
                bail!("--data-dir cannot be empty");
            }
            if dir.is_file() {
                bail!("--data-dir '{}' is a file, not a directory", dir.display());
            }
        }

        Ok(())
    }
}

/// Validate a command line: it must split cleanly, and a program given as a
/// path must be an existing executable file. Bare names are resolved via PATH
/// at spawn time.
pub(super) fn sanitize_command(value: &str, flag: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{flag} cannot be empty");
    }
    let words =
        shell_words::split(trimmed).with_context(|| format!("{flag} has unbalanced quotes"))?;
    let program = words
        .first()
        .ok_or_else(|| anyhow!("{flag} cannot be empty"))?;
    if program.chars().any(|ch| matches!(ch, '\n' | '\r' | '\0')) {
        bail!("{flag} must not contain control characters");
    }

    let path = Path::new(program);
    if path.is_absolute() || program.contains(std::path::MAIN_SEPARATOR) {
        let canonical = path
            .canonicalize()
            .with_context(|| format!("failed to canonicalize {flag} '{program}'"))?;
        let metadata = fs::metadata(&canonical)
            .with_context(|| format!("failed to inspect {flag} '{}'", canonical.display()))?;
        if !metadata.is_file() {
            bail!("{flag} '{}' is not a file", canonical.display());
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = metadata.permissions().mode();
            if mode & 0o111 == 0 {
                bail!(
                    "{flag} '{}' exists but is not executable (mode {:o})",
                    canonical.display(),
                    mode
                );
            }
        }
    }

    Ok(trimmed.to_string())
}
