//! Quick "call for help" link to a caretaker's messaging app.

use anyhow::{bail, Context, Result};
use std::process::{Command, Stdio};
use std::thread;

use crate::log_debug;

pub const DEFAULT_CONTACT_NUMBER: &str = "51995566892";
pub const DEFAULT_CONTACT_MESSAGE: &str = "Amor, ven por favor";

/// `https://wa.me/<number>?text=<message>` with the message percent-encoded.
pub fn whatsapp_link(number: &str, message: &str) -> String {
    // form encoding writes spaces as `+`; a literal `+` is already `%2B`.
    let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    format!("https://wa.me/{number}?text={encoded}")
}

/// Platform opener for URLs.
pub fn default_open_cmd() -> String {
    if cfg!(target_os = "macos") {
        "open".to_string()
    } else if cfg!(target_os = "windows") {
        "explorer".to_string()
    } else {
        "xdg-open".to_string()
    }
}

/// Hand `url` to the opener as a single argument. Never goes through a shell.
pub fn open_link(open_cmd: &str, url: &str) -> Result<()> {
    let mut words = shell_words::split(open_cmd)
        .with_context(|| format!("invalid open command `{open_cmd}`"))?;
    if words.is_empty() {
        bail!("open command is empty");
    }
    let program = words.remove(0);
    let mut child = Command::new(&program)
        .args(&words)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to launch `{program}`"))?;
    tracing::info!(opener = %program, "outbound link opened");
    // Reap the opener so it does not linger as a zombie.
    thread::spawn(move || {
        if let Err(err) = child.wait() {
            log_debug(&format!("outbound: opener wait failed: {err}"));
        }
    });
    Ok(())
}
