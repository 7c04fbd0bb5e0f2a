//! Put the terminal back the way we found it, on drop or on panic.

use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::{
    io::{self, Write},
    panic,
    sync::{
        atomic::{AtomicU8, Ordering},
        OnceLock,
    },
};

const RAW_MODE: u8 = 0b01;
const ALT_SCREEN: u8 = 0b10;

/// Which terminal modes are currently switched on.
static ACTIVE_MODES: AtomicU8 = AtomicU8::new(0);
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

/// Owns raw mode and the alternate screen for the lifetime of the board.
pub struct TerminalRestoreGuard {
    _private: (),
}

impl TerminalRestoreGuard {
    /// Switch to raw mode and the alternate screen. Anything already enabled
    /// is rolled back if a later step fails.
    pub fn enter(stdout: &mut impl Write) -> io::Result<Self> {
        install_terminal_panic_hook();
        let guard = Self { _private: () };
        enable_raw_mode()?;
        ACTIVE_MODES.fetch_or(RAW_MODE, Ordering::SeqCst);
        execute!(stdout, EnterAlternateScreen)?;
        ACTIVE_MODES.fetch_or(ALT_SCREEN, Ordering::SeqCst);
        Ok(guard)
    }

    pub fn restore(&self) {
        restore_terminal();
    }
}

impl Drop for TerminalRestoreGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Undo whatever modes are active. Safe to call more than once.
pub fn restore_terminal() {
    let modes = ACTIVE_MODES.swap(0, Ordering::SeqCst);
    if modes & RAW_MODE != 0 {
        let _ = disable_raw_mode();
    }
    let mut stdout = io::stdout();
    if modes & ALT_SCREEN != 0 {
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
    if modes != 0 {
        let _ = execute!(stdout, Show);
        let _ = stdout.flush();
    }
}

/// Chain a hook that restores the terminal and writes the crash log before
/// the default panic output runs.
pub fn install_terminal_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_terminal();
            crate::log_panic(info);
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown".to_string());
            crate::log_debug(&format!("panic at {location}"));
            previous(info);
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_without_active_modes_is_a_no_op() {
        ACTIVE_MODES.store(0, Ordering::SeqCst);
        restore_terminal();
        restore_terminal();
        assert_eq!(ACTIVE_MODES.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn panic_hook_installs_once() {
        install_terminal_panic_hook();
        install_terminal_panic_hook();
        assert!(PANIC_HOOK_INSTALLED.get().is_some());
    }
}
