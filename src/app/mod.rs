//! Board state and the process-wide diagnostics that every module logs through.
//!
//! The board is the one place phrase counts, history, and UI toggles change,
//! so the terminal front-end and the headless `--say` path share it.

mod board;
mod logging;

pub use board::{Board, ContactOptions};
#[cfg(test)]
pub(crate) use logging::set_logging_for_tests;
pub use logging::{
    crash_log_path, init_logging, log_debug, log_debug_content, log_file_path, log_panic,
};
