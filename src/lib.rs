pub mod alert;
mod app;
pub mod config;
pub mod history;
pub mod outbound;
pub mod phrases;
pub mod speech;
pub mod store;
pub mod suggest;
mod telemetry;
pub mod terminal_restore;
pub mod text;
pub mod theme;
pub mod ui;

pub use app::{
    crash_log_path, init_logging, log_debug, log_debug_content, log_file_path, log_panic, Board,
    ContactOptions,
};
