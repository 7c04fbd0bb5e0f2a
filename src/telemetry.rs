use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_subscriber::fmt::time::UtcTime;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

pub(crate) fn tracing_log_path() -> PathBuf {
    env::var("VOXBOARD_TRACE_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir().join("voxboard_trace.jsonl"))
}

/// Install a JSON-lines subscriber once. Stdout belongs to the board, so
/// structured events only ever go to the trace file.
pub(crate) fn init_tracing(enabled: bool) {
    if !enabled {
        return;
    }
    TRACING_INIT.get_or_init(|| {
        let path = tracing_log_path();
        let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
            return;
        };
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_timer(UtcTime::rfc_3339())
            .with_writer(file)
            .with_current_span(false)
            .with_span_list(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
