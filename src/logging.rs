use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "fino_dashboard=info";

/// Where log lines go. The terminal view owns the screen, so without a log
/// file it gets no subscriber at all.
pub fn log_writer(log_file: Option<&Path>, stderr_allowed: bool) -> Result<Option<BoxMakeWriter>, String> {
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| format!("Failed to open log file '{}': {}", path.display(), e))?;
            Ok(Some(BoxMakeWriter::new(Mutex::new(file))))
        }
        None if stderr_allowed => Ok(Some(BoxMakeWriter::new(io::stderr))),
        None => Ok(None),
    }
}

pub fn init_tracing(log_file: Option<&Path>, stderr_allowed: bool) -> Result<(), String> {
    let Some(writer) = log_writer(log_file, stderr_allowed)? else {
        return Ok(());
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(log_file.is_none())
        .with_target(true)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))
}
