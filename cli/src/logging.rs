//! Logging setup for the terminal front end.
//!
//! Logs go to `~/.config/cadence/cadence.log` (or the platform equivalent)
//! with 10 MB size-based rotation, plus stderr so the REPL output on stdout
//! stays readable. Set `DEBUG_LOGGING=1` to enable debug output for the
//! cadence crates.

use std::path::PathBuf;

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const LOG_FILE: &str = "cadence.log";
const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

fn filter_directive(debug_logging: bool) -> &'static str {
    if debug_logging {
        "info,cadence_core=debug,cadence_cli=debug"
    } else {
        "info"
    }
}

fn log_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join("cadence"))
}

/// Initialize logging with file and stderr output.
///
/// The returned guard must live as long as the program, dropping it flushes
/// the buffered file writer. Returns `None` when file logging could not be
/// set up; logging then goes to stderr only.
pub fn init() -> Option<WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let Some(log_dir) = log_dir() else {
        init_stderr_only(debug_logging);
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        // Subscriber is not installed yet
        eprintln!(
            "Failed to create log directory {:?}: {}, using stderr only",
            log_dir, e
        );
        init_stderr_only(debug_logging);
        return None;
    }

    let log_path = log_dir.join(LOG_FILE);
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(MAX_LOG_BYTES),
        1,
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to create log file at {:?}: {}", log_path, e);
            init_stderr_only(debug_logging);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .with_span_events(FmtSpan::NONE);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(EnvFilter::new(filter_directive(debug_logging)))
        .init();

    tracing::info!(log_file = ?log_path, debug_logging, "Cadence logging initialized");

    Some(guard)
}

fn init_stderr_only(debug_logging: bool) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(EnvFilter::new(filter_directive(debug_logging)))
        .init();

    tracing::info!(debug_logging, "Cadence logging initialized (stderr only)");
}
