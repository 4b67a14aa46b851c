//! Tracing setup. A production daemon needs two sinks at once: a terse
//! stderr stream for interactive debugging, and a rolling file under the
//! platform cache directory that the menu bar's "copy diagnostics" action
//! reads back from.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const DEFAULT_FILTER: &str = "info";
const LOG_ENV_VAR: &str = "LATTICEWM_LOG";

/// Must be kept alive for the lifetime of the process; dropping it stops
/// flushing the non-blocking file writer.
pub struct LogGuard(#[allow(dead_code)] Option<WorkerGuard>);

pub fn log_dir() -> PathBuf {
    dirs::cache_dir().unwrap_or_else(std::env::temp_dir).join("latticewm").join("log")
}

/// Initializes the global tracing subscriber. Safe to call once per
/// process; a second call is a no-op (the underlying `set_global_default`
/// failure is swallowed, matching how daemons tolerate being re-exec'd by a
/// supervisor that double-inits logging).
pub fn init() -> LogGuard {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let dir = log_dir();
    let guard = match std::fs::create_dir_all(&dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(&dir, "latticewm.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_ansi(false).with_writer(non_blocking);
            let stderr_layer = fmt::layer().with_writer(std::io::stderr);
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .try_init();
            Some(guard)
        }
        Err(_) => {
            let stderr_layer = fmt::layer().with_writer(std::io::stderr);
            let _ = tracing_subscriber::registry().with(filter).with(stderr_layer).try_init();
            None
        }
    };

    LogGuard(guard)
}
