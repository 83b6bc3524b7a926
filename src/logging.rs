//! Diagnostic logging.
//!
//! Configure via the RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=bufshell::buffers=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs go to `<cache dir>/bufshell/logs/bufshell.log` with daily rotation,
//! so they never interleave with the prompt. If that directory cannot be
//! created, warnings go to stderr instead.

use std::path::PathBuf;

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn logs_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("bufshell").join("logs"))
}

fn ensure_logs_dir() -> std::io::Result<PathBuf> {
    let dir = logs_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "no cache directory")
    })?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Install the global subscriber. Calling it again is a no-op.
pub fn init() {
    let file_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match ensure_logs_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "bufshell.log");
            Some(
                fmt::layer()
                    .with_writer(appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(file_filter),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    let stderr_layer = file_layer.is_none().then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(EnvFilter::new("warn"))
    });

    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
}
