//! Log setup.
//!
//! The TUI owns the terminal, so while it runs logs go to a file in the cache
//! directory. One-shot commands log to stderr. Both read their filter from
//! `STUDYDASH_LOG` (EnvFilter syntax) and default to `info`.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "STUDYDASH_LOG";
const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `<cache_dir>/studydash/studydash.log`
pub fn log_file_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("studydash").join("studydash.log"))
}

fn open_log_file() -> io::Result<(PathBuf, File)> {
    let path = log_file_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no cache directory"))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((path, file))
}

/// Log to the cache file. Returns the file path, or `None` when no file could be
/// opened (logging is then disabled rather than drawn over the TUI).
pub fn init_file() -> Option<PathBuf> {
    let (path, file) = match open_log_file() {
        Ok(opened) => opened,
        Err(_) => return None,
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();

    installed.ok().map(|()| path)
}

/// Log to stderr, for commands that don't take over the terminal.
pub fn init_stderr() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}
