//! ## Sets up logging by reading configuration from environment variables.
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//! - LOG_FILE_PATH: when using file mode, the path of the log file (default "logs/token-manager.log")
//! - RUST_LOG: when set, overrides LOG_LEVEL with a full filter directive
//!
//! Console output goes to stderr so command output on stdout stays machine readable.

use chrono::{NaiveDate, Utc};
use eyre::{eyre, WrapErr};
use std::{
    env,
    fs::{create_dir_all, OpenOptions},
    path::Path,
    sync::Mutex,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::constants::{DEFAULT_LOG_FILE_PATH, DEFAULT_LOG_LEVEL, DEFAULT_LOG_MODE};

/// Appends the UTC date to the log file name, replacing a trailing ".log".
pub fn compute_rolled_file_path(base_file_path: &str, date: NaiveDate) -> String {
    let date_str = date.format("%Y-%m-%d");
    match base_file_path.strip_suffix(".log") {
        Some(trimmed) => format!("{trimmed}-{date_str}.log"),
        None => format!("{base_file_path}-{date_str}.log"),
    }
}

fn level_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match log_level.to_lowercase().as_str() {
            level @ ("trace" | "debug" | "info" | "warn" | "error") => level.to_string(),
            _ => DEFAULT_LOG_LEVEL.to_string(),
        };
        EnvFilter::new(level)
    })
}

pub fn setup_logging() -> eyre::Result<()> {
    let log_mode = env::var("LOG_MODE").unwrap_or_else(|_| DEFAULT_LOG_MODE.to_string());
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

    if log_mode.eq_ignore_ascii_case("file") {
        let base_file_path =
            env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE_PATH.to_string());
        let rolled_file_path = compute_rolled_file_path(&base_file_path, Utc::now().date_naive());

        if let Some(parent) = Path::new(&rolled_file_path).parent() {
            create_dir_all(parent).wrap_err("Failed to create log directory")?;
        }

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&rolled_file_path)
            .wrap_err_with(|| format!("Unable to create log file {rolled_file_path}"))?;

        tracing_subscriber::fmt()
            .with_env_filter(level_filter(&log_level))
            .with_writer(Mutex::new(log_file))
            .with_ansi(false)
            .try_init()
            .map_err(|e| eyre!("Failed to initialize file logger: {e}"))?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(level_filter(&log_level))
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .map_err(|e| eyre!("Failed to initialize stderr logger: {e}"))?;
    }

    info!(mode = %log_mode, "logging is configured");
    Ok(())
}
