//! Logging infrastructure for dupbrowse.
//!
//! This module provides structured logging using the `log` facade and `env_logger` backend.
//! The interactive screen owns the terminal, so records are written to a log
//! file rather than stderr. Log levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. The `log_level` configuration value
//! 3. Default: info level
//!
//! If the log file cannot be opened, logging is turned off.
//!
//! # Build-specific Formatting
//!
//! - **Debug builds**: Include timestamp, level, and module path for detailed debugging
//! - **Release builds**: Compact format with timestamp, level and message
//!
//! # Example
//!
//! ```rust,no_run
//! use dupbrowse::logging::init_logging;
//! use std::path::Path;
//!
//! init_logging("debug", Some(Path::new("/tmp/dupbrowse.log")));
//! log::info!("Application started");
//! ```

use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Initialize the logging subsystem.
///
/// Returns true when records will be written somewhere. Calling this more
/// than once keeps the first logger.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> bool {
    let Some(file) = log_file.and_then(open_log_file) else {
        log::set_max_level(LevelFilter::Off);
        return false;
    };

    let use_env = env::var("RUST_LOG").is_ok();
    let mut builder = Builder::new();

    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(level));
    }

    builder
        .target(Target::Pipe(Box::new(file)))
        .write_style(WriteStyle::Never);
    configure_format(&mut builder);

    if builder.try_init().is_err() {
        return true;
    }

    if use_env {
        log::debug!(
            "Logging initialized from RUST_LOG environment variable: {:?}",
            env::var("RUST_LOG").ok()
        );
    } else {
        log::debug!("Logging initialized at level: {:?}", determine_level(level));
    }
    true
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Parse a configured level name, falling back to info.
fn determine_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Configure the log format based on build type.
///
/// - Debug builds: timestamp, level, module path (for detailed debugging)
/// - Release builds: timestamp, level, message
fn configure_format(builder: &mut Builder) {
    #[cfg(debug_assertions)]
    {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} [{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        });
    }

    #[cfg(not(debug_assertions))]
    {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}",
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        });
    }
}

/// Get the current log level as a string.
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
