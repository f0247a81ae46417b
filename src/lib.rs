//! dupbrowse - terminal browser for duplicate images and videos
//!
//! Navigate the filesystem, scan a directory for duplicate media, and review
//! the resulting groups (view, play, delete) without leaving the terminal.
//! Scan results are cached in a side file inside the scanned directory and
//! dropped whenever a file is deleted through the review screen.

pub mod actions;
pub mod browser;
pub mod cache;
pub mod cli;
pub mod config;
pub mod connection;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod scanner;
pub mod tui;
pub mod viewport;

use anyhow::Context;

use crate::cli::{version_line, Cli};
use crate::config::Config;
use crate::connection::ConnectionInfo;
use crate::error::ExitCode;
use crate::tui::{run_tui, App, RunContext, Theme};

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined or the
/// interactive screen fails. A [`tui::TuiError::TerminalInit`] inside the
/// error chain means the terminal could not be taken over.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    if cli.version {
        println!("{}", version_line());
        return Ok(ExitCode::Success);
    }

    let config = Config::load();
    let log_path = config.log_path();
    logging::init_logging(&config.log_level, log_path.as_deref());
    log::info!(
        "{} starting (log level {})",
        version_line(),
        logging::current_level_name()
    );

    let connection = ConnectionInfo::detect();
    log::debug!("Connection: {}", connection.banner());

    let start = std::env::current_dir().context("cannot determine the current directory")?;
    let mut app = App::new(&start)
        .with_bookmarks(config.bookmarks.clone())
        .with_banner(connection.banner())
        .with_theme(Theme::from_mode(config.theme));

    let context = RunContext::new(config, connection);
    run_tui(&mut app, &context).context("interactive session failed")?;

    Ok(ExitCode::Success)
}
