//! Command-line interface definitions for dupbrowse.
//!
//! There are no subcommands: running the binary opens the interactive
//! browser in the current directory.
//!
//! ```bash
//! dupbrowse
//! dupbrowse --version
//! ```

use clap::Parser;

/// Terminal file browser for finding and reviewing duplicate images and videos.
#[derive(Debug, Parser)]
#[command(name = "dupbrowse")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Print the version and exit
    #[arg(short = 'v', long = "version")]
    pub version: bool,
}

/// Version line printed by `--version`.
#[must_use]
pub fn version_line() -> String {
    format!("dupbrowse {}", env!("CARGO_PKG_VERSION"))
}
