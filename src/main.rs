//! dupbrowse - terminal browser for duplicate images and videos
//!
//! Entry point for the dupbrowse binary.

use clap::Parser;
use dupbrowse::{cli::Cli, error::ExitCode, tui::TuiError};

fn main() {
    let cli = Cli::parse();

    match dupbrowse::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = if err
                .downcast_ref::<TuiError>()
                .is_some_and(|e| matches!(e, TuiError::TerminalInit(_)))
            {
                ExitCode::TerminalError
            } else {
                ExitCode::GeneralError
            };

            log::error!("{:#}", err);
            eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
