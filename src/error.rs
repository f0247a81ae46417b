//! Exit codes.

/// Exit codes for the dupbrowse application.
///
/// - 0: Success (normal quit, or `--version`)
/// - 1: General error (unexpected failure)
/// - 2: Terminal error (the screen could not be initialized)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Normal exit.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// The terminal could not be put into interactive mode.
    TerminalError = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DB000",
            Self::GeneralError => "DB001",
            Self::TerminalError => "DB002",
        }
    }
}
