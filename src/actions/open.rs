//! Opening files with external programs.
//!
//! # Overview
//!
//! Opening is planned first and executed second. [`plan_open`] picks the
//! program for a path from its [`MediaKind`] and the session's
//! [`ConnectionInfo`]; the result is either a detached launch (viewer,
//! player, opener) or a terminal takeover (editor). Detached launches are
//! fire-and-forget. Takeovers are run by the event loop, which suspends the
//! screen around them.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

use crate::config::Config;
use crate::connection::ConnectionInfo;

/// Extensions played as video.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "flv", "wmv", "m4v", "mpg", "mpeg",
];

/// Extensions edited as text.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "py", "sh", "conf", "json", "md", "log", "csv", "bash_aliases", "yaml", "yml",
];

/// Errors that can occur when opening a file.
#[derive(Error, Debug)]
pub enum OpenError {
    /// The file does not exist (or was deleted in this session).
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// The external program could not be started.
    #[error("failed to launch {program}: {source}")]
    LaunchFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    /// A configured command line is empty.
    #[error("no program configured for {0} files")]
    NoProgram(&'static str),
}

/// Broad file category used to pick a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Still image
    Image,
    /// Video
    Video,
    /// Plain text, or a file without an extension
    Text,
    /// Anything else
    Other,
}

impl MediaKind {
    /// Classify `path` by extension (case-insensitive).
    #[must_use]
    pub fn of(path: &Path) -> Self {
        // Dotfiles such as ".bash_aliases" have no extension either
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Text;
        };
        let ext = ext.to_ascii_lowercase();
        if crate::scanner::image::is_image(path) {
            Self::Image
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Self::Video
        } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            Self::Text
        } else {
            Self::Other
        }
    }

    /// Name used in messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Text => "text",
            Self::Other => "other",
        }
    }
}

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    /// Executable name or path
    pub program: String,
    /// Arguments, target path included
    pub args: Vec<OsString>,
}

impl LaunchSpec {
    fn from_command_line(
        command: &[String],
        target: &Path,
        kind: MediaKind,
    ) -> Result<Self, OpenError> {
        let (program, rest) = command
            .split_first()
            .ok_or(OpenError::NoProgram(kind.name()))?;
        let mut args: Vec<OsString> = rest.iter().map(OsString::from).collect();
        args.push(target.as_os_str().to_os_string());
        Ok(Self {
            program: program.clone(),
            args,
        })
    }

    /// Build the process command.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

/// How a file will be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenPlan {
    /// Start in the background with no terminal I/O.
    Detached(LaunchSpec),
    /// Run in the foreground with the terminal handed over.
    Takeover(LaunchSpec),
}

/// Programs used to open files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launchers {
    /// Image viewer command line
    pub image_viewer: Vec<String>,
    /// Video player command line
    pub video_player: Vec<String>,
    /// Generic opener command line
    pub opener: Vec<String>,
    /// Terminal editor command line
    pub editor: Vec<String>,
}

impl Launchers {
    /// Launchers from configuration, resolving the editor from the environment.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            image_viewer: config.image_viewer.clone(),
            video_player: config.video_player.clone(),
            opener: config.opener.clone(),
            editor: config.resolve_editor(),
        }
    }
}

/// Decide how to open `path`.
///
/// Videos are played on the SSH client when the session is remote.
///
/// # Errors
///
/// Returns [`OpenError::FileNotFound`] if `path` does not exist and
/// [`OpenError::NoProgram`] if the relevant command line is empty.
pub fn plan_open(
    path: &Path,
    launchers: &Launchers,
    connection: &ConnectionInfo,
) -> Result<OpenPlan, OpenError> {
    if !path.exists() {
        return Err(OpenError::FileNotFound(path.to_path_buf()));
    }
    let kind = MediaKind::of(path);
    let plan = match kind {
        MediaKind::Video => match &connection.remote {
            Some(remote) => {
                if launchers.video_player.is_empty() {
                    return Err(OpenError::NoProgram(kind.name()));
                }
                let player: Vec<String> = launchers
                    .video_player
                    .iter()
                    .map(|word| shell_quote(word))
                    .collect();
                let url = format!(
                    "sftp://{}@{}{}",
                    connection.user,
                    remote.server_ip,
                    path.display()
                );
                let remote_cmd = format!(
                    "export DISPLAY=:0; {} {} > /dev/null 2>&1 &",
                    player.join(" "),
                    shell_quote(&url)
                );
                OpenPlan::Detached(LaunchSpec {
                    program: "ssh".to_string(),
                    args: vec!["-f".into(), remote.client_ip.clone().into(), remote_cmd.into()],
                })
            }
            None => OpenPlan::Detached(LaunchSpec::from_command_line(
                &launchers.video_player,
                path,
                kind,
            )?),
        },
        MediaKind::Image => OpenPlan::Detached(LaunchSpec::from_command_line(
            &launchers.image_viewer,
            path,
            kind,
        )?),
        MediaKind::Text => {
            OpenPlan::Takeover(LaunchSpec::from_command_line(&launchers.editor, path, kind)?)
        }
        MediaKind::Other => {
            OpenPlan::Detached(LaunchSpec::from_command_line(&launchers.opener, path, kind)?)
        }
    };
    log::debug!("Open plan for {}: {:?}", path.display(), plan);
    Ok(plan)
}

/// Quote `word` as a single POSIX shell word.
fn shell_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}

/// Start `spec` in the background with all standard streams closed.
///
/// # Errors
///
/// Returns [`OpenError::LaunchFailed`] if the process cannot be spawned.
pub fn launch_detached(spec: &LaunchSpec) -> Result<(), OpenError> {
    spec.command()
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| OpenError::LaunchFailed {
            program: spec.program.clone(),
            source,
        })?;
    log::info!("Launched {}", spec.program);
    Ok(())
}

/// Run `spec` in the foreground and wait for it to exit.
///
/// The caller is responsible for handing over the terminal.
///
/// # Errors
///
/// Returns [`OpenError::LaunchFailed`] if the process cannot be started.
pub fn run_foreground(spec: &LaunchSpec) -> Result<ExitStatus, OpenError> {
    let status = spec
        .command()
        .status()
        .map_err(|source| OpenError::LaunchFailed {
            program: spec.program.clone(),
            source,
        })?;
    log::info!("{} exited with {}", spec.program, status);
    Ok(status)
}
