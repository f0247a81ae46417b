//! Video duplicate backend.
//!
//! Delegates to the external `vid_dup_finder` tool, which prints groups of
//! duplicate paths separated by blank lines. The tool's own progress goes
//! to stderr, so the screen is suspended for the duration of the scan.

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use directories::BaseDirs;

use super::{parse_group_lines, BackendKind, DuplicateBackend, ScanError, ScanProgress, ScanRecord};

/// Binary name looked up on `PATH`.
pub const FINDER_BINARY: &str = "vid_dup_finder";

/// External-tool video scanner.
#[derive(Debug, Clone)]
pub struct VideoBackend {
    finder: Option<PathBuf>,
    threads: usize,
}

impl VideoBackend {
    /// Create a backend using `finder` (or a lookup when `None`) on `threads` workers.
    #[must_use]
    pub fn new(finder: Option<PathBuf>, threads: usize) -> Self {
        Self {
            finder,
            threads: threads.max(1),
        }
    }

    /// The finder executable that would be run, if one can be found.
    #[must_use]
    pub fn resolve_finder(&self) -> Option<PathBuf> {
        locate_finder(self.finder.as_deref())
    }
}

/// Locate the finder: the configured path, else `PATH`, else `~/.cargo/bin`.
#[must_use]
pub fn locate_finder(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        if path.components().count() > 1 {
            return path.is_file().then(|| path.to_path_buf());
        }
        return search_path(path.as_os_str());
    }
    search_path(FINDER_BINARY.as_ref()).or_else(|| {
        let fallback = BaseDirs::new()?
            .home_dir()
            .join(".cargo")
            .join("bin")
            .join(FINDER_BINARY);
        fallback.is_file().then_some(fallback)
    })
}

fn search_path(name: &std::ffi::OsStr) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Command line for scanning `directory` with `finder`.
#[must_use]
pub fn finder_command(finder: &Path, directory: &Path, threads: usize) -> Command {
    let mut cmd = Command::new(finder);
    cmd.arg("--output")
        .arg("dups")
        .arg("--files")
        .arg(directory)
        .env("RAYON_NUM_THREADS", threads.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());
    cmd
}

impl DuplicateBackend for VideoBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Video
    }

    fn takes_over_terminal(&self) -> bool {
        true
    }

    fn scan(
        &self,
        directory: &Path,
        progress: &mut dyn ScanProgress,
    ) -> Result<Vec<ScanRecord>, ScanError> {
        let finder = self
            .resolve_finder()
            .ok_or_else(|| ScanError::BackendUnavailable {
                backend: BackendKind::Video.name(),
                reason: format!("{FINDER_BINARY} not found on PATH or in ~/.cargo/bin"),
            })?;

        progress.message(&format!("--- SCANNING: {} ---", directory.display()));
        progress.message(&format!(
            "Using {} threads via RAYON_NUM_THREADS...",
            self.threads
        ));
        log::info!(
            "Running {} on {} with {} threads",
            finder.display(),
            directory.display(),
            self.threads
        );

        let output = finder_command(&finder, directory, self.threads)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                    ScanError::BackendUnavailable {
                        backend: BackendKind::Video.name(),
                        reason: format!("cannot run {}: {}", finder.display(), e),
                    }
                }
                _ => ScanError::Io {
                    path: finder.clone(),
                    source: e,
                },
            })?;

        if !output.status.success() {
            // The finder exits non-zero on warnings; its stdout is still usable.
            log::warn!("{} exited with {}", finder.display(), output.status);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let records = parse_group_lines(stdout.lines(), directory);
        if records.is_empty() {
            progress.message("Scan finished, no duplicates reported.");
        } else {
            progress.message("Scan complete. Returning to browser...");
        }
        log::info!(
            "Video scan of {} found {} duplicate groups",
            directory.display(),
            records.len()
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::NoProgress;
    use tempfile::TempDir;

    #[test]
    fn test_missing_configured_finder_is_unavailable() {
        let temp = TempDir::new().unwrap();
        let backend = VideoBackend::new(Some(temp.path().join("no-such-finder")), 1);
        let result = backend.scan(temp.path(), &mut NoProgress);
        assert!(matches!(result, Err(ScanError::BackendUnavailable { .. })));
    }

    #[test]
    fn test_finder_command_arguments() {
        let cmd = finder_command(Path::new("/bin/finder"), Path::new("/videos"), 3);
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["--output", "dups", "--files", "/videos"]);
        let threads = cmd
            .get_envs()
            .find(|(k, _)| *k == "RAYON_NUM_THREADS")
            .and_then(|(_, v)| v);
        assert_eq!(threads, Some(std::ffi::OsStr::new("3")));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_parses_finder_output() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("fake_finder");
        fs::write(
            &script,
            "#!/bin/sh\nprintf '/v/a.mp4\\n/v/b.mp4\\n\\n/v/c.mp4\\n/v/d.mp4\\n'\necho progress >&2\nexit 1\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let backend = VideoBackend::new(Some(script), 2);
        assert!(backend.takes_over_terminal());
        let records = backend.scan(temp.path(), &mut NoProgress).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].member_paths[0], PathBuf::from("/v/c.mp4"));
    }

    #[cfg(unix)]
    #[test]
    fn test_empty_finder_output_is_no_duplicates() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("quiet_finder");
        fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let records = VideoBackend::new(Some(script), 1)
            .scan(temp.path(), &mut NoProgress)
            .unwrap();
        assert!(records.is_empty());
    }
}
