//! TUI main loop.
//!
//! This module owns the terminal and runs the blocking event loop.
//!
//! # Terminal Management
//!
//! [`TerminalSession`] takes over the terminal by:
//! - Enabling raw mode (unbuffered input, no echo)
//! - Entering the alternate screen buffer
//! - Hiding the cursor
//!
//! The session can be suspended while an external program (editor, video
//! finder) uses the real terminal, and resumed afterwards. Everything is
//! reverted when the session is dropped, and a panic hook restores the
//! terminal before the panic message is printed.
//!
//! # Event Loop
//!
//! 1. Re-list the browser directory if it changed
//! 2. Draw the current state
//! 3. Block until a key arrives
//! 4. Let [`App`] handle the key, then perform the [`Effect`] it asks for
//!
//! Scans, launches and deletions run synchronously inside step 4.
//!
//! # Example
//!
//! ```no_run
//! use dupbrowse::config::Config;
//! use dupbrowse::connection::ConnectionInfo;
//! use dupbrowse::tui::{run_tui, App, RunContext};
//! use std::path::Path;
//!
//! let context = RunContext::new(Config::default(), ConnectionInfo::detect());
//! let mut app = App::new(Path::new("."));
//! run_tui(&mut app, &context).unwrap();
//! ```

use std::io::{self, Stdout, Write};
use std::time::Duration;
use std::panic;
use std::path::Path;

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use thiserror::Error;

use super::app::{App, Effect};
use super::events::{Event, EventError, EventHandler};
use super::theme::Theme;
use super::ui::{list_height, render, render_scan_progress, render_splash, ScanStatus};
use crate::actions::delete::{delete_file, DeleteError, DeleteMode, DeleteResult};
use crate::actions::open::{launch_detached, plan_open, run_foreground, Launchers, OpenPlan};
use crate::cache::{ScanCache, ScanOutcome};
use crate::config::Config;
use crate::connection::ConnectionInfo;
use crate::duplicates::ReviewTarget;
use crate::scanner::{backend_for, BackendKind, ScanError, ScanProgress};

/// Error type for TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// I/O error from terminal operations.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// The terminal could not be put into interactive mode.
    #[error("failed to initialize terminal: {0}")]
    TerminalInit(#[source] io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(#[from] EventError),
}

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

/// How long the startup splash stays up unless a key is pressed.
const SPLASH_DURATION: Duration = Duration::from_secs(1);

/// Type alias for the terminal backend.
type CrosstermTerminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Collaborators the event loop needs to carry out effects.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Loaded configuration
    pub config: Config,
    /// Scan cache
    pub cache: ScanCache,
    /// Viewer, player, opener and editor command lines
    pub launchers: Launchers,
    /// Local or SSH session details
    pub connection: ConnectionInfo,
}

impl RunContext {
    /// Build the context from configuration.
    #[must_use]
    pub fn new(config: Config, connection: ConnectionInfo) -> Self {
        let launchers = Launchers::from_config(&config);
        Self {
            config,
            cache: ScanCache::default(),
            launchers,
            connection,
        }
    }
}

/// The interactive terminal, held for the lifetime of the UI.
pub struct TerminalSession {
    terminal: CrosstermTerminal,
    active: bool,
}

impl TerminalSession {
    /// Take over the terminal.
    ///
    /// # Errors
    ///
    /// Returns [`TuiError::TerminalInit`] if raw mode or the alternate
    /// screen cannot be entered. The terminal is restored before returning.
    pub fn acquire() -> TuiResult<Self> {
        log::debug!("Setting up terminal for TUI");
        let setup = || -> io::Result<CrosstermTerminal> {
            enter_screen()?;
            CrosstermTerminal::new(CrosstermBackend::new(io::stdout()))
        };
        match setup() {
            Ok(terminal) => {
                log::debug!("Terminal setup complete");
                Ok(Self {
                    terminal,
                    active: true,
                })
            }
            Err(e) => {
                restore_terminal();
                Err(TuiError::TerminalInit(e))
            }
        }
    }

    /// The ratatui terminal.
    pub fn terminal(&mut self) -> &mut CrosstermTerminal {
        &mut self.terminal
    }

    /// Hand the real terminal back to the shell.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal state cannot be changed.
    pub fn suspend(&mut self) -> TuiResult<()> {
        if self.active {
            log::debug!("Suspending terminal");
            terminal::disable_raw_mode()?;
            execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
            self.active = false;
        }
        Ok(())
    }

    /// Take the terminal back after [`suspend`](Self::suspend) and repaint from scratch.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal state cannot be changed.
    pub fn resume(&mut self) -> TuiResult<()> {
        if !self.active {
            log::debug!("Resuming terminal");
            enter_screen()?;
            self.terminal.clear()?;
            self.active = true;
        }
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.active {
            restore_terminal();
        }
    }
}

fn enter_screen() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)
}

/// Restore the terminal to its original state.
fn restore_terminal() {
    log::debug!("Restoring terminal");
    let _ = terminal::disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

/// Run the interactive TUI until the user quits.
///
/// The terminal is always restored, including on error or panic.
///
/// # Errors
///
/// Returns [`TuiError::TerminalInit`] if the terminal cannot be taken over,
/// and [`TuiError::Io`] / [`TuiError::Event`] for failures while running.
pub fn run_tui(app: &mut App, context: &RunContext) -> TuiResult<()> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    let result =
        TerminalSession::acquire().and_then(|mut session| run_loop(app, context, &mut session));

    let _ = panic::take_hook();
    result
}

fn run_loop(app: &mut App, context: &RunContext, session: &mut TerminalSession) -> TuiResult<()> {
    let events = EventHandler::new();

    let theme = *app.theme();
    session.terminal().draw(|frame| render_splash(frame, &theme))?;
    events.pause(SPLASH_DURATION)?;

    while !app.should_quit() {
        app.refresh();
        let size = session.terminal().size()?;
        app.set_viewport_height(list_height(size.height));
        session.terminal().draw(|frame| render(frame, app))?;

        let Event::Key(key) = events.next()? else {
            continue;
        };
        let effect = app.handle_key(key);
        perform_effect(app, effect, context, session, &events)?;
    }

    log::info!("TUI exited normally");
    Ok(())
}

fn perform_effect(
    app: &mut App,
    effect: Effect,
    context: &RunContext,
    session: &mut TerminalSession,
    events: &EventHandler,
) -> TuiResult<()> {
    match effect {
        Effect::None => {}
        Effect::Scan { directory, kind } => {
            let result = run_scan(app.theme(), &directory, kind, context, session, events)?;
            app.finish_scan(&directory, result);
        }
        Effect::Open(path) => open_path(app, &path, context, session, events)?,
        Effect::Delete(target) => {
            match perform_deletion(app, &target, &context.cache, context.config.delete_mode) {
                Ok(_) => app.set_status("File removed."),
                Err(e) if e.is_silent() => log::debug!("Ignored delete: {}", e),
                Err(e) => app.set_error(&format!("Delete failed: {e}")),
            }
        }
    }
    Ok(())
}

/// Scan `directory` through the cache.
///
/// Backends that write to the real terminal get it for the duration of the
/// scan; the others report progress on the TUI screen. A cache hit never
/// touches the screen.
fn run_scan(
    theme: &Theme,
    directory: &Path,
    kind: BackendKind,
    context: &RunContext,
    session: &mut TerminalSession,
    events: &EventHandler,
) -> TuiResult<Result<ScanOutcome, ScanError>> {
    let backend = backend_for(kind, &context.config);
    let takeover = backend.takes_over_terminal();
    let mut suspended = false;

    let result = context
        .cache
        .get_or_scan(directory, kind.cache_file_name(), |dir| {
            if takeover {
                session
                    .suspend()
                    .map_err(|e| ScanError::Failed(format!("cannot release terminal: {e}")))?;
                suspended = true;
                backend.scan(dir, &mut ConsoleProgress)
            } else {
                let mut progress = ScreenProgress::new(session.terminal(), *theme, dir);
                backend.scan(dir, &mut progress)
            }
        });

    if suspended {
        session.resume()?;
        events.drain()?;
    }
    Ok(result)
}

fn open_path(
    app: &mut App,
    path: &Path,
    context: &RunContext,
    session: &mut TerminalSession,
    events: &EventHandler,
) -> TuiResult<()> {
    let plan = match plan_open(path, &context.launchers, &context.connection) {
        Ok(plan) => plan,
        Err(e) => {
            app.set_error(&format!("Open failed: {e}"));
            return Ok(());
        }
    };

    match plan {
        OpenPlan::Detached(spec) => {
            if let Err(e) = launch_detached(&spec) {
                app.set_error(&format!("Open failed: {e}"));
            }
        }
        OpenPlan::Takeover(spec) => {
            session.suspend()?;
            let outcome = run_foreground(&spec);
            session.resume()?;
            events.drain()?;
            match outcome {
                Ok(status) if !status.success() => {
                    log::warn!("{} exited with {}", spec.program, status);
                }
                Ok(_) => {}
                Err(e) => app.set_error(&format!("Open failed: {e}")),
            }
        }
    }
    Ok(())
}

/// Delete a reviewed member, tombstone its line and drop the stale cache.
///
/// The cache is invalidated for the reviewed directory and for every
/// ancestor of the file. A tombstoned target fails with
/// [`DeleteError::AlreadyRemoved`] without touching the filesystem.
///
/// # Errors
///
/// Returns the [`DeleteError`] from the filesystem; the review and the
/// cache are unchanged in that case.
pub fn perform_deletion(
    app: &mut App,
    target: &ReviewTarget,
    cache: &ScanCache,
    mode: DeleteMode,
) -> Result<DeleteResult, DeleteError> {
    if target.tombstoned {
        return Err(DeleteError::AlreadyRemoved(target.path.clone()));
    }

    let result = delete_file(&target.path, mode)?;
    log::info!("Deleted {}", target.path.display());

    if let Some(review) = app.review_mut() {
        review.mark_deleted(target.line_index, &target.path);
        let base = review.base_directory().to_path_buf();
        cache.invalidate(&base);
    }
    // Recursive scans of any ancestor list the file too
    for directory in target.path.ancestors().skip(1) {
        cache.invalidate(directory);
    }
    Ok(result)
}

/// Progress printed straight to the real terminal while the screen is suspended.
struct ConsoleProgress;

impl ScanProgress for ConsoleProgress {
    fn message(&mut self, text: &str) {
        println!("{text}");
    }

    fn progress(&mut self, done: usize, total: usize) {
        let mut stdout = io::stdout();
        let _ = write!(stdout, "\rProcessed: {done}/{total}");
        let _ = stdout.flush();
    }
}

/// Progress drawn over the TUI screen, outside the normal redraw.
struct ScreenProgress<'a, B: Backend> {
    terminal: &'a mut ratatui::Terminal<B>,
    theme: Theme,
    status: ScanStatus,
}

impl<'a, B: Backend> ScreenProgress<'a, B> {
    fn new(terminal: &'a mut ratatui::Terminal<B>, theme: Theme, directory: &Path) -> Self {
        Self {
            terminal,
            theme,
            status: ScanStatus {
                directory: directory.display().to_string(),
                ..ScanStatus::default()
            },
        }
    }

    fn draw(&mut self) {
        let theme = self.theme;
        let status = &self.status;
        if let Err(e) = self
            .terminal
            .draw(|frame| render_scan_progress(frame, &theme, status))
        {
            log::warn!("Could not draw scan progress: {}", e);
        }
    }
}

impl<B: Backend> ScanProgress for ScreenProgress<'_, B> {
    fn message(&mut self, text: &str) {
        self.status.message = text.to_string();
        self.draw();
    }

    fn progress(&mut self, done: usize, total: usize) {
        self.status.done = done;
        self.status.total = total;
        self.draw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::DuplicateGroup;
    use ratatui::backend::TestBackend;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_tui_error_display() {
        let io_err = io::Error::other("test error");
        let tui_err = TuiError::Io(io_err);
        assert!(format!("{}", tui_err).contains("terminal I/O error"));

        let init = TuiError::TerminalInit(io::Error::other("not a tty"));
        assert!(init.to_string().contains("failed to initialize terminal"));
    }

    #[test]
    fn test_screen_progress_draws() {
        let mut terminal = ratatui::Terminal::new(TestBackend::new(60, 12)).unwrap();
        {
            let mut progress =
                ScreenProgress::new(&mut terminal, Theme::dark(), Path::new("/media"));
            progress.message("Hashing");
            progress.progress(25, 60);
            assert_eq!(progress.status.done, 25);
            assert_eq!(progress.status.message, "Hashing");
        }
        let rendered: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(rendered.contains("Processed: 25/60"));
    }

    #[test]
    fn test_run_context_launchers() {
        let context = RunContext::new(Config::default(), ConnectionInfo::local());
        assert_eq!(context.launchers.video_player, Config::default().video_player);
    }

    mod perform_deletion_tests {
        use super::*;

        fn reviewing(temp: &TempDir) -> App {
            let a = temp.path().join("a.jpg");
            let b = temp.path().join("b.jpg");
            fs::write(&a, "same").unwrap();
            fs::write(&b, "same").unwrap();
            let group = DuplicateGroup::new("1", vec![a, b]).unwrap();
            let mut app = App::new(temp.path());
            app.start_review(vec![group.clone()], temp.path());
            ScanCache::default()
                .store(temp.path(), BackendKind::Image.cache_file_name(), &[group])
                .unwrap();
            app
        }

        fn second_member(app: &App) -> ReviewTarget {
            let review = app.review().unwrap();
            let line_index = review.selectable_indices()[1];
            match &review.lines()[line_index] {
                crate::duplicates::ReviewLine::Member { path, .. } => ReviewTarget {
                    line_index,
                    path: path.clone(),
                    tombstoned: false,
                },
                other => panic!("unexpected line {other:?}"),
            }
        }

        #[test]
        fn test_delete_tombstones_and_invalidates() {
            let temp = TempDir::new().unwrap();
            let mut app = reviewing(&temp);
            let cache = ScanCache::default();
            let target = second_member(&app);
            let cache_file =
                ScanCache::cache_path(temp.path(), BackendKind::Image.cache_file_name());
            assert!(cache_file.exists());

            perform_deletion(&mut app, &target, &cache, DeleteMode::Permanent).unwrap();

            assert!(!target.path.exists());
            assert!(temp.path().join("a.jpg").exists());
            assert!(!cache_file.exists());
            let review = app.review().unwrap();
            assert_eq!(review.deleted_count(), 1);
            assert!(review.lines()[target.line_index].text().starts_with("--- DELETED: "));
        }

        #[test]
        fn test_tombstone_is_already_removed() {
            let temp = TempDir::new().unwrap();
            let mut app = reviewing(&temp);
            let cache = ScanCache::default();
            let mut target = second_member(&app);
            perform_deletion(&mut app, &target, &cache, DeleteMode::Permanent).unwrap();

            target.tombstoned = true;
            let err =
                perform_deletion(&mut app, &target, &cache, DeleteMode::Permanent).unwrap_err();
            assert!(matches!(err, DeleteError::AlreadyRemoved(_)));
            assert!(err.is_silent());
        }

        #[test]
        fn test_failed_delete_leaves_state() {
            let temp = TempDir::new().unwrap();
            let mut app = reviewing(&temp);
            let cache = ScanCache::default();
            let target = second_member(&app);
            fs::remove_file(&target.path).unwrap();

            let err =
                perform_deletion(&mut app, &target, &cache, DeleteMode::Permanent).unwrap_err();
            assert!(!err.is_silent());
            assert_eq!(app.review().unwrap().deleted_count(), 0);
            let cache_file =
                ScanCache::cache_path(temp.path(), BackendKind::Image.cache_file_name());
            assert!(cache_file.exists());
        }
    }
}
