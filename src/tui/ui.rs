//! TUI layout and rendering with ratatui.
//!
//! # Overview
//!
//! Rendering is a pure function of [`App`] state:
//! - Header with the connection banner and the current location
//! - The browser listing or the duplicate review list
//! - Footer with key hints and the version
//! - Popups for the status message, open menu, or yes/no prompt
//!
//! Lists are drawn from their own scroll offset, so what is on screen is
//! exactly `entries[scroll_offset..scroll_offset + list_height]`.
//!
//! # Example
//!
//! ```no_run
//! use dupbrowse::tui::app::App;
//! use dupbrowse::tui::ui::render;
//! use ratatui::Frame;
//!
//! fn draw(frame: &mut Frame, app: &App) {
//!     render(frame, app);
//! }
//! ```

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use super::app::{Action, App, AppMode, MenuAction};
use super::theme::Theme;
use crate::actions::menu::{Menu, Modal};
use crate::browser::{DirectoryEntry, EntryKind};
use crate::duplicates::{ReviewLine, ReviewState, IDLE_MARKER, SELECTED_MARKER};

/// Rows taken by the header block.
const HEADER_HEIGHT: u16 = 3;
/// Rows taken by the footer block.
const FOOTER_HEIGHT: u16 = 3;
/// Top and bottom border of the list block.
const LIST_BORDER_ROWS: u16 = 2;

/// Number of list rows visible in a terminal `area_height` rows tall.
#[must_use]
pub fn list_height(area_height: u16) -> usize {
    usize::from(
        area_height
            .saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT + LIST_BORDER_ROWS)
            .max(1),
    )
}

/// Render the TUI based on current application state.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    match (app.mode(), app.review()) {
        (AppMode::Reviewing, Some(review)) => render_review(frame, app.theme(), review, chunks[1]),
        _ => render_browser(frame, app, chunks[1]),
    }
    render_footer(frame, app, chunks[2]);

    match app.modal() {
        Modal::Idle => {}
        Modal::MenuOpen(menu) => render_menu_dialog(frame, app.theme(), menu, area),
        Modal::Confirming(confirm) => {
            render_confirm_dialog(frame, app.theme(), &confirm.message, area);
        }
    }

    if let Some(message) = app.status() {
        render_status_dialog(frame, app.theme(), message, area);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let location = match (app.mode(), app.review()) {
        (AppMode::Reviewing, Some(review)) => format!(
            "Duplicates in {} ({} groups, {} deleted)",
            review.base_directory().display(),
            review.groups().len(),
            review.deleted_count()
        ),
        _ => {
            let hidden = if app.nav().show_hidden() {
                " [hidden shown]"
            } else {
                ""
            };
            format!("{}{hidden}", app.nav().current_path().display())
        }
    };

    let banner_width = app.banner().chars().count() + 1;
    let room = usize::from(area.width.saturating_sub(2)).saturating_sub(banner_width);
    let header = Paragraph::new(Line::from(vec![
        Span::styled(app.banner().to_string(), theme.highlight()),
        Span::raw(" "),
        Span::styled(truncate_front(&location, room), theme.text()),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(theme.text()));

    frame.render_widget(header, area);
}

fn entry_label(entry: &DirectoryEntry) -> String {
    match entry.kind {
        EntryKind::Directory => format!("{}/", entry.name),
        _ => entry.name.clone(),
    }
}

fn marker(selected: bool) -> &'static str {
    if selected {
        SELECTED_MARKER
    } else {
        IDLE_MARKER
    }
}

fn selected_style(style: Style, selected: bool) -> Style {
    if selected {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}

fn render_browser(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let nav = app.nav();
    let height = usize::from(area.height.saturating_sub(LIST_BORDER_ROWS));

    let lines: Vec<Line> = nav
        .entries()
        .iter()
        .enumerate()
        .skip(nav.scroll_offset())
        .take(height)
        .map(|(index, entry)| {
            let selected = index == nav.selection_index();
            let style = match entry.kind {
                EntryKind::Unreadable => Style::default().fg(theme.danger),
                EntryKind::Directory | EntryKind::Parent => {
                    theme.text().add_modifier(Modifier::BOLD)
                }
                EntryKind::File => theme.text(),
            };
            Line::from(Span::styled(
                format!("{}{}", marker(selected), entry_label(entry)),
                selected_style(style, selected),
            ))
        })
        .collect();

    let list = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).border_style(theme.text()));
    frame.render_widget(list, area);
}

/// Spans for one review line, split at the divergence point when it has one.
#[must_use]
pub fn review_line_spans(
    theme: &Theme,
    review: &ReviewState,
    line: &ReviewLine,
    selected: bool,
) -> Vec<Span<'static>> {
    let full = format!("{}{}", marker(selected), line.text());
    let base = match line {
        ReviewLine::Header { .. } => theme.text().add_modifier(Modifier::BOLD),
        ReviewLine::Member {
            tombstoned: true, ..
        } => theme.tombstone(),
        ReviewLine::Member { .. } | ReviewLine::Separator => theme.text(),
    };

    let split = review
        .split_for(line)
        .filter(|&at| at < full.len() && full.is_char_boundary(at));
    match split {
        Some(at) => {
            let (head, tail) = full.split_at(at);
            vec![
                Span::styled(head.to_string(), selected_style(base, selected)),
                Span::styled(tail.to_string(), selected_style(theme.highlight(), selected)),
            ]
        }
        None => vec![Span::styled(full, selected_style(base, selected))],
    }
}

fn render_review(frame: &mut Frame, theme: &Theme, review: &ReviewState, area: Rect) {
    let height = usize::from(area.height.saturating_sub(LIST_BORDER_ROWS));
    let selected = review.selected_line_index();

    let lines: Vec<Line> = review
        .lines()
        .iter()
        .enumerate()
        .skip(review.scroll_offset())
        .take(height)
        .map(|(index, line)| {
            Line::from(review_line_spans(theme, review, line, Some(index) == selected))
        })
        .collect();

    let list = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).border_style(theme.text()));
    frame.render_widget(list, area);
}

fn footer_commands(app: &App) -> Vec<(String, &'static str)> {
    let b = app.bindings();
    match app.mode() {
        AppMode::Browsing => vec![
            (b.hint(Action::Activate), "Menu"),
            (b.hint(Action::Enter), "Open"),
            (b.hint(Action::Parent), "Up"),
            (b.hint(Action::GoTo), "Go To"),
            (b.hint(Action::GoBack), "Back"),
            (b.hint(Action::ToggleHidden), "Hidden"),
            (b.hint(Action::Quit), "Quit"),
        ],
        AppMode::Reviewing => vec![
            (format!("{}/{}", b.hint(Action::NavigateDown), b.hint(Action::NavigateUp)), "Move"),
            (b.hint(Action::Activate), "Action"),
            (b.hint(Action::Quit), "Back"),
        ],
        AppMode::Quitting => Vec::new(),
    }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let mut spans: Vec<Span> = footer_commands(app)
        .into_iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(format!("[{key}]"), theme.highlight()),
                Span::styled(format!("{desc} "), theme.text()),
            ]
        })
        .collect();
    spans.push(Span::styled(
        format!(" v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(theme.dim),
    ));

    let footer = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.dim)),
        );
    frame.render_widget(footer, area);
}

fn render_menu_dialog(frame: &mut Frame, theme: &Theme, menu: &Menu<MenuAction>, area: Rect) {
    // title, blank line, options, two borders
    let rows = u16::try_from(menu.options().len() + 4).unwrap_or(u16::MAX);
    let dialog_area = centered_rows(50, rows, area);
    frame.render_widget(Clear, dialog_area);

    let mut lines = vec![
        Line::from(Span::styled(
            menu.title.clone(),
            theme.text().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(
        menu.options()
            .iter()
            .map(|o| Line::from(Span::styled(o.display(), theme.text()))),
    );

    let dialog = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.highlight()),
    );
    frame.render_widget(dialog, dialog_area);
}

fn render_confirm_dialog(frame: &mut Frame, theme: &Theme, message: &str, area: Rect) {
    let dialog_area = centered_rect(50, 25, area);
    frame.render_widget(Clear, dialog_area);

    let dialog = Paragraph::new(vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default()
                .fg(theme.danger)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("[y] Yes    [n] No", theme.text())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Confirm")
            .border_style(Style::default().fg(theme.danger)),
    );
    frame.render_widget(dialog, dialog_area);
}

fn render_status_dialog(frame: &mut Frame, theme: &Theme, message: &str, area: Rect) {
    let dialog_area = centered_rect(60, 25, area);
    frame.render_widget(Clear, dialog_area);

    let dialog = Paragraph::new(vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(theme.normal))),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().fg(theme.dim),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.text()),
    );
    frame.render_widget(dialog, dialog_area);
}

/// What a running scan has reported so far.
#[derive(Debug, Clone, Default)]
pub struct ScanStatus {
    /// Directory being scanned
    pub directory: String,
    /// Latest free-form message
    pub message: String,
    /// Items processed
    pub done: usize,
    /// Items to process (0 if unknown)
    pub total: usize,
}

impl ScanStatus {
    /// Progress percentage (0-100).
    #[must_use]
    pub fn percentage(&self) -> u16 {
        if self.total == 0 {
            0
        } else {
            ((self.done as f64 / self.total as f64) * 100.0).min(100.0) as u16
        }
    }
}

/// Draw scan progress over the whole screen.
pub fn render_scan_progress(frame: &mut Frame, theme: &Theme, status: &ScanStatus) {
    let area = frame.area();
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Scanning ")
        .border_style(theme.text());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let directory = Paragraph::new(truncate_front(
        &status.directory,
        usize::from(chunks[0].width),
    ))
    .style(theme.text())
    .alignment(Alignment::Center);
    frame.render_widget(directory, chunks[0]);

    if status.total > 0 {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(theme.primary).bg(theme.dim))
            .percent(status.percentage())
            .label(format!("Processed: {}/{}", status.done, status.total));
        frame.render_widget(gauge, chunks[2]);
    }

    if !status.message.is_empty() {
        let message = Paragraph::new(status.message.clone())
            .style(Style::default().fg(theme.dim))
            .alignment(Alignment::Center);
        frame.render_widget(message, chunks[3]);
    }
}

/// Title and version in a box, shown once at startup.
pub fn render_splash(frame: &mut Frame, theme: &Theme) {
    let area = frame.area();
    frame.render_widget(Clear, area);

    let title = "DUPBROWSE";
    let version = format!("Version {}", env!("CARGO_PKG_VERSION"));
    let width = u16::try_from(version.len().max(title.len()) + 8).unwrap_or(u16::MAX);
    let height = 5;
    let rect = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width.min(area.width),
        height.min(area.height),
    );

    let style = theme.text().add_modifier(Modifier::BOLD);
    let text = Text::from(vec![Line::from(title), Line::from(""), Line::from(version)]);
    let splash = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(style));
    frame.render_widget(splash, rect);
}

// ==================== Helper Functions ====================

/// Keep the end of `text`, replacing the front with `...` when it is too long.
///
/// Works on characters, so multi-byte names are never split.
///
/// # Examples
///
/// ```
/// use dupbrowse::tui::ui::truncate_front;
///
/// assert_eq!(truncate_front("/home/user", 20), "/home/user");
/// assert_eq!(truncate_front("/very/long/path/file.jpg", 12), ".../file.jpg");
/// ```
#[must_use]
pub fn truncate_front(text: &str, max_len: usize) -> String {
    let count = text.chars().count();
    if count <= max_len {
        return text.to_string();
    }
    if max_len <= 3 {
        return ".".repeat(max_len);
    }
    let keep = max_len - 3;
    let tail: String = text.chars().skip(count - keep).collect();
    format!("...{tail}")
}

/// Create a centered rectangle with given percentage of parent.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A rectangle `rows` tall, `percent_x` wide, centered in `area`.
fn centered_rows(percent_x: u16, rows: u16, area: Rect) -> Rect {
    let rows = rows.min(area.height);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height - rows) / 2),
            Constraint::Length(rows),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
