//! Application state for the TUI.
//!
//! `App` owns the two components (a [`QueryRunner`] and a
//! [`DirectoryBrowser`]) plus presentation state such as focus, selection,
//! scroll offsets and the current toast. Key handling is synchronous: work
//! that needs the outside world (running a query, writing the clipboard) is
//! returned as an [`Action`] for the caller to perform.

use super::editor::EditorBuffer;
use super::results_view::ResultsView;
use super::widgets::spinner::Spinner;
use super::widgets::toast::ToastLevel;
use super::Event;
use crate::browser::{DirEntry, DirectoryBrowser, NavTarget};
use crate::db::QueryResult;
use crate::error::Result;
use crate::query::{PendingExecution, QueryRunner, RunStatus};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long a toast stays on screen.
const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Rows moved by PageUp/PageDown in the results pane.
const PAGE_SIZE: usize = 10;

/// Which panel currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    Explorer,
    Results,
}

impl Focus {
    /// Cycles to the next focus panel.
    pub fn next(self) -> Self {
        match self {
            Self::Editor => Self::Explorer,
            Self::Explorer => Self::Results,
            Self::Results => Self::Editor,
        }
    }

    /// Cycles to the previous focus panel.
    pub fn prev(self) -> Self {
        match self {
            Self::Editor => Self::Results,
            Self::Explorer => Self::Editor,
            Self::Results => Self::Explorer,
        }
    }
}

/// Work requested by a key press that the event loop must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Execute the editor contents.
    RunQuery,
    /// Put this path on the clipboard.
    CopyPath(PathBuf),
}

/// A row of the explorer sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplorerItem {
    Parent,
    Entry(DirEntry),
}

/// A temporary notification.
#[derive(Debug, Clone)]
pub struct ToastMessage {
    pub message: String,
    pub level: ToastLevel,
    expires_at: Instant,
}

impl ToastMessage {
    fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        Self {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_DURATION,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Main application state.
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    /// Current focus panel.
    pub focus: Focus,
    /// SQL editor contents.
    pub editor: EditorBuffer,
    pub runner: QueryRunner,
    pub browser: DirectoryBrowser,
    /// Highlighted explorer row, counting the `..` row when shown.
    pub explorer_selected: usize,
    /// Filter, sort and scroll of the results pane.
    pub results: ResultsView,
    /// Busy indicator, present while a query runs.
    pub spinner: Option<Spinner>,
    pub toast: Option<ToastMessage>,
    /// Last path successfully handed to the clipboard.
    pub last_copied: Option<PathBuf>,
    /// Engine name for the header.
    pub engine_name: &'static str,
}

impl App {
    /// Creates a new App with `query` in the editor and the explorer at `start_dir`.
    pub fn new(query: &str, start_dir: impl Into<PathBuf>, engine_name: &'static str) -> Self {
        let mut app = Self {
            running: true,
            focus: Focus::default(),
            editor: EditorBuffer::new(query),
            runner: QueryRunner::new(query),
            browser: DirectoryBrowser::new(start_dir),
            explorer_selected: 0,
            results: ResultsView::default(),
            spinner: None,
            toast: None,
            last_copied: None,
            engine_name,
        };
        app.refresh_listing();
        app
    }

    /// Shows a toast, replacing the current one.
    pub fn show_toast(&mut self, message: impl Into<String>, level: ToastLevel) {
        self.toast = Some(ToastMessage::new(message, level));
    }

    /// Drops the toast once it has expired.
    pub fn clear_expired_toast(&mut self) {
        if self.toast.as_ref().is_some_and(ToastMessage::is_expired) {
            self.toast = None;
        }
    }

    /// Brings the explorer listing up to date and surfaces listing failures.
    pub fn refresh_listing(&mut self) {
        // A failed read resets the browser, so list a second time to show the
        // initial directory. The second call is cached when nothing changed.
        for _ in 0..2 {
            self.browser.list();
            match self.browser.take_notice() {
                Some(notice) => {
                    self.explorer_selected = 0;
                    self.show_toast(notice, ToastLevel::Warning);
                }
                None => break,
            }
        }
        self.explorer_selected = self
            .explorer_selected
            .min(self.explorer_len().saturating_sub(1));
    }

    /// Number of rows in the explorer, including `..`.
    pub fn explorer_len(&self) -> usize {
        usize::from(self.browser.has_parent()) + self.browser.cached_listing().len()
    }

    /// The explorer row under the selection.
    pub fn selected_item(&self) -> Option<ExplorerItem> {
        let mut index = self.explorer_selected;
        if self.browser.has_parent() {
            if index == 0 {
                return Some(ExplorerItem::Parent);
            }
            index -= 1;
        }
        self.browser
            .cached_listing()
            .get(index)
            .cloned()
            .map(ExplorerItem::Entry)
    }

    /// Handles an event and updates application state.
    pub fn handle_event(&mut self, event: Event) -> Option<Action> {
        let action = match event {
            Event::Key(key) => self.handle_key(key),
            Event::Tick => {
                self.clear_expired_toast();
                None
            }
            Event::Resize(_, _) => None,
        };
        self.refresh_listing();
        action
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.running = false;
                None
            }
            KeyCode::Char('r') if ctrl => Some(Action::RunQuery),
            KeyCode::F(5) => Some(Action::RunQuery),
            KeyCode::Tab => {
                self.focus = self.focus.next();
                None
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                None
            }
            _ => match self.focus {
                Focus::Editor => {
                    self.handle_editor_key(key);
                    None
                }
                Focus::Explorer => self.handle_explorer_key(key),
                Focus::Results => {
                    self.handle_results_key(key);
                    None
                }
            },
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let word = ctrl || alt;

        match key.code {
            KeyCode::Char('w') if ctrl && !alt => self.editor.delete_word_backward(),
            // AltGr arrives as Ctrl+Alt and still produces text
            KeyCode::Char(_) if word && !(ctrl && alt) => return,
            KeyCode::Char(c) => self.editor.insert(c),
            KeyCode::Enter => self.editor.newline(),
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Delete => self.editor.delete(),
            KeyCode::Left if word => self.editor.move_word_left(),
            KeyCode::Right if word => self.editor.move_word_right(),
            KeyCode::Left => self.editor.move_left(),
            KeyCode::Right => self.editor.move_right(),
            KeyCode::Up => self.editor.move_up(),
            KeyCode::Down => self.editor.move_down(),
            KeyCode::Home => self.editor.move_home(),
            KeyCode::End => self.editor.move_end(),
            _ => return,
        }
        self.sync_query();
    }

    /// Inserts text into the editor as if typed.
    pub fn type_text(&mut self, text: &str) {
        self.editor.insert_str(text);
        self.sync_query();
    }

    fn sync_query(&mut self) {
        self.runner.set_query(self.editor.text());
    }

    fn handle_explorer_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.explorer_selected = self.explorer_selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.explorer_selected + 1 < self.explorer_len() {
                    self.explorer_selected += 1;
                }
            }
            KeyCode::Home => self.explorer_selected = 0,
            KeyCode::End => self.explorer_selected = self.explorer_len().saturating_sub(1),
            KeyCode::Enter => self.open_selected(),
            KeyCode::Backspace => self.navigate(&NavTarget::Parent),
            KeyCode::Char('r') => {
                self.browser.force_refresh();
                self.show_toast("Refreshed", ToastLevel::Info);
            }
            KeyCode::Char('y') | KeyCode::Char('c') => return self.copy_selected(),
            _ => {}
        }
        None
    }

    /// Opens the selected directory or `..`.
    pub fn open_selected(&mut self) {
        match self.selected_item() {
            Some(ExplorerItem::Parent) => self.navigate(&NavTarget::Parent),
            Some(ExplorerItem::Entry(entry)) if entry.is_dir => {
                self.navigate(&NavTarget::Child(entry.name))
            }
            Some(ExplorerItem::Entry(entry)) => {
                let path = self.browser.resolve_entry_path(&entry.name);
                self.show_toast(
                    format!("{} (press y to copy)", path.display()),
                    ToastLevel::Info,
                );
            }
            None => {}
        }
    }

    /// Changes directory, reporting failures as a toast.
    pub fn navigate(&mut self, target: &NavTarget) {
        match self.browser.change_directory(target) {
            Ok(path) => {
                debug!("Explorer now at {}", path.display());
                self.explorer_selected = 0;
            }
            Err(e) => {
                warn!("Navigation to {} failed: {}", target, e);
                self.show_toast(e.detail(), ToastLevel::Warning);
            }
        }
    }

    fn copy_selected(&mut self) -> Option<Action> {
        match self.selected_item() {
            Some(ExplorerItem::Entry(entry)) => Some(Action::CopyPath(
                self.browser.resolve_entry_path(&entry.name),
            )),
            _ => {
                self.show_toast("Select a file or directory to copy", ToastLevel::Info);
                None
            }
        }
    }

    /// Records the outcome of a clipboard copy.
    pub fn record_copy(&mut self, path: PathBuf, outcome: Result<()>) {
        match outcome {
            Ok(()) => {
                info!("Copied {} to clipboard", path.display());
                self.show_toast(format!("Copied {}", path.display()), ToastLevel::Info);
                self.last_copied = Some(path);
            }
            Err(e) => {
                warn!("Clipboard copy failed: {}", e);
                self.show_toast(e.to_string(), ToastLevel::Warning);
            }
        }
    }

    /// Number of result rows passing the current filter.
    pub fn visible_row_count(&self) -> usize {
        self.results.visible_rows(self.runner.result()).len()
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        if self.results.is_editing() {
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                KeyCode::Char(c) if !ctrl => self.results.push_filter(c),
                KeyCode::Backspace => self.results.pop_filter(),
                KeyCode::Enter => self.results.finish_filter(),
                KeyCode::Esc => self.results.clear_filter(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('/') => {
                self.results.start_filter();
                return;
            }
            KeyCode::Esc => {
                self.results.clear_filter();
                return;
            }
            KeyCode::Char('s') => {
                let columns = self.runner.result().column_count();
                self.results.cycle_sort(columns);
                return;
            }
            _ => {}
        }

        let scroll = self.results.scroll;
        let last = self.visible_row_count().saturating_sub(1);
        self.results.scroll = match key.code {
            KeyCode::Up => scroll.saturating_sub(1),
            KeyCode::Down => scroll + 1,
            KeyCode::PageUp => scroll.saturating_sub(PAGE_SIZE),
            KeyCode::PageDown => scroll + PAGE_SIZE,
            KeyCode::Home => 0,
            KeyCode::End => last,
            _ => return,
        }
        .min(last);
    }

    /// Starts executing the editor contents.
    ///
    /// Returns `None` and shows a toast if a query is already running.
    pub fn start_query(&mut self) -> Option<PendingExecution> {
        self.sync_query();
        match self.runner.begin() {
            Ok(pending) => {
                self.spinner = Some(Spinner::executing());
                Some(pending)
            }
            Err(e) => {
                self.show_toast(e.to_string(), ToastLevel::Warning);
                None
            }
        }
    }

    /// Applies the outcome of a query started with [`start_query`](Self::start_query).
    pub fn complete_query(
        &mut self,
        pending: &PendingExecution,
        outcome: Result<QueryResult>,
    ) -> RunStatus {
        let status = self.runner.finish(pending, outcome);
        if !self.runner.is_busy() {
            self.spinner = None;
        }
        if status != RunStatus::Rejected {
            self.results = ResultsView::default();
        }
        status
    }
}
