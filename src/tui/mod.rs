//! Terminal User Interface for scratchsql.
//!
//! Provides the main TUI application loop using ratatui and crossterm. Queries
//! run on a tokio task and report back over a channel, so the spinner keeps
//! animating while the engine works.

pub mod app;
mod clipboard;
pub mod editor;
mod events;
pub mod headless;
pub mod results_view;
mod ui;
pub mod widgets;

pub use app::{Action, App, Focus};
pub use events::{Event, EventHandler};

use crate::db::{QueryResult, SqlEngine};
use crate::error::{ScratchError, Result};
use crate::query::{PendingExecution, RunStatus};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Messages sent from background tasks to the main loop.
#[derive(Debug)]
pub enum AsyncMessage {
    /// A query task finished.
    QueryFinished(PendingExecution, Result<QueryResult>),
}

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;

        // Non-fatal: copies will report the failure when attempted
        match clipboard::init() {
            Ok(backend) => debug!("Clipboard backend: {:?}", backend),
            Err(e) => warn!("Failed to initialize clipboard: {}", e),
        }

        Ok(Self {
            terminal,
            event_handler: EventHandler::new(),
        })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| ScratchError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| {
            ScratchError::internal(format!("Failed to enter alternate screen: {e}"))
        })?;

        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
            .map_err(|e| ScratchError::internal(format!("Failed to create terminal: {e}")))
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| ScratchError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(self.terminal.backend_mut(), LeaveAlternateScreen).map_err(|e| {
            ScratchError::internal(format!("Failed to leave alternate screen: {e}"))
        })?;

        self.terminal
            .show_cursor()
            .map_err(|e| ScratchError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the main event loop until the user quits.
    pub async fn run(&mut self, mut app: App, engine: Arc<dyn SqlEngine>) -> Result<()> {
        let _panic_guard = install_panic_hook(|| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        });

        let (tx, rx) = mpsc::channel::<AsyncMessage>(8);
        self.run_event_loop(&mut app, engine, tx, rx).await
    }

    /// The main event loop, separated for cleaner error handling.
    async fn run_event_loop(
        &mut self,
        app: &mut App,
        engine: Arc<dyn SqlEngine>,
        tx: mpsc::Sender<AsyncMessage>,
        mut rx: mpsc::Receiver<AsyncMessage>,
    ) -> Result<()> {
        // Kept across iterations so an event read while a message wins the
        // select is not lost.
        let mut input_task: Option<JoinHandle<Result<Event>>> = None;

        while app.running {
            self.terminal
                .draw(|frame| ui::render(frame, app))
                .map_err(|e| ScratchError::internal(format!("Failed to draw: {e}")))?;

            let handler = self.event_handler;
            let task = input_task
                .get_or_insert_with(|| tokio::task::spawn_blocking(move || handler.next()));

            tokio::select! {
                joined = task => {
                    input_task = None;
                    let event = joined
                        .map_err(|e| ScratchError::internal(format!("Event task failed: {e}")))??;
                    if let Some(action) = app.handle_event(event) {
                        Self::perform(action, app, &engine, &tx);
                    }
                }

                Some(msg) = rx.recv() => {
                    Self::handle_async_message(msg, app);
                }
            }
        }

        Ok(())
    }

    /// Carries out an action requested by a key press.
    fn perform(
        action: Action,
        app: &mut App,
        engine: &Arc<dyn SqlEngine>,
        tx: &mpsc::Sender<AsyncMessage>,
    ) {
        match action {
            Action::RunQuery => {
                if let Some(pending) = app.start_query() {
                    info!("Running query #{}", pending.ticket());
                    spawn_query(pending, Arc::clone(engine), tx.clone());
                }
            }
            Action::CopyPath(path) => {
                let outcome = copy_path(&path);
                app.record_copy(path, outcome);
            }
        }
    }

    /// Handles a message from a background task.
    fn handle_async_message(msg: AsyncMessage, app: &mut App) {
        match msg {
            AsyncMessage::QueryFinished(pending, outcome) => {
                let status = app.complete_query(&pending, outcome);
                if status == RunStatus::Rejected {
                    warn!("Ignored stale result of query #{}", pending.ticket());
                }
            }
        }
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Puts the previous panic hook back when dropped.
struct PanicHookGuard {
    restore: Option<Box<dyn FnOnce()>>,
}

impl Drop for PanicHookGuard {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

/// Chains `on_panic` in front of the current panic hook until the guard drops.
///
/// Used to restore the terminal before the panic message is printed.
fn install_panic_hook(on_panic: fn()) -> PanicHookGuard {
    let original = Arc::new(panic::take_hook());
    let chained = Arc::clone(&original);
    panic::set_hook(Box::new(move |panic_info| {
        on_panic();
        chained(panic_info);
    }));

    PanicHookGuard {
        restore: Some(Box::new(move || {
            panic::set_hook(Box::new(move |panic_info| original(panic_info)));
        })),
    }
}

/// Runs `pending` on a tokio task and reports the outcome on `tx`.
fn spawn_query(
    pending: PendingExecution,
    engine: Arc<dyn SqlEngine>,
    tx: mpsc::Sender<AsyncMessage>,
) {
    tokio::spawn(async move {
        let outcome = pending.run(engine.as_ref()).await;
        if tx
            .send(AsyncMessage::QueryFinished(pending, outcome))
            .await
            .is_err()
        {
            debug!("UI closed before the query finished");
        }
    });
}

fn copy_path(path: &Path) -> Result<()> {
    clipboard::copy(&path.display().to_string())
        .map_err(|e| ScratchError::clipboard(e.to_string()))
}

/// Runs the interactive TUI.
pub async fn run(app: App, engine: Arc<dyn SqlEngine>) -> Result<()> {
    let mut tui = Tui::new()?;
    tui.run(app, engine).await
}
