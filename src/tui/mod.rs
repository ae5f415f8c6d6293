//! Terminal User Interface for the MySQL client.
//!
//! Provides the main TUI application loop using ratatui and crossterm.
//! Tool invocations run on a spawned task and report back over a channel,
//! so the screen keeps redrawing while `mysql` or `mysqldump` works.

pub mod app;
mod events;
pub mod text;
mod ui;
pub mod widgets;

pub use app::App;
pub use events::{Event, EventHandler};

use crate::error::{AppError, Result};
use crate::session::Session;
use app::{Request, TaskResult};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Messages sent from background tasks to the main loop.
#[derive(Debug)]
pub enum AsyncMessage {
    /// A tool invocation finished.
    Finished(TaskResult),
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
        Ok(Self {
            terminal,
            event_handler: EventHandler::new(),
        })
    }

    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode().map_err(|e| AppError::io(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| AppError::io(format!("Failed to enter alternate screen: {e}")))?;

        Terminal::new(CrosstermBackend::new(stdout))
            .map_err(|e| AppError::io(format!("Failed to create terminal: {e}")))
    }

    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode().map_err(|e| AppError::io(format!("Failed to disable raw mode: {e}")))?;

        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| AppError::io(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| AppError::io(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the event loop until the user quits.
    pub async fn run(&mut self, session: Session) -> Result<()> {
        // Restore the terminal before the default hook prints the panic.
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        let mut app_state = App::new(session);
        let (tx, mut rx) = mpsc::channel::<AsyncMessage>(8);

        let result = self.run_event_loop(&mut app_state, tx, &mut rx).await;

        let _ = panic::take_hook();
        result
    }

    async fn run_event_loop(
        &mut self,
        app_state: &mut App,
        tx: mpsc::Sender<AsyncMessage>,
        rx: &mut mpsc::Receiver<AsyncMessage>,
    ) -> Result<()> {
        loop {
            self.terminal
                .draw(|frame| ui::render(frame, app_state))
                .map_err(|e| AppError::io(format!("Failed to draw: {e}")))?;

            if !app_state.running {
                break;
            }

            let handler = self.event_handler;
            tokio::select! {
                event = tokio::task::spawn_blocking(move || handler.next()) => {
                    if let Ok(Event::Key(key)) = event {
                        if let Some(request) = app_state.handle_key(key) {
                            Self::spawn_request(app_state, request, tx.clone());
                        }
                    }
                }

                Some(msg) = rx.recv() => {
                    match msg {
                        AsyncMessage::Finished(result) => app_state.finish(result),
                    }
                }
            }
        }

        if let Some(action) = app_state.busy {
            info!("Quitting while {:?} is running; the child process is killed", action);
        }
        Ok(())
    }

    /// Runs a request on its own task. Dropping the task on exit drops the
    /// child handle, which kills the process.
    fn spawn_request(app_state: &App, request: Request, tx: mpsc::Sender<AsyncMessage>) {
        let cli = app_state.session.cli();
        debug!("Spawning {:?}", request.action());
        tokio::spawn(async move {
            let result = request.execute(cli).await;
            let _ = tx.send(AsyncMessage::Finished(result)).await;
        });
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the TUI application.
pub async fn run(session: Session) -> Result<()> {
    let mut tui = Tui::new()?;
    tui.run(session).await
}
