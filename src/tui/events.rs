//! Event handling for the TUI.
//!
//! Processes keyboard and terminal events using crossterm.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// A periodic tick (for animations/updates).
    Tick,
}

/// Polls terminal events on a fixed tick.
#[derive(Debug, Clone, Copy)]
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
        }
    }

    pub fn with_tick_rate(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Blocks up to one tick for the next event.
    ///
    /// Read errors and uninteresting events collapse into [`Event::Tick`], so
    /// the caller still redraws the spinner.
    pub fn next(&self) -> Event {
        match event::poll(self.tick_rate) {
            Ok(true) => match event::read() {
                Ok(CrosstermEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    Event::Key(key)
                }
                Ok(CrosstermEvent::Resize(width, height)) => Event::Resize(width, height),
                _ => Event::Tick,
            },
            _ => Event::Tick,
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
