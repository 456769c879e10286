//! Terminal board for quadrant.
//!
//! An interactive four-quadrant view where mouse gestures drive the same
//! recognizer the touch surface uses: hold a card to lift it, drag it onto
//! a quadrant to move it, swipe horizontally to delete it. Built with
//! ratatui and crossterm.

pub mod app;
mod event;
mod ui;

pub use app::App;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::config::Config;
use crate::error::QuadrantError;

/// Run the board.
///
/// # Errors
///
/// Returns an error if the terminal fails to initialize or storage cannot
/// be opened.
pub fn run(config: &Config) -> Result<(), QuadrantError> {
    enable_raw_mode()
        .map_err(|e| QuadrantError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| QuadrantError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| QuadrantError::Terminal(format!("Failed to create terminal: {e}")))?;

    let mut app = App::new(config)?;
    let tick = Duration::from_millis(config.board.tick_ms);
    let result = run_app(&mut terminal, &mut app, tick);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    result
}

/// Run the main application loop.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick: Duration,
) -> Result<(), QuadrantError> {
    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| QuadrantError::Terminal(format!("Failed to draw: {e}")))?;

        if event::handle_events(app, tick)? {
            break;
        }
    }

    Ok(())
}
