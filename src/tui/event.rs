//! Event handling for the terminal board.
//!
//! Mouse events feed the gesture recognizer's touch path: press starts the
//! long-press timer, drag is pointer movement, release commits. Keys cover
//! the non-gesture affordances (connectivity toggle, manual sync, retry).

use std::time::Duration;

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyModifiers, MouseButton, MouseEventKind};

use crate::core::Point;
use crate::error::QuadrantError;
use crate::tui::app::App;

/// Handle terminal events for one loop iteration.
///
/// Returns true when the application should quit.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events(app: &mut App, tick: Duration) -> Result<bool, QuadrantError> {
    if event::poll(tick).map_err(|e| QuadrantError::Terminal(format!("Event poll failed: {e}")))? {
        match event::read()
            .map_err(|e| QuadrantError::Terminal(format!("Event read failed: {e}")))?
        {
            Event::Key(key) => {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    return Ok(true);
                }

                match key.code {
                    KeyCode::Char('q') => return Ok(true),
                    KeyCode::Esc => app.cancel_gesture(),
                    KeyCode::Char('o') => app.toggle_network(Utc::now()),
                    KeyCode::Char('s') => app.sync_now(Utc::now()),
                    KeyCode::Char('f') => app.retry_failed(Utc::now()),
                    KeyCode::Char('r') => app.refresh()?,
                    _ => {}
                }
            }
            Event::Mouse(mouse) => {
                let point = Point::new(f64::from(mouse.column), f64::from(mouse.row));
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        app.pointer_down(point, Utc::now());
                    }
                    MouseEventKind::Drag(MouseButton::Left) => app.pointer_move(point),
                    MouseEventKind::Up(MouseButton::Left) => app.pointer_up(point),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    // Timer work runs every iteration whether or not an event arrived.
    app.tick(Utc::now());
    Ok(false)
}
