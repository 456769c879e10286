//! UI rendering for the terminal board.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::core::Quadrant;
use crate::tui::app::App;

/// Render the application UI and record the hit-test layout.
pub fn render(frame: &mut Frame<'_>, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Board
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_board(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
    render_ghost(frame, app);
}

/// Render the header with connectivity and queue state.
fn render_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let network = app.network_status();
    let network_span = if network.is_online() {
        Span::styled(" ONLINE ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" OFFLINE ", Style::default().fg(Color::Red))
    };

    let pending = app.pending_count();
    let pending_span = if pending > 0 {
        Span::styled(
            format!(" {pending} changes pending "),
            Style::default().fg(Color::Yellow),
        )
    } else {
        Span::styled(" in sync ", Style::default().fg(Color::DarkGray))
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " quadrant ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        network_span,
        pending_span,
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(header, area);
}

/// Render the four quadrants and record zones/cards for hit-testing.
fn render_board(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let areas = [
        (Quadrant::UrgentImportant, top[0]),
        (Quadrant::ImportantOnly, top[1]),
        (Quadrant::UrgentOnly, bottom[0]),
        (Quadrant::Neither, bottom[1]),
    ];

    let state = app.state();
    app.surface.zones.clear();
    app.surface.cards.clear();

    for (quadrant, zone_area) in areas {
        app.surface.zones.push((quadrant, zone_area));

        let highlighted = app.surface.highlight == Some(quadrant);
        let border_style = if highlighted {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let tasks = state.tasks.get(&quadrant).map_or(&[][..], Vec::as_slice);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ({}) ", quadrant.label(), tasks.len()));
        let inner = block.inner(zone_area);
        frame.render_widget(block, zone_area);

        let dragged_id = state.dragged_task.as_ref().map(|t| t.id.as_str());
        for (i, task) in tasks.iter().enumerate() {
            let row = u16::try_from(i).unwrap_or(u16::MAX);
            if row >= inner.height {
                break;
            }
            let card_area = Rect {
                x: inner.x,
                y: inner.y + row,
                width: inner.width,
                height: 1,
            };
            app.surface
                .cards
                .push((task.reference(), task.title.clone(), card_area));

            let line = card_line(app, task.id.as_str(), &task.title, dragged_id);
            frame.render_widget(Paragraph::new(line), card_area);
        }
    }
}

/// One card row, with drag dimming and swipe offset applied.
fn card_line<'a>(
    app: &App,
    task_id: &str,
    title: &'a str,
    dragged_id: Option<&str>,
) -> Line<'a> {
    if dragged_id == Some(task_id) {
        return Line::from(Span::styled(
            format!("• {title}"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        ));
    }

    if app.swiping_task.as_deref() == Some(task_id) {
        if let Some((offset_x, opacity)) = app.surface.swipe {
            let indent = " ".repeat(offset_x.abs().min(40.0) as usize);
            let style = if opacity < 0.7 {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Red)
            };
            return Line::from(Span::styled(format!("{indent}• {title}"), style));
        }
    }

    Line::from(format!("• {title}"))
}

/// Render the floating proxy for the dragged card.
fn render_ghost(frame: &mut Frame<'_>, app: &App) {
    let Some((point, title)) = app.surface.ghost.as_ref() else {
        return;
    };
    if !app.surface.ghost_visible {
        return;
    }

    let screen = frame.area();
    let width = u16::try_from(title.len() + 4).unwrap_or(20).min(screen.width);
    let x = (point.x as u16).min(screen.width.saturating_sub(width));
    let y = (point.y as u16).min(screen.height.saturating_sub(1));
    let area = Rect {
        x,
        y,
        width,
        height: 1,
    };

    let ghost = Paragraph::new(format!("┆ {title} ┆")).style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(ghost, area);
}

/// Render the status bar.
fn render_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let failed = app.failed_count();
    let text = if failed > 0 {
        format!("{failed} changes failed to sync - press f to retry")
    } else {
        app.status
            .clone()
            .unwrap_or_else(|| "hold+drag:move | swipe:delete | o:network | s:sync | q:quit".to_string())
    };

    let style = if failed > 0 {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}
