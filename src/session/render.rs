//! Drawing the binding list.
//!
//! Rendering is a fire-and-forget side effect of state transitions; the
//! state machine's correctness does not depend on it.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{BindingSink, Mode, Session};
use crate::constants::APP_NAME;

/// Label shown for the focused row while a capture is in progress.
const CAPTURE_PLACEHOLDER: &str = "press a key…";

/// Label shown for an unbound button.
const UNBOUND_LABEL: &str = "--";

/// Draws header, one row per button, and the contextual hint line.
pub fn draw<S: BindingSink>(f: &mut Frame, session: &Session<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_header(f, chunks[0]);
    draw_rows(f, chunks[1], session);
    draw_hints(f, chunks[2], session);
}

fn draw_header(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(APP_NAME, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" — button bindings"),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn draw_rows<S: BindingSink>(f: &mut Frame, area: Rect, session: &Session<S>) {
    let capturing = matches!(
        session.state().mode,
        Mode::AwaitingKey | Mode::CancelPending
    );

    let mut lines = Vec::with_capacity(session.table().iter().count());
    for (i, (button, code)) in session.table().iter().enumerate() {
        let focused = i == session.state().focus;
        let marker = if focused { "▶ " } else { "  " };

        let key_label = if focused && capturing {
            Span::styled(
                CAPTURE_PLACEHOLDER,
                Style::default().add_modifier(Modifier::ITALIC),
            )
        } else {
            match code {
                Some(code) => Span::raw(key_label_for(session, code)),
                None => Span::raw(UNBOUND_LABEL.to_string()),
            }
        };

        let row_style = if focused {
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default()
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<10} ", button.name), row_style),
            key_label,
        ]));
    }

    let rows = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(rows, area);
}

fn key_label_for<S: BindingSink>(session: &Session<S>, code: u8) -> String {
    session
        .db()
        .label_for(code)
        .map_or_else(|| format!("0x{code:02X}"), str::to_string)
}

fn draw_hints<S: BindingSink>(f: &mut Frame, area: Rect, session: &Session<S>) {
    let hint = match session.state().mode {
        Mode::Navigating => "↑/↓ move · enter/space/r rebind · esc/q quit",
        Mode::AwaitingKey => "press the new key · hold esc to cancel",
        Mode::CancelPending => "keep holding esc to cancel, release to bind esc",
    };
    let hints = Paragraph::new(Line::from(Span::raw(hint)))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(hints, area);
}
