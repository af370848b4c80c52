use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Focus};

use super::helpers::spans_width;

/// Key hints for whatever currently takes keys
fn key_hints(app: &App) -> &'static str {
    if !app.alerts.is_empty() {
        return "Enter dismiss";
    }
    if app.composer.list.pending_delete().is_some() {
        return "y delete  n keep";
    }
    if let Some(session) = app.composer.list.session() {
        return if session.is_editing() {
            "Ctrl-S save  Tab switch field  Esc cancel"
        } else {
            "Enter send  Ctrl-A expand  Ctrl-E edit  PgUp/PgDn scroll  Esc close"
        };
    }
    match app.focus {
        Focus::Form => "Enter next/save  Alt-Enter newline  Tab list",
        Focus::List => "j/k move  Enter open  x expand  d delete  r refresh  q quit",
    }
}

/// Render the status row (bottom of screen): idea count, then key hints
/// right-aligned
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let count = app.composer.list.ideas().len();
    let mut spans = vec![Span::styled(
        format!(" {} idea{}", count, if count == 1 { "" } else { "s" }),
        Style::default().fg(app.theme.dim).bg(bg),
    )];

    if app.show_key_hints {
        let hint = key_hints(app);
        let content_width = spans_width(&spans);
        let hint_width = hint.chars().count() + 1;
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(
                hint,
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
