use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::spans_width;

/// App name and server on the left, activity on the right
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = vec![
        Span::styled(
            " ideabox ",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            unicode::truncate_to_width(&app.api_url, width.saturating_sub(24)),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ];

    let activity = if app.composer.list.is_loading() {
        Some("loading\u{2026}")
    } else if app.composer.form.is_saving() {
        Some("saving\u{2026}")
    } else {
        None
    };
    if let Some(activity) = activity {
        let used = spans_width(&spans);
        let activity_width = unicode::display_width(activity) + 1;
        if used + activity_width < width {
            spans.push(Span::styled(
                " ".repeat(width - used - activity_width),
                Style::default().bg(bg),
            ));
            spans.push(Span::styled(
                activity,
                Style::default().fg(app.theme.yellow).bg(bg),
            ));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
