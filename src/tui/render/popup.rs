use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::centered_rect_fixed;

const POPUP_WIDTH: u16 = 48;

/// Ask before deleting the staged idea
pub fn render_confirm_delete(frame: &mut Frame, app: &App, area: Rect) {
    let Some(idea) = app.composer.list.pending_delete() else {
        return;
    };
    let bg = app.theme.background;
    let inner_w = POPUP_WIDTH.min(area.width.saturating_sub(2)).saturating_sub(2) as usize;
    let text_style = Style::default().fg(app.theme.text).bg(bg);

    let mut styled_lines: Vec<(String, Style)> = vec![
        (" Delete idea?".into(), header_style(app, app.theme.red)),
        (String::new(), text_style),
    ];
    for row in indented(&format!("#{} {}", idea.id, idea.title), inner_w) {
        styled_lines.push((row, Style::default().fg(app.theme.text_bright).bg(bg)));
    }
    styled_lines.push((String::new(), text_style));
    for row in indented("This cannot be undone. y deletes, n keeps it.", inner_w) {
        styled_lines.push((row, text_style));
    }

    render_popup(frame, app, area, app.theme.red, styled_lines);
}

/// The oldest pending alert
pub fn render_alert(frame: &mut Frame, app: &App, area: Rect) {
    let Some(message) = app.alerts.front() else {
        return;
    };
    let bg = app.theme.background;
    let inner_w = POPUP_WIDTH.min(area.width.saturating_sub(2)).saturating_sub(2) as usize;
    let text_style = Style::default().fg(app.theme.text).bg(bg);

    let mut styled_lines: Vec<(String, Style)> = vec![
        (" Error".into(), header_style(app, app.theme.highlight)),
        (String::new(), text_style),
    ];
    for row in indented(message, inner_w) {
        styled_lines.push((row, Style::default().fg(app.theme.text_bright).bg(bg)));
    }
    styled_lines.push((String::new(), text_style));
    let more = app.alerts.len() - 1;
    let footer = if more > 0 {
        format!("Press Enter to dismiss ({} more).", more)
    } else {
        "Press Enter to dismiss.".to_string()
    };
    for row in indented(&footer, inner_w) {
        styled_lines.push((row, Style::default().fg(app.theme.dim).bg(bg)));
    }

    render_popup(frame, app, area, app.theme.highlight, styled_lines);
}

fn header_style(app: &App, color: Color) -> Style {
    Style::default()
        .fg(color)
        .bg(app.theme.background)
        .add_modifier(Modifier::BOLD)
}

/// Word-wrap `text` to `max_width` with a one-space indent on every row
fn indented(text: &str, max_width: usize) -> Vec<String> {
    unicode::wrap_text(text, max_width.saturating_sub(1))
        .into_iter()
        .map(|row| format!(" {}", row))
        .collect()
}

fn render_popup(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    border: Color,
    styled_lines: Vec<(String, Style)>,
) {
    let bg = app.theme.background;
    let popup_w = POPUP_WIDTH.min(area.width.saturating_sub(2));
    // Dynamic height from content + 2 for borders
    let popup_h = ((styled_lines.len() as u16) + 2).min(area.height.saturating_sub(2));

    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let lines: Vec<Line> = styled_lines
        .into_iter()
        .map(|(text, style)| Line::from(Span::styled(text, style)))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}
