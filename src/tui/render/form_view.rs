use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, Field, Focus};

use super::helpers::field_view;

const LABEL_WIDTH: u16 = 9;

/// The new-idea form: a one-line title and a multi-line content field
pub fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let focused = app.focus == Focus::Form && app.composer.list.session().is_none();
    let border = if focused {
        app.theme.highlight
    } else {
        app.theme.dim
    };
    let title = if app.composer.form.is_saving() {
        " New idea \u{00b7} saving\u{2026} "
    } else {
        " New idea "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, Style::default().fg(border).bg(bg)))
        .border_style(Style::default().fg(border).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width <= LABEL_WIDTH {
        return;
    }

    let field_width = (inner.width - LABEL_WIDTH) as usize;
    let rows = [
        (Field::FormTitle, "Title", 1u16),
        (Field::FormContent, "Content", inner.height.saturating_sub(1)),
    ];
    let active = app.active_field();
    let mut y = inner.y;
    for (field, label, height) in rows {
        if height == 0 {
            break;
        }
        let text = app.field_text(field);
        let is_active = active == Some(field);
        let cursor = if is_active { app.cursor_in(text) } else { text.len() };
        let view = field_view(text, cursor, field_width, height as usize);

        let label_style = if is_active {
            Style::default().fg(app.theme.highlight).bg(bg)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
        let lines: Vec<Line> = view
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let label = if i == 0 { label } else { "" };
                let label = format!(" {:<w$}", label, w = LABEL_WIDTH as usize - 1);
                Line::from(vec![
                    Span::styled(label, label_style),
                    Span::styled(line.clone(), text_style),
                ])
            })
            .collect();

        let rect = Rect::new(inner.x, y, inner.width, height);
        frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), rect);
        if is_active {
            let (col, row) = view.cursor;
            frame.set_cursor_position(Position::new(rect.x + LABEL_WIDTH + col, rect.y + row));
        }
        y += height;
    }
}
