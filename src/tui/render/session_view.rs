use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::Sender;
use crate::ops::preview::NO_CONTENT;
use crate::ops::{Activity, Session};
use crate::tui::app::{App, Field};
use crate::util::unicode;

use super::helpers::field_view;

const LABEL_WIDTH: u16 = 9;
/// Rows given to the idea itself (or its edit form) above the chat
const TOP_MAX: u16 = 6;

/// The expanded view of one idea: its content (or edit form), the chat
/// transcript, and the chat input
pub fn render_session(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(session) = app.composer.list.session() else {
        return;
    };
    let bg = app.theme.background;
    let snapshot = session.snapshot();
    let title = format!(" #{} {} ", snapshot.id, snapshot.title);

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 4 || inner.width <= LABEL_WIDTH {
        return;
    }

    let top_height = if session.is_editing() {
        TOP_MAX
    } else {
        let rows = unicode::wrap_text(&snapshot.content, inner.width as usize - 1).len();
        (rows as u16).clamp(1, TOP_MAX)
    };
    let top_height = top_height.min(inner.height / 2);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(top_height),
            Constraint::Length(1), // separator
            Constraint::Min(1),    // transcript
            Constraint::Length(1), // input
        ])
        .split(inner);

    if session.is_editing() {
        render_edit_form(frame, app, chunks[0]);
    } else {
        render_content(frame, app, session, chunks[0]);
    }
    render_separator(frame, app, session, chunks[1]);
    let transcript = transcript_lines(app, session, chunks[2].width as usize);
    render_input(frame, app, chunks[3]);

    // Scroll: pinned to the bottom while following, clamped otherwise
    let height = chunks[2].height as usize;
    let max_scroll = transcript.len().saturating_sub(height);
    if app.chat_follow || app.chat_scroll >= max_scroll {
        app.chat_scroll = max_scroll;
        app.chat_follow = true;
    }
    let lines: Vec<Line> = transcript
        .into_iter()
        .skip(app.chat_scroll)
        .take(height)
        .collect();
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(bg)),
        chunks[2],
    );
}

fn render_content(frame: &mut Frame, app: &App, session: &Session, area: Rect) {
    let bg = app.theme.background;
    let snapshot = session.snapshot();
    let lines: Vec<Line> = if snapshot.content.is_empty() {
        vec![Line::from(Span::styled(
            format!(" {}", NO_CONTENT),
            Style::default().fg(app.theme.dim).bg(bg),
        ))]
    } else {
        unicode::wrap_text(&snapshot.content, (area.width as usize).saturating_sub(1))
            .into_iter()
            .map(|row| {
                Line::from(Span::styled(
                    format!(" {}", row),
                    Style::default().fg(app.theme.text).bg(bg),
                ))
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn render_edit_form(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let active = app.active_field();
    let field_width = area.width.saturating_sub(LABEL_WIDTH) as usize;
    let rows = [
        (Field::EditTitle, "Title", 1u16),
        (Field::EditContent, "Content", area.height.saturating_sub(1)),
    ];
    let mut y = area.y;
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
        let lines: Vec<Line> = view
            .lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let label = if i == 0 { label } else { "" };
                Line::from(vec![
                    Span::styled(format!(" {:<8}", label), label_style),
                    Span::styled(line, Style::default().fg(app.theme.text_bright).bg(bg)),
                ])
            })
            .collect();
        let rect = Rect::new(area.x, y, area.width, height);
        frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), rect);
        if is_active {
            let (col, row) = view.cursor;
            frame.set_cursor_position(Position::new(rect.x + LABEL_WIDTH + col, rect.y + row));
        }
        y += height;
    }
}

/// A rule between the idea and the chat, with what the session waits on
fn render_separator(frame: &mut Frame, app: &App, session: &Session, area: Rect) {
    let bg = app.theme.background;
    let status = match session.activity() {
        Activity::Idle => "",
        Activity::Expanding => " ai is thinking\u{2026} ",
        Activity::SavingEdit => " saving\u{2026} ",
        Activity::Summarizing => " saving conversation\u{2026} ",
    };
    let label = " chat ";
    let width = area.width as usize;
    let rule_width = width.saturating_sub(label.len() + status.chars().count() + 1);
    let line = Line::from(vec![
        Span::styled("\u{2500}", Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(label, Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(
            "\u{2500}".repeat(rule_width),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
        Span::styled(status, Style::default().fg(app.theme.yellow).bg(bg)),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

/// Wrapped transcript rows, one blank row between messages
fn transcript_lines(app: &App, session: &Session, width: usize) -> Vec<Line<'static>> {
    let bg = app.theme.background;
    if session.chat().is_empty() {
        let hint = if session.activity() == Activity::Expanding {
            " Asking the AI to expand this idea\u{2026}"
        } else {
            " No messages yet. Ctrl-A asks the AI to expand this idea."
        };
        return vec![Line::from(Span::styled(
            hint,
            Style::default().fg(app.theme.dim).bg(bg),
        ))];
    }

    let mut lines = Vec::new();
    for (i, message) in session.chat().iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        let color = match message.sender {
            Sender::User => app.theme.cyan,
            Sender::Ai => app.theme.green,
        };
        let text = format!("{}> {}", message.sender.label(), message.content);
        for row in unicode::wrap_text(&text, width.saturating_sub(1)) {
            lines.push(Line::from(Span::styled(
                format!(" {}", row),
                Style::default().fg(color).bg(bg),
            )));
        }
    }
    lines
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let field = Field::ChatInput;
    let text = app.field_text(field);
    let is_active = app.active_field() == Some(field);
    let cursor = if is_active { app.cursor_in(text) } else { text.len() };
    let view = field_view(text, cursor, area.width.saturating_sub(3) as usize, 1);

    let prompt_color = if is_active {
        app.theme.highlight
    } else {
        app.theme.dim
    };
    let line = Line::from(vec![
        Span::styled(" > ", Style::default().fg(prompt_color).bg(bg)),
        Span::styled(
            view.lines.into_iter().next().unwrap_or_default(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
    if is_active {
        let (col, _) = view.cursor;
        frame.set_cursor_position(Position::new(area.x + 3 + col, area.y));
    }
}
