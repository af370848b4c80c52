use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ops::get_preview;
use crate::tui::app::{App, Focus};
use crate::util::unicode;

use super::helpers::spans_width;

/// Indent of expanded content under its row
const EXPANSION_INDENT: usize = 7;

/// The idea list: one row per idea, with the selected idea's AI expansion
/// unfolded beneath it
pub fn render_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let list = &app.composer.list;
    let focused = app.focus == Focus::List && list.session().is_none();
    let border = if focused {
        app.theme.highlight
    } else {
        app.theme.dim
    };
    let mut title = format!(" Ideas ({}) ", list.ideas().len());
    if list.is_loading() {
        title.push_str("\u{00b7} loading\u{2026} ");
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, Style::default().fg(border).bg(bg)))
        .border_style(Style::default().fg(border).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if list.ideas().is_empty() {
        let message = if list.is_loading() {
            " Loading\u{2026}"
        } else {
            " No ideas yet. Tab to the form to add one."
        };
        let empty = Paragraph::new(message).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, inner);
        return;
    }

    let width = inner.width as usize;
    let mut display_lines: Vec<Line> = Vec::new();
    let mut cursor_line = 0;

    for (i, idea) in list.ideas().iter().enumerate() {
        let is_cursor = i == app.list_cursor;
        let row_bg = if is_cursor && focused {
            app.theme.selection_bg
        } else {
            bg
        };
        if is_cursor {
            cursor_line = display_lines.len();
        }

        let marker = if idea.expanded_content.is_some() { "*" } else { " " };
        let mut spans = vec![
            Span::styled(
                format!("{:>4}{} ", idea.id, marker),
                Style::default().fg(app.theme.dim).bg(row_bg),
            ),
            Span::styled(
                idea.title.clone(),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(row_bg)
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        if list.is_row_expanding(idea.id) {
            spans.push(Span::styled(
                "  expanding\u{2026}",
                Style::default().fg(app.theme.yellow).bg(row_bg),
            ));
        }
        let used = spans_width(&spans);
        if used + 2 < width {
            let preview = unicode::truncate_to_width(
                &get_preview(Some(&idea.content)),
                width - used - 2,
            );
            spans.push(Span::styled("  ", Style::default().bg(row_bg)));
            spans.push(Span::styled(
                preview,
                Style::default().fg(app.theme.text).bg(row_bg),
            ));
        }
        // Pad cursor line
        let used = spans_width(&spans);
        if is_cursor && used < width {
            spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(row_bg)));
        }
        display_lines.push(Line::from(spans));

        if is_cursor && let Some(expanded) = &idea.expanded_content {
            let indent = " ".repeat(EXPANSION_INDENT);
            for row in unicode::wrap_text(expanded, width.saturating_sub(EXPANSION_INDENT)) {
                display_lines.push(Line::from(vec![
                    Span::styled(indent.clone(), Style::default().bg(bg)),
                    Span::styled(row, Style::default().fg(app.theme.cyan).bg(bg)),
                ]));
            }
        }
    }

    // Keep the cursor row on screen
    let visible_height = inner.height as usize;
    if cursor_line < app.list_scroll {
        app.list_scroll = cursor_line;
    } else if visible_height > 0 && cursor_line >= app.list_scroll + visible_height {
        app.list_scroll = cursor_line + 1 - visible_height;
    }
    app.list_scroll = app
        .list_scroll
        .min(display_lines.len().saturating_sub(visible_height));

    let lines: Vec<Line> = display_lines
        .into_iter()
        .skip(app.list_scroll)
        .take(visible_height)
        .collect();
    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Expansion;
    use crate::ops::{Reply, Response};
    use crate::tui::render::test_helpers::*;

    fn list_output(app: &mut App, h: u16) -> String {
        render_to_string(TERM_W, h, |frame, area| render_list(frame, app, area))
    }

    #[test]
    fn rows_show_id_title_and_preview() {
        let mut app = app_with_ideas(sample_ideas());
        let output = list_output(&mut app, 8);
        assert!(output.contains("Ideas (3)"));
        assert!(output.contains("   1  Solar kite  A kite that charges phones while it flies"));
        assert!(output.contains("   3  Plant diary  (No content)"));
    }

    #[test]
    fn selected_row_unfolds_expansion() {
        let mut app = app_with_ideas(sample_ideas());
        app.focus = Focus::List;
        app.list_cursor = 1;
        let call = app.composer.list.expand_idea(2).unwrap();
        let output = list_output(&mut app, 8);
        assert!(output.contains("Tea timer  expanding\u{2026}"));

        app.apply_reply(Reply {
            origin: call.origin,
            result: Ok(Response::Expanded(Expansion {
                id: 2,
                expanded: "Add a whistle.".into(),
            })),
        });
        let output = list_output(&mut app, 8);
        assert!(output.contains("   2* Tea timer"));
        assert!(output.contains("       Add a whistle."));
    }

    #[test]
    fn empty_and_loading_states() {
        let mut app = app_with_ideas(vec![]);
        assert!(list_output(&mut app, 4).contains("No ideas yet"));
        let _ = app.composer.list.refresh();
        let output = list_output(&mut app, 4);
        assert!(output.contains("loading\u{2026}"));
        assert!(output.contains("Loading\u{2026}"));
    }

    #[test]
    fn scrolls_to_keep_cursor_visible() {
        let ideas = (1..=10)
            .map(|id| idea(id, &format!("Idea {}", id), "body"))
            .collect();
        let mut app = app_with_ideas(ideas);
        app.list_cursor = 9;
        let output = list_output(&mut app, 5);
        assert!(output.contains("Idea 10"));
        assert!(!output.contains("Idea 1 "));
        assert_eq!(app.list_scroll, 7);
    }
}
