use ratatui::layout::Rect;
use ratatui::text::Span;
use unicode_segmentation::UnicodeSegmentation;

use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Visible slice of a text field plus where its cursor lands
#[derive(Debug, PartialEq, Eq)]
pub(super) struct FieldView {
    pub lines: Vec<String>,
    /// (column, row) relative to the field's top-left cell
    pub cursor: (u16, u16),
}

/// Fit `text` into a `width` x `height` box, scrolling so the byte `cursor`
/// stays visible. Lines are not wrapped; the cursor line scrolls sideways.
pub(super) fn field_view(text: &str, cursor: usize, width: usize, height: usize) -> FieldView {
    let width = width.max(1);
    let height = height.max(1);
    let before = &text[..cursor];
    let row = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = unicode::display_width(&text[line_start..cursor]);

    let first = row.saturating_sub(height - 1);
    let mut cursor_col = col;
    let lines = text
        .split('\n')
        .enumerate()
        .skip(first)
        .take(height)
        .map(|(i, line)| {
            if i != row || col < width {
                return unicode::truncate_to_width(line, width);
            }
            // Drop enough leading graphemes to bring the cursor on screen
            let skip = col + 1 - width;
            let mut dropped = 0;
            let mut start = line.len();
            for (idx, g) in line.grapheme_indices(true) {
                if dropped >= skip {
                    start = idx;
                    break;
                }
                dropped += unicode::display_width(g);
            }
            cursor_col = col - dropped;
            unicode::truncate_to_width(&line[start..], width)
        })
        .collect();

    FieldView {
        lines,
        cursor: (cursor_col as u16, (row - first) as u16),
    }
}

/// A rect of at most `width` x `height`, centered in `area`
pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
