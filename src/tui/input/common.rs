use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;
use crate::util::unicode;

/// Apply a text-editing key to `buf` with its byte `cursor`. Returns false
/// if the key is not an editing key, so the caller can handle it.
pub fn edit_text(buf: &mut String, cursor: &mut usize, key: KeyEvent, multiline: bool) -> bool {
    // The buffer may have changed under the cursor
    let mut pos = (*cursor).min(buf.len());
    while !buf.is_char_boundary(pos) {
        pos -= 1;
    }
    *cursor = pos;

    match (key.modifiers, key.code) {
        (m, KeyCode::Enter) if multiline && m.contains(KeyModifiers::ALT) => {
            buf.insert(*cursor, '\n');
            *cursor += 1;
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            buf.insert(*cursor, c);
            *cursor += c.len_utf8();
        }
        (KeyModifiers::NONE, KeyCode::Backspace) => {
            if let Some(prev) = unicode::prev_grapheme_boundary(buf, *cursor) {
                buf.drain(prev..*cursor);
                *cursor = prev;
            }
        }
        // Word backspace (Alt or Ctrl, or Ctrl-W)
        (m, KeyCode::Backspace)
            if m.contains(KeyModifiers::ALT) || m.contains(KeyModifiers::CONTROL) =>
        {
            delete_word_left(buf, cursor);
        }
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => delete_word_left(buf, cursor),
        (_, KeyCode::Delete) => {
            if let Some(next) = unicode::next_grapheme_boundary(buf, *cursor) {
                buf.drain(*cursor..next);
            }
        }
        (_, KeyCode::Left) => {
            if let Some(prev) = unicode::prev_grapheme_boundary(buf, *cursor) {
                *cursor = prev;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(next) = unicode::next_grapheme_boundary(buf, *cursor) {
                *cursor = next;
            }
        }
        // Home/End work on the current line
        (_, KeyCode::Home) => {
            *cursor = buf[..*cursor].rfind('\n').map_or(0, |i| i + 1);
        }
        (_, KeyCode::End) => {
            *cursor = buf[*cursor..]
                .find('\n')
                .map_or(buf.len(), |i| *cursor + i);
        }
        _ => return false,
    }
    true
}

fn delete_word_left(buf: &mut String, cursor: &mut usize) {
    let start = unicode::word_boundary_left(buf, *cursor);
    buf.drain(start..*cursor);
    *cursor = start;
}

/// Route an editing key to whichever field is active
pub(super) fn edit_active_field(app: &mut App, key: KeyEvent) -> bool {
    let Some(field) = app.active_field() else {
        return false;
    };
    let mut cursor = app.cursor;
    let handled = match app.field_mut(field) {
        Some(buf) => edit_text(buf, &mut cursor, key, field.is_multiline()),
        None => false,
    };
    app.cursor = cursor;
    handled
}
