use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::Activity;
use crate::tui::app::{App, Field, FieldSlot};

use super::*;

/// Rows moved per PgUp/PgDn
const PAGE: usize = 5;

pub(super) fn handle_session(app: &mut App, key: KeyEvent) {
    let editing = app
        .composer
        .list
        .session()
        .is_some_and(|s| s.is_editing());
    if editing {
        handle_session_edit(app, key);
    } else {
        handle_session_chat(app, key);
    }
}

fn handle_session_chat(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            let call = app.composer.list.close_idea();
            app.issue(call);
            if app.composer.list.session().is_none() {
                app.cursor_to_end();
            }
        }
        (KeyModifiers::NONE, KeyCode::Enter) => {
            let call = app.composer.list.send_user_message();
            if call.is_some() {
                app.cursor = 0;
                app.chat_follow = true;
            }
            app.issue(call);
        }
        (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
            let call = app.composer.list.start_expansion();
            app.issue(call);
        }
        (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
            if app.composer.list.begin_edit() {
                app.edit_field = FieldSlot::Title;
                app.cursor_to_end();
            }
        }
        (_, KeyCode::PageUp) => {
            app.chat_follow = false;
            app.chat_scroll = app.chat_scroll.saturating_sub(PAGE);
        }
        (_, KeyCode::PageDown) => {
            // Clamped (and re-pinned at the bottom) when rendering
            app.chat_scroll += PAGE;
        }
        _ => {
            // Nothing to type into while the summary is being written
            let closing = app
                .composer
                .list
                .session()
                .is_some_and(|s| s.activity() == Activity::Summarizing);
            if !closing {
                edit_active_field(app, key);
            }
        }
    }
}

fn handle_session_edit(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            app.composer.list.cancel_edit();
            app.cursor_to_end();
        }
        (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
            let call = app.composer.list.save_edits();
            app.issue(call);
        }
        (_, KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down) => {
            app.edit_field = app.edit_field.toggle();
            app.cursor_to_end();
        }
        (KeyModifiers::NONE, KeyCode::Enter) => match app.edit_field {
            FieldSlot::Title => {
                app.edit_field = FieldSlot::Content;
                app.cursor_to_end();
            }
            FieldSlot::Content => {
                // Plain Enter breaks the line in the content field
                let mut cursor = app.cursor;
                if let Some(buf) = app.field_mut(Field::EditContent) {
                    let newline = KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT);
                    edit_text(buf, &mut cursor, newline, true);
                }
                app.cursor = cursor;
            }
        },
        _ => {
            edit_active_field(app, key);
        }
    }
}
