use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, FieldSlot, Focus};

use super::*;

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Tab | KeyCode::BackTab) | (KeyModifiers::NONE, KeyCode::Esc) => {
            app.focus = Focus::List;
        }
        (KeyModifiers::NONE, KeyCode::Up) => select_form_field(app, FieldSlot::Title),
        (KeyModifiers::NONE, KeyCode::Down) => select_form_field(app, FieldSlot::Content),
        (KeyModifiers::NONE, KeyCode::Enter) => match app.form_field {
            FieldSlot::Title => select_form_field(app, FieldSlot::Content),
            FieldSlot::Content => {
                let call = app.composer.submit_form();
                if call.is_some() {
                    // Next idea starts from the title
                    app.form_field = FieldSlot::Title;
                    app.cursor = 0;
                }
                app.issue(call);
            }
        },
        _ => {
            edit_active_field(app, key);
        }
    }
}

fn select_form_field(app: &mut App, slot: FieldSlot) {
    app.form_field = slot;
    app.cursor_to_end();
}
