use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;

/// Delete prompt: `y` deletes, `n`/`Esc` keeps the idea
pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('y')) => {
            let call = app.composer.list.delete_pending();
            app.issue(call);
            // The row goes away when the server confirms
            app.composer.list.cancel_delete();
        }
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.composer.list.cancel_delete();
        }
        _ => {}
    }
}

/// Dismiss the oldest alert
pub(super) fn handle_alert(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
        app.alerts.pop_front();
    }
}
