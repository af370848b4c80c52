mod common;
mod confirm;
mod form;
mod list;
mod session;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Focus};

// Import all submodule functions into this module's namespace
// so that submodules can access cross-module functions via `use super::*;`
#[allow(unused_imports)]
use common::*;
#[allow(unused_imports)]
use confirm::*;
#[allow(unused_imports)]
use form::*;
#[allow(unused_imports)]
use list::*;
#[allow(unused_imports)]
use session::*;

pub use common::edit_text;

/// Handle a key event. The topmost overlay takes it: alert, then the delete
/// prompt, then the session, then whichever pane has focus.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if !app.alerts.is_empty() {
        handle_alert(app, key);
    } else if app.composer.list.pending_delete().is_some() {
        handle_confirm(app, key);
    } else if app.composer.list.session().is_some() {
        handle_session(app, key);
    } else {
        match app.focus {
            Focus::Form => handle_form(app, key),
            Focus::List => handle_list(app, key),
        }
    }
}
