use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Focus};

pub(super) fn handle_list(app: &mut App, key: KeyEvent) {
    let count = app.composer.list.ideas().len();
    match (key.modifiers, key.code) {
        (_, KeyCode::Tab | KeyCode::BackTab) => {
            app.focus = Focus::Form;
            app.cursor_to_end();
        }
        (KeyModifiers::NONE, KeyCode::Char('q')) => app.should_quit = true,
        (KeyModifiers::NONE, KeyCode::Down | KeyCode::Char('j')) => {
            if app.list_cursor + 1 < count {
                app.list_cursor += 1;
            }
        }
        (KeyModifiers::NONE, KeyCode::Up | KeyCode::Char('k')) => {
            app.list_cursor = app.list_cursor.saturating_sub(1);
        }
        (KeyModifiers::NONE, KeyCode::Home | KeyCode::Char('g')) => app.list_cursor = 0,
        (_, KeyCode::End | KeyCode::Char('G')) => app.list_cursor = count.saturating_sub(1),
        (KeyModifiers::NONE, KeyCode::Char('r')) => {
            let call = app.composer.list.refresh();
            app.issue(Some(call));
        }
        (KeyModifiers::NONE, KeyCode::Enter) => {
            let Some(id) = app.selected_idea().map(|i| i.id) else {
                return;
            };
            if app.composer.list.open_idea(id) {
                app.chat_scroll = 0;
                app.chat_follow = true;
                app.cursor = 0;
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('x')) => {
            if let Some(id) = app.selected_idea().map(|i| i.id) {
                let call = app.composer.list.expand_idea(id);
                app.issue(call);
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('d')) => {
            if let Some(id) = app.selected_idea().map(|i| i.id) {
                app.composer.list.confirm_delete(id);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Config, Idea};
    use crate::ops::{Reply, Request, Response};
    use crate::tui::input::handle_key;
    use crate::tui::input::test_keys::*;

    fn app_with_ideas(n: u64) -> App {
        let mut app = App::new(&Config::default());
        app.focus = Focus::List;
        let ideas = (1..=n)
            .map(|id| Idea {
                id,
                title: format!("Idea {}", id),
                content: "body".into(),
                expanded_content: None,
            })
            .collect();
        let origin = app.composer.list.refresh().origin;
        app.apply_reply(Reply {
            origin,
            result: Ok(Response::Ideas(ideas)),
        });
        app
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut app = app_with_ideas(2);
        handle_key(&mut app, ch('k'));
        assert_eq!(app.list_cursor, 0);
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, key(KeyCode::Down));
        assert_eq!(app.list_cursor, 1);
        handle_key(&mut app, ch('g'));
        assert_eq!(app.list_cursor, 0);
    }

    #[test]
    fn enter_opens_selected_idea() {
        let mut app = app_with_ideas(3);
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, key(KeyCode::Enter));
        let session = app.composer.list.session().unwrap();
        assert_eq!(session.idea_id(), 2);
        assert!(session.chat().is_empty());
    }

    #[test]
    fn x_expands_row_once() {
        let mut app = app_with_ideas(1);
        handle_key(&mut app, ch('x'));
        handle_key(&mut app, ch('x'));
        let calls = app.take_outbox();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].request, Request::Expand { id: 1 });
        assert!(app.composer.list.is_row_expanding(1));
    }

    #[test]
    fn r_refreshes_and_q_quits() {
        let mut app = app_with_ideas(1);
        handle_key(&mut app, ch('r'));
        assert!(app.composer.list.is_loading());
        assert_eq!(app.take_outbox()[0].request, Request::List);
        handle_key(&mut app, ch('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn empty_list_ignores_row_keys() {
        let mut app = app_with_ideas(0);
        handle_key(&mut app, key(KeyCode::Enter));
        handle_key(&mut app, ch('x'));
        handle_key(&mut app, ch('d'));
        assert!(app.composer.list.session().is_none());
        assert!(app.composer.list.pending_delete().is_none());
        assert!(app.take_outbox().is_empty());
    }
}
