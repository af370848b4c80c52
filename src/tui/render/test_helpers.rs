use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::{ChatMessage, Config, Expansion, Idea};
use crate::ops::{Reply, Response};
use crate::tui::app::{App, Focus};

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

pub fn idea(id: u64, title: &str, content: &str) -> Idea {
    Idea {
        id,
        title: title.into(),
        content: content.into(),
        expanded_content: None,
    }
}

/// An App whose list has finished loading `ideas`
pub fn app_with_ideas(ideas: Vec<Idea>) -> App {
    let mut app = App::new(&Config::default());
    let origin = app.composer.list.refresh().origin;
    app.apply_reply(Reply {
        origin,
        result: Ok(Response::Ideas(ideas)),
    });
    app
}

/// The three ideas most render tests start from
pub fn sample_ideas() -> Vec<Idea> {
    vec![
        idea(1, "Solar kite", "A kite that charges phones\nwhile it flies"),
        idea(2, "Tea timer", "Beeps when the tea is ready"),
        idea(3, "Plant diary", ""),
    ]
}

/// An App with the session open on idea 1 and a short exchange in its chat
pub fn app_in_session() -> App {
    let mut app = app_with_ideas(sample_ideas());
    app.focus = Focus::List;
    app.composer.list.open_idea(1);
    if let Some(session) = app.composer.list.session_mut() {
        session.chat_input = "cheaper?".into();
    }
    let call = app.composer.list.send_user_message().unwrap();
    app.apply_reply(Reply {
        origin: call.origin,
        result: Ok(Response::Expanded(Expansion {
            id: 1,
            expanded: "Use recycled sail cloth.".into(),
        })),
    });
    assert_eq!(
        app.composer.list.session().unwrap().chat(),
        &[
            ChatMessage::user("cheaper?"),
            ChatMessage::ai("Use recycled sail cloth.")
        ]
    );
    app
}
