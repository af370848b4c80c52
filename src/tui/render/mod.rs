pub mod form_view;
pub mod header;
mod helpers;
pub mod list_view;
pub mod popup;
pub mod session_view;
pub mod status_row;

#[cfg(test)]
pub(crate) mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

/// Height of the form pane: two borders, the title row, three content rows
const FORM_HEIGHT: u16 = 6;

/// Main render function: panes first, overlays on top
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (1 row) | form | list | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(FORM_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);
    form_view::render_form(frame, app, chunks[1]);
    list_view::render_list(frame, app, chunks[2]);
    status_row::render_status_row(frame, app, chunks[3]);

    if app.composer.list.session().is_some() {
        session_view::render_session(frame, app, session_rect(chunks[1].union(chunks[2])));
    }
    if app.composer.list.pending_delete().is_some() {
        popup::render_confirm_delete(frame, app, area);
    }
    if !app.alerts.is_empty() {
        popup::render_alert(frame, app, area);
    }
}

/// The session overlay covers the panes with a small margin
fn session_rect(area: Rect) -> Rect {
    Rect::new(
        area.x + 1,
        area.y,
        area.width.saturating_sub(2),
        area.height,
    )
}
