use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use crate::io::api::HttpApi;
use crate::io::dispatch::Dispatcher;
use crate::model::{Config, Idea};
use crate::ops::{Call, Composer, Effect, Reply};

use super::input;
use super::render;
use super::theme::Theme;

/// Delay between an AI message landing and the transcript jumping to it
pub const SCROLL_DELAY: Duration = Duration::from_millis(50);

/// Which top-level pane takes keys when no overlay is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form,
    List,
}

/// Title or content of a two-field form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSlot {
    Title,
    Content,
}

impl FieldSlot {
    pub fn toggle(self) -> Self {
        match self {
            FieldSlot::Title => FieldSlot::Content,
            FieldSlot::Content => FieldSlot::Title,
        }
    }
}

/// The text field that currently receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FormTitle,
    FormContent,
    ChatInput,
    EditTitle,
    EditContent,
}

impl Field {
    /// Whether `Alt-Enter` may insert a newline
    pub fn is_multiline(self) -> bool {
        matches!(self, Field::FormContent | Field::EditContent)
    }
}

/// Main application state
pub struct App {
    pub composer: Composer,
    pub theme: Theme,
    pub api_url: String,
    pub show_key_hints: bool,
    pub should_quit: bool,
    pub focus: Focus,
    pub form_field: FieldSlot,
    pub edit_field: FieldSlot,
    /// Byte offset of the text cursor in the active field
    pub cursor: usize,
    pub list_cursor: usize,
    /// First visible row of the list pane
    pub list_scroll: usize,
    /// First visible row of the chat transcript
    pub chat_scroll: usize,
    /// Keep the transcript pinned to its newest message
    pub chat_follow: bool,
    pub scroll_due: Option<Instant>,
    /// Blocking alerts, oldest first
    pub alerts: VecDeque<String>,
    /// Calls waiting to be handed to the dispatcher
    outbox: Vec<Call>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        App {
            composer: Composer::new(),
            theme: Theme::from_config(&config.ui),
            api_url: config.api.url.clone(),
            show_key_hints: config.ui.show_key_hints,
            should_quit: false,
            focus: Focus::Form,
            form_field: FieldSlot::Title,
            edit_field: FieldSlot::Title,
            cursor: 0,
            list_cursor: 0,
            list_scroll: 0,
            chat_scroll: 0,
            chat_follow: true,
            scroll_due: None,
            alerts: VecDeque::new(),
            outbox: Vec::new(),
        }
    }

    /// Kick off the initial list load
    pub fn start(&mut self) {
        let effects = self.composer.start();
        self.handle_effects(effects);
    }

    pub fn apply_reply(&mut self, reply: Reply) {
        let effects = self.composer.apply(reply);
        self.handle_effects(effects);
        self.clamp_list_cursor();
    }

    pub fn handle_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Call(call) => self.outbox.push(call),
                Effect::Alert(message) => self.alerts.push_back(message),
                Effect::ScrollChat => self.scroll_due = Some(Instant::now() + SCROLL_DELAY),
                Effect::Saved => {}
            }
        }
    }

    /// Queue a call issued directly by a key handler
    pub fn issue(&mut self, call: Option<Call>) {
        self.outbox.extend(call);
    }

    pub fn take_outbox(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.outbox)
    }

    /// Run deferred work whose time has come
    pub fn tick(&mut self, now: Instant) {
        if self.scroll_due.is_some_and(|due| now >= due) {
            self.scroll_due = None;
            self.chat_follow = true;
        }
    }

    pub fn selected_idea(&self) -> Option<&Idea> {
        self.composer.list.ideas().get(self.list_cursor)
    }

    pub fn clamp_list_cursor(&mut self) {
        let count = self.composer.list.ideas().len();
        self.list_cursor = self.list_cursor.min(count.saturating_sub(1));
    }

    /// The field typed characters go to, given which overlays are open
    pub fn active_field(&self) -> Option<Field> {
        if !self.alerts.is_empty() || self.composer.list.pending_delete().is_some() {
            return None;
        }
        if let Some(session) = self.composer.list.session() {
            return Some(match (session.is_editing(), self.edit_field) {
                (false, _) => Field::ChatInput,
                (true, FieldSlot::Title) => Field::EditTitle,
                (true, FieldSlot::Content) => Field::EditContent,
            });
        }
        match (self.focus, self.form_field) {
            (Focus::List, _) => None,
            (Focus::Form, FieldSlot::Title) => Some(Field::FormTitle),
            (Focus::Form, FieldSlot::Content) => Some(Field::FormContent),
        }
    }

    pub fn field_text(&self, field: Field) -> &str {
        let form = &self.composer.form;
        let session = self.composer.list.session();
        match field {
            Field::FormTitle => &form.title,
            Field::FormContent => &form.content,
            Field::ChatInput => session.map_or("", |s| s.chat_input.as_str()),
            Field::EditTitle => session.map_or("", |s| s.edited_title.as_str()),
            Field::EditContent => session.map_or("", |s| s.edited_content.as_str()),
        }
    }

    pub fn field_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::FormTitle => Some(&mut self.composer.form.title),
            Field::FormContent => Some(&mut self.composer.form.content),
            Field::ChatInput => Some(&mut self.composer.list.session_mut()?.chat_input),
            Field::EditTitle => Some(&mut self.composer.list.session_mut()?.edited_title),
            Field::EditContent => Some(&mut self.composer.list.session_mut()?.edited_content),
        }
    }

    /// Put the cursor at the end of whatever field is now active
    pub fn cursor_to_end(&mut self) {
        self.cursor = self.active_field().map_or(0, |f| self.field_text(f).len());
    }

    /// The cursor clamped into `text`. Fields can change underneath the
    /// cursor (cleared after a save, reseeded on cancel).
    pub fn cursor_in(&self, text: &str) -> usize {
        let mut pos = self.cursor.min(text.len());
        while !text.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }
}

/// Run the TUI application
pub fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let api = HttpApi::new(&config.api)?;
    info!(url = api.base_url(), "starting ui");
    let mut dispatcher = Dispatcher::new(Arc::new(api));

    let mut app = App::new(&config);
    app.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &mut dispatcher);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if dispatcher.in_flight() > 0 {
        debug!(
            in_flight = dispatcher.in_flight(),
            "quitting with requests in flight"
        );
    }
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dispatcher: &mut Dispatcher,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        for reply in dispatcher.poll() {
            app.apply_reply(reply);
        }
        app.tick(Instant::now());
        for call in app.take_outbox() {
            dispatcher.submit(call);
        }

        terminal.draw(|frame| render::render(frame, app))?;

        // Short poll so replies and deferred scrolls show up promptly
        if event::poll(SCROLL_DELAY)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }
        for call in app.take_outbox() {
            dispatcher.submit(call);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
