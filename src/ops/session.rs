use tracing::{debug, error, info};

use crate::io::api::ApiError;
use crate::model::{ChatMessage, Idea, IdeaId};

use super::form::validate;
use super::{Call, Effect, Origin, Request, Response, unexpected};

/// Identifies one open/close cycle of the expanded view. Replies tagged with
/// a token other than the open session's are stale.
pub type SessionToken = u64;

/// What the session is waiting on. At most one request is in flight per
/// session, so chat and edit-save can never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    /// Waiting for an AI message (initial expansion or chat reply)
    Expanding,
    SavingEdit,
    /// Closing: the transcript is being folded into the idea
    Summarizing,
}

/// The expanded view of one idea: a snapshot of it, the edit form, and the
/// chat transcript
#[derive(Debug, Clone)]
pub struct Session {
    token: SessionToken,
    snapshot: Idea,
    chat: Vec<ChatMessage>,
    editing: bool,
    activity: Activity,
    pub chat_input: String,
    pub edited_title: String,
    pub edited_content: String,
}

impl Session {
    pub fn open(token: SessionToken, idea: &Idea) -> Self {
        Session {
            token,
            snapshot: idea.clone(),
            chat: Vec::new(),
            editing: false,
            activity: Activity::Idle,
            chat_input: String::new(),
            edited_title: idea.title.clone(),
            edited_content: idea.content.clone(),
        }
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn idea_id(&self) -> IdeaId {
        self.snapshot.id
    }

    pub fn snapshot(&self) -> &Idea {
        &self.snapshot
    }

    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn is_busy(&self) -> bool {
        self.activity != Activity::Idle
    }

    /// Enter edit mode with the fields seeded from the snapshot
    pub fn begin_edit(&mut self) -> bool {
        if self.editing || self.is_busy() {
            return false;
        }
        self.edited_title = self.snapshot.title.clone();
        self.edited_content = self.snapshot.content.clone();
        self.editing = true;
        true
    }

    /// Drop staged edits and leave edit mode. The session stays open.
    pub fn cancel_edit(&mut self) {
        if self.activity == Activity::SavingEdit {
            return;
        }
        self.editing = false;
        self.edited_title = self.snapshot.title.clone();
        self.edited_content = self.snapshot.content.clone();
    }

    pub fn save_edits(&mut self) -> Option<Call> {
        if !self.editing || self.is_busy() {
            return None;
        }
        let (title, content) = validate(&self.edited_title, &self.edited_content)?;
        info!(id = self.snapshot.id, "saving edits");
        self.activity = Activity::SavingEdit;
        Some(Call::new(
            Origin::SessionSave(self.token),
            Request::Update {
                id: self.snapshot.id,
                title,
                content,
            },
        ))
    }

    /// Ask for the context-free expansion that opens the conversation. Only
    /// valid before anything is in the chat.
    pub fn start_expansion(&mut self) -> Option<Call> {
        if self.is_busy() || !self.chat.is_empty() {
            return None;
        }
        self.activity = Activity::Expanding;
        Some(Call::new(
            Origin::SessionExpand(self.token),
            Request::Expand {
                id: self.snapshot.id,
            },
        ))
    }

    /// Post the chat input. The message shows up in the transcript right
    /// away and stays there even if the request fails.
    pub fn send_user_message(&mut self) -> Option<Call> {
        if self.is_busy() {
            return None;
        }
        let message = self.chat_input.trim().to_string();
        if message.is_empty() {
            return None;
        }
        self.chat.push(ChatMessage::user(message.clone()));
        self.chat_input.clear();
        self.activity = Activity::Expanding;
        Some(Call::new(
            Origin::SessionChat(self.token),
            Request::Chat {
                id: self.snapshot.id,
                message,
            },
        ))
    }

    /// Hand the transcript over for summarizing. The caller discards the
    /// session once the reply arrives.
    pub(super) fn begin_summary(&mut self) -> Call {
        self.activity = Activity::Summarizing;
        Call::new(
            Origin::SessionSummarize(self.token),
            Request::Summarize {
                id: self.snapshot.id,
                transcript: self.chat.clone(),
            },
        )
    }

    pub(super) fn on_ai_message(
        &mut self,
        origin: Origin,
        result: Result<Response, ApiError>,
    ) -> Vec<Effect> {
        self.activity = Activity::Idle;
        match result {
            Ok(Response::Expanded(expansion)) => {
                debug!(id = expansion.id, "ai message received");
                self.chat.push(ChatMessage::ai(expansion.expanded));
                vec![Effect::ScrollChat]
            }
            Ok(other) => {
                unexpected(origin, &other);
                Vec::new()
            }
            Err(e) => match origin {
                Origin::SessionExpand(_) => {
                    error!(error = %e, id = self.snapshot.id, "ai expansion failed");
                    vec![Effect::Alert("AI expansion failed".into())]
                }
                _ => {
                    error!(error = %e, id = self.snapshot.id, "ai chat failed");
                    Vec::new()
                }
            },
        }
    }

    pub(super) fn on_edit_saved(&mut self, updated: &Idea) {
        self.activity = Activity::Idle;
        self.snapshot = updated.clone();
        self.edited_title = updated.title.clone();
        self.edited_content = updated.content.clone();
        self.editing = false;
    }

    pub(super) fn on_edit_failed(&mut self) {
        self.activity = Activity::Idle;
    }
}
