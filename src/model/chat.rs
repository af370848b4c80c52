use serde::{Deserialize, Serialize};

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "you",
            Sender::Ai => "ai",
        }
    }
}

/// One entry of a session's chat transcript. Never stored on its own;
/// the whole transcript is handed to the summarize endpoint on close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            sender: Sender::User,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        ChatMessage {
            sender: Sender::Ai,
            content: content.into(),
        }
    }
}
