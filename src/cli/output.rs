use serde::Serialize;

use crate::model::{ChatMessage, Idea, IdeaId};
use crate::ops::get_preview;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct IdeaSummaryJson {
    pub id: IdeaId,
    pub title: String,
    pub preview: String,
    pub expanded: bool,
}

#[derive(Serialize)]
pub struct ChatJson {
    pub id: IdeaId,
    pub transcript: Vec<ChatMessage>,
    pub saved: bool,
}

#[derive(Serialize)]
pub struct ConfigJson<'a> {
    pub path: String,
    pub api_url: &'a str,
    pub timeout_secs: Option<u64>,
    pub log_level: &'a str,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn idea_to_summary(idea: &Idea) -> IdeaSummaryJson {
    IdeaSummaryJson {
        id: idea.id,
        title: idea.title.clone(),
        preview: get_preview(Some(&idea.content)),
        expanded: idea.expanded_content.is_some(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One list row: right-aligned id, title, preview. A `*` marks ideas with
/// stored AI expansion.
pub fn format_idea_row(idea: &Idea) -> String {
    let marker = if idea.expanded_content.is_some() {
        "*"
    } else {
        " "
    };
    format!(
        "{:>4}{} {}  {}",
        idea.id,
        marker,
        idea.title,
        get_preview(Some(&idea.content))
    )
}

/// Full idea: title line, content, then the expansion (if any) under a rule.
pub fn format_idea_detail(idea: &Idea) -> String {
    let mut out = format!("#{} {}\n\n{}\n", idea.id, idea.title, idea.content);
    if let Some(expanded) = &idea.expanded_content {
        out.push_str("\n--- expanded ---\n\n");
        out.push_str(expanded);
        out.push('\n');
    }
    out
}

/// One chat message, prefixed with its sender
pub fn format_chat_message(message: &ChatMessage) -> String {
    format!("{}> {}", message.sender.label(), message.content)
}
