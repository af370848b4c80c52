use tracing::{error, info};

use crate::io::api::ApiError;

use super::{Call, Effect, Origin, Request, Response, unexpected};

/// Trim both fields and accept them only if neither ends up empty
pub fn validate(title: &str, content: &str) -> Option<(String, String)> {
    let title = title.trim();
    let content = content.trim();
    if title.is_empty() || content.is_empty() {
        return None;
    }
    Some((title.to_string(), content.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Saving,
}

/// The new-idea form
#[derive(Debug, Clone, Default)]
pub struct IdeaForm {
    pub title: String,
    pub content: String,
    state: FormState,
}

impl IdeaForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_saving(&self) -> bool {
        self.state == FormState::Saving
    }

    /// Start saving the idea. Blank fields and a save already in flight are
    /// ignored.
    pub fn submit(&mut self) -> Option<Call> {
        if self.is_saving() {
            return None;
        }
        let (title, content) = validate(&self.title, &self.content)?;
        info!(%title, "submitting idea");
        self.state = FormState::Saving;
        Some(Call::new(
            Origin::FormCreate,
            Request::Create { title, content },
        ))
    }

    pub fn on_created(&mut self, result: Result<Response, ApiError>) -> Vec<Effect> {
        self.state = FormState::Idle;
        match result {
            Ok(Response::Idea(idea)) => {
                info!(id = idea.id, "idea saved");
                self.title.clear();
                self.content.clear();
                vec![Effect::Saved]
            }
            Ok(other) => {
                unexpected(Origin::FormCreate, &other);
                Vec::new()
            }
            Err(e) => {
                error!(error = %e, "saving idea failed");
                vec![Effect::Alert("Error saving idea!".into())]
            }
        }
    }
}
