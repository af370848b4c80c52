use std::collections::HashSet;

use tracing::{debug, error, info, warn};

use crate::io::api::ApiError;
use crate::model::{Idea, IdeaId};

use super::session::{Activity, Session, SessionToken};
use super::{Call, Effect, Origin, RefreshGen, Request, Response, unexpected};

/// The idea collection and everything that hangs off it: loading state,
/// per-row inline expansion, the delete prompt and the expanded session.
#[derive(Debug, Default)]
pub struct IdeaList {
    ideas: Vec<Idea>,
    loading: bool,
    /// Rows with an inline expansion in flight
    row_expanding: HashSet<IdeaId>,
    pending_delete: Option<Idea>,
    session: Option<Session>,
    last_token: SessionToken,
    last_refresh: RefreshGen,
}

impl IdeaList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ideas(&self) -> &[Idea] {
        &self.ideas
    }

    pub fn find(&self, id: IdeaId) -> Option<&Idea> {
        self.ideas.iter().find(|i| i.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_row_expanding(&self, id: IdeaId) -> bool {
        self.row_expanding.contains(&id)
    }

    pub fn pending_delete(&self) -> Option<&Idea> {
        self.pending_delete.as_ref()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// First load
    pub fn init(&mut self) -> Call {
        self.refresh()
    }

    /// Reload the whole collection. Supersedes any refresh still in flight.
    pub fn refresh(&mut self) -> Call {
        self.loading = true;
        self.last_refresh += 1;
        Call::new(Origin::Refresh(self.last_refresh), Request::List)
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// Stage an idea for deletion (drives the confirmation prompt)
    pub fn confirm_delete(&mut self, id: IdeaId) -> bool {
        self.pending_delete = self.find(id).cloned();
        self.pending_delete.is_some()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn delete_idea(&mut self, id: IdeaId) -> Call {
        info!(id, "deleting idea");
        Call::new(Origin::Delete(id), Request::Delete { id })
    }

    /// Delete whatever `confirm_delete` staged
    pub fn delete_pending(&mut self) -> Option<Call> {
        let id = self.pending_delete.as_ref()?.id;
        Some(self.delete_idea(id))
    }

    // -----------------------------------------------------------------------
    // Inline row expansion
    // -----------------------------------------------------------------------

    /// Expand one row in place. Rows expand independently of each other and
    /// of the session; a row already expanding is left alone.
    pub fn expand_idea(&mut self, id: IdeaId) -> Option<Call> {
        if self.find(id).is_none() || !self.row_expanding.insert(id) {
            return None;
        }
        Some(Call::new(Origin::RowExpand(id), Request::Expand { id }))
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    /// Open the expanded view on a copy of the idea. Any session already
    /// open is replaced without summarizing.
    pub fn open_idea(&mut self, id: IdeaId) -> bool {
        let idea = match self.find(id) {
            Some(idea) => idea.clone(),
            None => return false,
        };
        self.last_token += 1;
        debug!(id, token = self.last_token, "session opened");
        self.session = Some(Session::open(self.last_token, &idea));
        true
    }

    /// Close the expanded view. An empty chat closes immediately; otherwise
    /// the transcript is summarized first and the session goes away when
    /// that reply arrives.
    pub fn close_idea(&mut self) -> Option<Call> {
        let session = self.session.as_mut()?;
        if session.activity() == Activity::Summarizing {
            return None;
        }
        if !session.chat().is_empty() {
            return Some(session.begin_summary());
        }
        self.session = None;
        None
    }

    pub fn begin_edit(&mut self) -> bool {
        self.session.as_mut().is_some_and(Session::begin_edit)
    }

    pub fn cancel_edit(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.cancel_edit();
        }
    }

    pub fn save_edits(&mut self) -> Option<Call> {
        self.session.as_mut()?.save_edits()
    }

    pub fn start_expansion(&mut self) -> Option<Call> {
        self.session.as_mut()?.start_expansion()
    }

    pub fn send_user_message(&mut self) -> Option<Call> {
        self.session.as_mut()?.send_user_message()
    }

    /// The open session, if the reply for `token` is still the one it waits on
    fn live_session(&mut self, token: SessionToken, activity: Activity) -> Option<&mut Session> {
        self.session
            .as_mut()
            .filter(|s| s.token() == token && s.activity() == activity)
    }

    // -----------------------------------------------------------------------
    // Replies
    // -----------------------------------------------------------------------

    /// Apply the reply to a call this list issued
    pub fn apply(&mut self, origin: Origin, result: Result<Response, ApiError>) -> Vec<Effect> {
        match origin {
            Origin::Refresh(generation) => self.on_refreshed(generation, result),
            Origin::Delete(id) => self.on_deleted(id, result),
            Origin::RowExpand(id) => self.on_row_expanded(id, result),
            Origin::SessionExpand(token) | Origin::SessionChat(token) => {
                match self.live_session(token, Activity::Expanding) {
                    Some(session) => session.on_ai_message(origin, result),
                    None => {
                        debug!(?origin, "ignoring reply for a closed session");
                        Vec::new()
                    }
                }
            }
            Origin::SessionSave(token) => self.on_edit_saved(token, result),
            Origin::SessionSummarize(token) => self.on_summarized(token, result),
            Origin::FormCreate => {
                warn!("form reply routed to the idea list");
                Vec::new()
            }
        }
    }

    fn on_refreshed(
        &mut self,
        generation: RefreshGen,
        result: Result<Response, ApiError>,
    ) -> Vec<Effect> {
        // An older list may finish after a newer one
        if !self.loading || generation != self.last_refresh {
            debug!(generation, latest = self.last_refresh, "ignoring superseded refresh");
            return Vec::new();
        }
        self.loading = false;
        match result {
            Ok(Response::Ideas(ideas)) => {
                debug!(count = ideas.len(), "ideas refreshed");
                self.ideas = dedup_by_id(ideas);
                Vec::new()
            }
            Ok(other) => {
                unexpected(Origin::Refresh(generation), &other);
                Vec::new()
            }
            Err(e) => {
                error!(error = %e, "loading ideas failed");
                vec![Effect::Alert("Failed to load ideas.".into())]
            }
        }
    }

    fn on_deleted(&mut self, id: IdeaId, result: Result<Response, ApiError>) -> Vec<Effect> {
        if self.pending_delete.as_ref().is_some_and(|i| i.id == id) {
            self.pending_delete = None;
        }
        match result {
            Ok(Response::Deleted) => {
                self.ideas.retain(|i| i.id != id);
                self.row_expanding.remove(&id);
                // The idea is gone server-side, so there is nothing to summarize into
                if self.session.as_ref().is_some_and(|s| s.idea_id() == id) {
                    self.session = None;
                }
                info!(id, "idea deleted");
                Vec::new()
            }
            Ok(other) => {
                unexpected(Origin::Delete(id), &other);
                Vec::new()
            }
            Err(e) => {
                error!(error = %e, id, "deleting idea failed");
                vec![Effect::Alert("Failed to delete idea.".into())]
            }
        }
    }

    fn on_row_expanded(&mut self, id: IdeaId, result: Result<Response, ApiError>) -> Vec<Effect> {
        self.row_expanding.remove(&id);
        match result {
            Ok(Response::Expanded(expansion)) => {
                if let Some(idea) = self.ideas.iter_mut().find(|i| i.id == id) {
                    idea.expanded_content = Some(expansion.expanded);
                }
                Vec::new()
            }
            Ok(other) => {
                unexpected(Origin::RowExpand(id), &other);
                Vec::new()
            }
            Err(e) => {
                error!(error = %e, id, "ai expansion failed");
                vec![Effect::Alert("AI expansion failed".into())]
            }
        }
    }

    fn on_edit_saved(
        &mut self,
        token: SessionToken,
        result: Result<Response, ApiError>,
    ) -> Vec<Effect> {
        match result {
            Ok(Response::Idea(updated)) => {
                if let Some(entry) = self.ideas.iter_mut().find(|i| i.id == updated.id) {
                    *entry = updated.clone();
                }
                if let Some(session) = self.live_session(token, Activity::SavingEdit) {
                    session.on_edit_saved(&updated);
                }
                info!(id = updated.id, "edits saved");
                Vec::new()
            }
            Ok(other) => {
                unexpected(Origin::SessionSave(token), &other);
                if let Some(session) = self.live_session(token, Activity::SavingEdit) {
                    session.on_edit_failed();
                }
                Vec::new()
            }
            Err(e) => {
                error!(error = %e, "saving edits failed");
                match self.live_session(token, Activity::SavingEdit) {
                    Some(session) => {
                        session.on_edit_failed();
                        vec![Effect::Alert("Failed to save edits.".into())]
                    }
                    None => Vec::new(),
                }
            }
        }
    }

    fn on_summarized(
        &mut self,
        token: SessionToken,
        result: Result<Response, ApiError>,
    ) -> Vec<Effect> {
        if self.session.as_ref().is_some_and(|s| s.token() == token) {
            self.session = None;
        }
        match result {
            Ok(_) => {
                info!("chat summary saved");
                // The summary may have rewritten the idea
                vec![Effect::Call(self.refresh())]
            }
            Err(e) => {
                warn!(error = %e, "failed to save AI summary");
                Vec::new()
            }
        }
    }
}

/// Keep the first occurrence of each id
fn dedup_by_id(ideas: Vec<Idea>) -> Vec<Idea> {
    let mut seen = HashSet::new();
    let before = ideas.len();
    let unique: Vec<Idea> = ideas.into_iter().filter(|i| seen.insert(i.id)).collect();
    if unique.len() != before {
        warn!(dropped = before - unique.len(), "server returned duplicate idea ids");
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChatMessage, Expansion};
    use pretty_assertions::assert_eq;

    fn idea(id: IdeaId, title: &str) -> Idea {
        Idea {
            id,
            title: title.into(),
            content: format!("{} content", title),
            expanded_content: None,
        }
    }

    fn loaded(ideas: Vec<Idea>) -> IdeaList {
        let mut list = IdeaList::new();
        let call = list.init();
        assert!(list.is_loading());
        list.apply(call.origin, Ok(Response::Ideas(ideas)));
        assert!(!list.is_loading());
        list
    }

    fn failure() -> ApiError {
        ApiError::Status {
            status: 500,
            body: "nope".into(),
        }
    }

    fn expansion(id: IdeaId, text: &str) -> Result<Response, ApiError> {
        Ok(Response::Expanded(Expansion {
            id,
            expanded: text.into(),
        }))
    }

    fn summarize_calls(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    Effect::Call(Call {
                        request: Request::Summarize { .. },
                        ..
                    })
                )
            })
            .count()
    }

    #[test]
    fn refresh_replaces_collection_in_server_order() {
        let list = loaded(vec![idea(3, "c"), idea(1, "a")]);
        let ids: Vec<_> = list.ideas().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let list = loaded(vec![idea(1, "a"), idea(1, "dup"), idea(2, "b")]);
        assert_eq!(list.ideas().len(), 2);
        assert_eq!(list.ideas()[0].title, "a");
    }

    #[test]
    fn refresh_failure_keeps_ideas_and_alerts() {
        let mut list = loaded(vec![idea(1, "a")]);
        let call = list.refresh();
        let effects = list.apply(call.origin, Err(failure()));
        assert_eq!(effects, vec![Effect::Alert("Failed to load ideas.".into())]);
        assert!(!list.is_loading());
        assert_eq!(list.ideas().len(), 1);
    }

    #[test]
    fn superseded_refresh_is_dropped() {
        let mut list = loaded(vec![idea(1, "a")]);
        let older = list.refresh();
        let newer = list.refresh();
        assert_ne!(older.origin, newer.origin);

        list.apply(newer.origin, Ok(Response::Ideas(vec![idea(1, "a"), idea(2, "b")])));
        assert!(!list.is_loading());
        // The older list arrives last and must not win
        let effects = list.apply(older.origin, Ok(Response::Ideas(vec![idea(1, "a")])));
        assert!(effects.is_empty());
        let ids: Vec<_> = list.ideas().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn loading_holds_until_newest_refresh_lands() {
        let mut list = loaded(vec![]);
        let older = list.refresh();
        let newer = list.refresh();
        list.apply(older.origin, Ok(Response::Ideas(vec![idea(9, "old")])));
        assert!(list.is_loading());
        assert!(list.ideas().is_empty());

        // A stale failure does not alert either
        let mut failing = loaded(vec![]);
        let stale = failing.refresh();
        let _ = failing.refresh();
        assert!(failing.apply(stale.origin, Err(failure())).is_empty());

        list.apply(newer.origin, Ok(Response::Ideas(vec![idea(3, "new")])));
        assert!(!list.is_loading());
        assert_eq!(list.ideas()[0].id, 3);
    }

    #[test]
    fn opening_b_replaces_a() {
        let mut list = loaded(vec![idea(1, "a"), idea(2, "b")]);
        assert!(list.open_idea(1));
        list.session_mut().unwrap().chat_input = "hi".into();
        list.send_user_message().unwrap();
        assert!(list.open_idea(2));
        let session = list.session().unwrap();
        assert_eq!(session.idea_id(), 2);
        assert!(session.chat().is_empty());
        assert!(!session.is_editing());
        assert!(session.chat_input.is_empty());
    }

    #[test]
    fn open_unknown_id_is_refused() {
        let mut list = loaded(vec![idea(1, "a")]);
        assert!(!list.open_idea(9));
        assert!(list.session().is_none());
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut list = loaded(vec![idea(1, "a")]);
        list.open_idea(1);
        let call = list.expand_idea(1).unwrap();
        list.apply(call.origin, expansion(1, "long"));
        assert_eq!(list.ideas()[0].expanded_content.as_deref(), Some("long"));
        assert!(list.session().unwrap().snapshot().expanded_content.is_none());
    }

    #[test]
    fn close_without_chat_makes_no_call() {
        let mut list = loaded(vec![idea(1, "a")]);
        list.open_idea(1);
        assert!(list.close_idea().is_none());
        assert!(list.session().is_none());
    }

    #[test]
    fn close_with_chat_summarizes_then_refetches_once() {
        let mut list = loaded(vec![idea(1, "a")]);
        list.open_idea(1);
        let call = list.start_expansion().unwrap();
        list.apply(call.origin, expansion(1, "first"));
        list.session_mut().unwrap().chat_input = "more".into();
        let call = list.send_user_message().unwrap();
        list.apply(call.origin, expansion(1, "second"));

        let summarize = list.close_idea().unwrap();
        assert_eq!(
            summarize.request,
            Request::Summarize {
                id: 1,
                transcript: vec![
                    ChatMessage::ai("first"),
                    ChatMessage::user("more"),
                    ChatMessage::ai("second"),
                ],
            }
        );
        // Still open while summarizing; a second close does nothing
        assert_eq!(
            list.session().unwrap().activity(),
            Activity::Summarizing
        );
        assert!(list.close_idea().is_none());

        let effects = list.apply(
            summarize.origin,
            Ok(Response::Summarized(serde_json::Value::Null)),
        );
        assert!(list.session().is_none());
        assert_eq!(
            effects,
            vec![Effect::Call(Call::new(Origin::Refresh(2), Request::List))]
        );
        assert!(list.is_loading());
    }

    #[test]
    fn summarize_failure_still_closes_without_refetch() {
        let mut list = loaded(vec![idea(1, "a")]);
        list.open_idea(1);
        list.session_mut().unwrap().chat_input = "hello".into();
        let chat = list.send_user_message().unwrap();
        list.apply(chat.origin, expansion(1, "hi"));
        let summarize = list.close_idea().unwrap();
        let effects = list.apply(summarize.origin, Err(failure()));
        assert!(effects.is_empty());
        assert!(list.session().is_none());
    }

    #[test]
    fn delete_flow_removes_entry() {
        let mut list = loaded(vec![idea(1, "a"), idea(2, "b")]);
        assert!(list.confirm_delete(2));
        assert_eq!(list.pending_delete().unwrap().id, 2);
        let call = list.delete_pending().unwrap();
        assert_eq!(call.request, Request::Delete { id: 2 });
        let effects = list.apply(call.origin, Ok(Response::Deleted));
        assert!(effects.is_empty());
        assert!(list.pending_delete().is_none());
        assert_eq!(list.ideas().len(), 1);
        assert!(list.find(2).is_none());
    }

    #[test]
    fn deleting_open_idea_closes_session_without_summarize() {
        let mut list = loaded(vec![idea(1, "a")]);
        list.open_idea(1);
        list.session_mut().unwrap().chat_input = "unsaved".into();
        let chat = list.send_user_message().unwrap();
        list.apply(chat.origin, expansion(1, "reply"));

        list.confirm_delete(1);
        let call = list.delete_pending().unwrap();
        let effects = list.apply(call.origin, Ok(Response::Deleted));
        assert_eq!(summarize_calls(&effects), 0);
        assert!(effects.is_empty());
        assert!(list.session().is_none());
    }

    #[test]
    fn delete_failure_alerts_and_keeps_entry() {
        let mut list = loaded(vec![idea(1, "a")]);
        list.confirm_delete(1);
        let call = list.delete_pending().unwrap();
        let effects = list.apply(call.origin, Err(failure()));
        assert_eq!(effects, vec![Effect::Alert("Failed to delete idea.".into())]);
        assert_eq!(list.ideas().len(), 1);
        assert!(list.pending_delete().is_none());
    }

    #[test]
    fn row_expansions_are_independent() {
        let mut list = loaded(vec![idea(1, "a"), idea(2, "b"), idea(3, "c")]);
        let first = list.expand_idea(1).unwrap();
        let second = list.expand_idea(2).unwrap();
        assert!(list.is_row_expanding(1));
        assert!(list.is_row_expanding(2));
        // Same row again while in flight
        assert!(list.expand_idea(1).is_none());

        // Replies arrive in reverse order
        list.apply(second.origin, expansion(2, "two"));
        assert!(list.is_row_expanding(1));
        assert!(!list.is_row_expanding(2));
        list.apply(first.origin, expansion(1, "one"));

        let expanded: Vec<_> = list
            .ideas()
            .iter()
            .map(|i| i.expanded_content.as_deref())
            .collect();
        assert_eq!(expanded, vec![Some("one"), Some("two"), None]);
    }

    #[test]
    fn row_expansion_failure_alerts() {
        let mut list = loaded(vec![idea(1, "a")]);
        let call = list.expand_idea(1).unwrap();
        let effects = list.apply(call.origin, Err(failure()));
        assert_eq!(effects, vec![Effect::Alert("AI expansion failed".into())]);
        assert!(!list.is_row_expanding(1));
        assert!(list.ideas()[0].expanded_content.is_none());
    }

    #[test]
    fn save_edits_replaces_entry_and_snapshot() {
        let mut list = loaded(vec![idea(1, "a"), idea(2, "b")]);
        list.open_idea(2);
        assert!(list.begin_edit());
        list.session_mut().unwrap().edited_title = "b2".into();
        let call = list.save_edits().unwrap();
        let updated = Idea {
            id: 2,
            title: "b2".into(),
            content: "server content".into(),
            expanded_content: None,
        };
        list.apply(call.origin, Ok(Response::Idea(updated.clone())));
        assert_eq!(list.find(2), Some(&updated));
        let session = list.session().unwrap();
        assert_eq!(session.snapshot(), &updated);
        assert!(!session.is_editing());
        assert_eq!(session.edited_content, "server content");
    }

    #[test]
    fn save_edits_failure_stays_in_edit_mode() {
        let mut list = loaded(vec![idea(1, "a")]);
        list.open_idea(1);
        list.begin_edit();
        list.session_mut().unwrap().edited_content = "draft".into();
        let call = list.save_edits().unwrap();
        let effects = list.apply(call.origin, Err(failure()));
        assert_eq!(effects, vec![Effect::Alert("Failed to save edits.".into())]);
        let session = list.session().unwrap();
        assert!(session.is_editing());
        assert_eq!(session.edited_content, "draft");
        assert_eq!(session.activity(), Activity::Idle);
        assert_eq!(list.find(1).unwrap().content, "a content");
    }

    #[test]
    fn stale_chat_reply_after_reopen_is_ignored() {
        let mut list = loaded(vec![idea(1, "a"), idea(2, "b")]);
        list.open_idea(1);
        let call = list.start_expansion().unwrap();
        list.close_idea();
        list.open_idea(2);
        let effects = list.apply(call.origin, expansion(1, "late"));
        assert!(effects.is_empty());
        assert!(list.session().unwrap().chat().is_empty());
        assert!(list.start_expansion().is_some());
    }

    #[test]
    fn chat_reply_during_summary_is_not_appended() {
        let mut list = loaded(vec![idea(1, "a")]);
        list.open_idea(1);
        list.session_mut().unwrap().chat_input = "q".into();
        let chat = list.send_user_message().unwrap();
        let summarize = list.close_idea().unwrap();
        assert_eq!(
            summarize.request,
            Request::Summarize {
                id: 1,
                transcript: vec![ChatMessage::user("q")],
            }
        );
        list.apply(chat.origin, expansion(1, "late answer"));
        assert_eq!(list.session().unwrap().chat().len(), 1);
    }

    #[test]
    fn stale_edit_save_still_updates_collection() {
        let mut list = loaded(vec![idea(1, "a")]);
        list.open_idea(1);
        list.begin_edit();
        let call = list.save_edits().unwrap();
        list.close_idea();
        let updated = Idea {
            id: 1,
            title: "new".into(),
            content: "new content".into(),
            expanded_content: None,
        };
        list.apply(call.origin, Ok(Response::Idea(updated.clone())));
        assert_eq!(list.find(1), Some(&updated));
        assert!(list.session().is_none());
    }
}
