//! Client-side state for the idea board.
//!
//! Nothing in here touches the network. Operations that need the server
//! return a [`Call`]; whoever drives the state (the TUI event loop, a test)
//! performs it and feeds the outcome back as a [`Reply`] with the same
//! [`Origin`], one reply at a time.

pub mod composer;
pub mod form;
pub mod list;
pub mod preview;
pub mod session;

pub use composer::Composer;
pub use form::{FormState, IdeaForm};
pub use list::IdeaList;
pub use preview::get_preview;
pub use session::{Activity, Session, SessionToken};

use crate::io::api::ApiError;
use crate::model::{ChatMessage, Expansion, Idea, IdeaId};

/// Sequence number of a list refresh. Only the newest one may land.
pub type RefreshGen = u64;

/// A request to the idea server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List,
    Create { title: String, content: String },
    Update { id: IdeaId, title: String, content: String },
    Delete { id: IdeaId },
    Expand { id: IdeaId },
    Chat { id: IdeaId, message: String },
    Summarize { id: IdeaId, transcript: Vec<ChatMessage> },
}

/// Successful payload of a [`Request`]
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Ideas(Vec<Idea>),
    Idea(Idea),
    Deleted,
    Expanded(Expansion),
    Summarized(serde_json::Value),
}

/// Which operation issued a request, so its reply lands in the right place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    FormCreate,
    Refresh(RefreshGen),
    Delete(IdeaId),
    RowExpand(IdeaId),
    SessionExpand(SessionToken),
    SessionChat(SessionToken),
    SessionSave(SessionToken),
    SessionSummarize(SessionToken),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub origin: Origin,
    pub request: Request,
}

impl Call {
    pub fn new(origin: Origin, request: Request) -> Self {
        Call { origin, request }
    }
}

#[derive(Debug)]
pub struct Reply {
    pub origin: Origin,
    pub result: Result<Response, ApiError>,
}

/// Something the driver has to act on after an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Perform this request and feed back its reply
    Call(Call),
    /// Blocking, user-visible error
    Alert(String),
    /// The form stored a new idea
    Saved,
    /// Scroll the chat transcript to its newest message once layout settles
    ScrollChat,
}

impl From<Call> for Effect {
    fn from(call: Call) -> Self {
        Effect::Call(call)
    }
}

/// Wrap an optional call into an effect list
pub fn effects_of(call: Option<Call>) -> Vec<Effect> {
    call.map(Effect::Call).into_iter().collect()
}

/// A reply whose payload does not match the request it answers. Only a
/// misbehaving driver produces these.
pub(crate) fn unexpected(origin: Origin, response: &Response) {
    tracing::error!(?origin, ?response, "reply does not match request");
}
