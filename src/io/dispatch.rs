use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use tracing::debug;

use crate::io::api::{ApiError, IdeaApi};
use crate::ops::{Call, Reply, Request, Response};

/// Run one request against the server
pub fn perform(api: &dyn IdeaApi, request: Request) -> Result<Response, ApiError> {
    match request {
        Request::List => api.list().map(Response::Ideas),
        Request::Create { title, content } => api.create(&title, &content).map(Response::Idea),
        Request::Update { id, title, content } => {
            api.update(id, &title, &content).map(Response::Idea)
        }
        Request::Delete { id } => api.delete(id).map(|()| Response::Deleted),
        Request::Expand { id } => api.expand(id).map(Response::Expanded),
        Request::Chat { id, message } => api.chat(id, &message).map(Response::Expanded),
        Request::Summarize { id, transcript } => {
            api.summarize(id, &transcript).map(Response::Summarized)
        }
    }
}

/// Runs calls off the UI thread. Each call gets its own worker thread; its
/// reply is queued until the event loop polls for it.
pub struct Dispatcher {
    api: Arc<dyn IdeaApi>,
    tx: mpsc::Sender<Reply>,
    rx: mpsc::Receiver<Reply>,
    in_flight: usize,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn IdeaApi>) -> Self {
        let (tx, rx) = mpsc::channel();
        Dispatcher {
            api,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Start a call. Returns immediately.
    pub fn submit(&mut self, call: Call) {
        debug!(origin = ?call.origin, "dispatching");
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let result = perform(api.as_ref(), call.request);
            // The receiver only goes away when the UI is shutting down
            let _ = tx.send(Reply {
                origin: call.origin,
                result,
            });
        });
    }

    /// Non-blocking poll for finished calls, in completion order.
    pub fn poll(&mut self) -> Vec<Reply> {
        let mut replies = Vec::new();
        while let Ok(reply) = self.rx.try_recv() {
            replies.push(reply);
        }
        self.in_flight = self.in_flight.saturating_sub(replies.len());
        replies
    }

    /// Number of calls whose replies have not been polled yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
