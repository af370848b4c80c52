//! A tiny in-memory idea server for integration tests.
//!
//! An axum router on its own tokio runtime thread. Every request is logged
//! before routing, and any route can be told to answer 500.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use axum::Router;
use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post, put};
use serde::Deserialize;
use serde_json::{Value, json};

/// One request as the server saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Default)]
struct Store {
    ideas: Vec<Value>,
    next_id: u64,
    requests: Vec<Recorded>,
    /// "METHOD /path" pairs that answer 500
    failing: Vec<String>,
}

impl Store {
    fn insert(&mut self, title: &str, content: &str) -> Value {
        let idea = json!({"id": self.next_id, "title": title, "content": content});
        self.next_id += 1;
        self.ideas.push(idea.clone());
        idea
    }

    fn find(&mut self, id: u64) -> Option<&mut Value> {
        self.ideas.iter_mut().find(|i| i["id"] == id)
    }
}

type Shared = Arc<Mutex<Store>>;

const NOT_FOUND: (StatusCode, &str) = (StatusCode::NOT_FOUND, "no such idea");

pub struct StubServer {
    pub url: String,
    store: Shared,
}

impl StubServer {
    /// Start a server seeded with `(title, content)` ideas, ids from 1
    pub fn start(seed: &[(&str, &str)]) -> StubServer {
        let mut store = Store {
            next_id: 1,
            ..Store::default()
        };
        for (title, content) in seed {
            store.insert(title, content);
        }
        let store = Arc::new(Mutex::new(store));
        let app = router(Arc::clone(&store));

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });
        let addr = rx.recv().unwrap();

        StubServer {
            url: format!("http://{}", addr),
            store,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.store.lock().unwrap().requests.clone()
    }

    /// Requests matching `method` and `path`
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn ideas(&self) -> Vec<Value> {
        self.store.lock().unwrap().ideas.clone()
    }

    /// Make `method path` answer 500 from now on
    pub fn fail(&self, method: &str, path: &str) {
        self.store
            .lock()
            .unwrap()
            .failing
            .push(format!("{} {}", method, path));
    }

    /// Give an idea stored AI expansion
    pub fn set_expanded(&self, id: u64, text: &str) {
        if let Some(idea) = self.store.lock().unwrap().find(id) {
            idea["expandedContent"] = json!(text);
        }
    }
}

fn router(store: Shared) -> Router {
    Router::new()
        .route("/ideas", get(list_ideas).post(create_idea))
        .route("/ideas/{id}", put(update_idea).delete(delete_idea))
        .route("/ideas/{id}/ai-expand", post(expand_idea))
        .route("/ideas/{id}/ai-chat", post(chat_idea))
        .layer(middleware::from_fn_with_state(Arc::clone(&store), record))
        .with_state(store)
}

/// Log the request, then either fail it or pass it on
async fn record(State(store): State<Shared>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Ok(bytes) = axum::body::to_bytes(body, usize::MAX).await else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let recorded = Recorded {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    };
    let failing = {
        let mut store = store.lock().unwrap();
        let key = format!("{} {}", recorded.method, recorded.path);
        store.requests.push(recorded);
        store.failing.contains(&key)
    };
    if failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

#[derive(Deserialize)]
struct IdeaBody {
    title: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatBody {
    message: String,
}

async fn list_ideas(State(store): State<Shared>) -> Json<Value> {
    Json(Value::Array(store.lock().unwrap().ideas.clone()))
}

async fn create_idea(
    State(store): State<Shared>,
    Json(body): Json<IdeaBody>,
) -> (StatusCode, Json<Value>) {
    let idea = store.lock().unwrap().insert(&body.title, &body.content);
    (StatusCode::CREATED, Json(idea))
}

async fn update_idea(
    Path(id): Path<u64>,
    State(store): State<Shared>,
    Json(body): Json<IdeaBody>,
) -> Result<Json<Value>, (StatusCode, &'static str)> {
    let mut store = store.lock().unwrap();
    let idea = store.find(id).ok_or(NOT_FOUND)?;
    idea["title"] = json!(body.title);
    idea["content"] = json!(body.content);
    Ok(Json(idea.clone()))
}

async fn delete_idea(Path(id): Path<u64>, State(store): State<Shared>) -> StatusCode {
    let mut store = store.lock().unwrap();
    let before = store.ideas.len();
    store.ideas.retain(|i| i["id"] != id);
    if store.ideas.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

/// An empty body asks for an expansion; an array body is a chat transcript
/// to fold into the idea.
async fn expand_idea(
    Path(id): Path<u64>,
    State(store): State<Shared>,
    body: String,
) -> Result<Response, (StatusCode, &'static str)> {
    let mut store = store.lock().unwrap();
    let idea = store.find(id).ok_or(NOT_FOUND)?;
    let request: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

    if let Some(transcript) = request.as_array() {
        let content = format!(
            "{}\n\nDiscussed in {} messages.",
            idea["content"].as_str().unwrap_or(""),
            transcript.len()
        );
        idea["content"] = json!(content);
        return Ok("Summary saved".into_response());
    }
    let expanded = format!("Expanded: {}", idea["title"].as_str().unwrap_or(""));
    Ok(Json(json!({"id": id, "expanded": expanded})).into_response())
}

async fn chat_idea(
    Path(id): Path<u64>,
    State(store): State<Shared>,
    Json(body): Json<ChatBody>,
) -> Result<Json<Value>, (StatusCode, &'static str)> {
    let mut store = store.lock().unwrap();
    store.find(id).ok_or(NOT_FOUND)?;
    let reply = format!("Re: {}", body.message);
    Ok(Json(json!({"id": id, "expanded": reply})))
}
