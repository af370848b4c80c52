use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::model::{ApiConfig, ChatMessage, ChatRequest, Expansion, Idea, IdeaFields, IdeaId};

/// Error type for idea server requests
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The idea server, one method per endpoint. Every call is independent and
/// sent at most once; nothing is retried or cached.
pub trait IdeaApi: Send + Sync {
    fn list(&self) -> Result<Vec<Idea>, ApiError>;
    fn create(&self, title: &str, content: &str) -> Result<Idea, ApiError>;
    fn update(&self, id: IdeaId, title: &str, content: &str) -> Result<Idea, ApiError>;
    fn delete(&self, id: IdeaId) -> Result<(), ApiError>;
    /// Context-free AI elaboration of one idea
    fn expand(&self, id: IdeaId) -> Result<Expansion, ApiError>;
    /// AI reply to a single user message
    fn chat(&self, id: IdeaId, message: &str) -> Result<Expansion, ApiError>;
    /// Fold a chat transcript into the idea's stored content. The payload is
    /// opaque; callers only care whether it succeeded.
    fn summarize(
        &self,
        id: IdeaId,
        transcript: &[ChatMessage],
    ) -> Result<serde_json::Value, ApiError>;
}

/// `IdeaApi` over HTTP
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()?;
        Ok(HttpApi {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/ideas{}", self.base_url, path)
    }

    /// Send a request and return the body of a 2xx response
    fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;
        debug!(status = status.as_u16(), bytes = body.len(), "response");
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request)?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl IdeaApi for HttpApi {
    fn list(&self) -> Result<Vec<Idea>, ApiError> {
        let url = self.url("");
        debug!(%url, "GET");
        self.send_json(self.client.get(&url))
    }

    fn create(&self, title: &str, content: &str) -> Result<Idea, ApiError> {
        let url = self.url("");
        debug!(%url, "POST");
        let body = IdeaFields {
            title: title.to_string(),
            content: content.to_string(),
        };
        self.send_json(self.client.post(&url).json(&body))
    }

    fn update(&self, id: IdeaId, title: &str, content: &str) -> Result<Idea, ApiError> {
        let url = self.url(&format!("/{}", id));
        debug!(%url, "PUT");
        let body = IdeaFields {
            title: title.to_string(),
            content: content.to_string(),
        };
        self.send_json(self.client.put(&url).json(&body))
    }

    fn delete(&self, id: IdeaId) -> Result<(), ApiError> {
        let url = self.url(&format!("/{}", id));
        debug!(%url, "DELETE");
        self.send(self.client.delete(&url))?;
        Ok(())
    }

    fn expand(&self, id: IdeaId) -> Result<Expansion, ApiError> {
        let url = self.url(&format!("/{}/ai-expand", id));
        debug!(%url, "POST");
        self.send_json(self.client.post(&url))
    }

    fn chat(&self, id: IdeaId, message: &str) -> Result<Expansion, ApiError> {
        let url = self.url(&format!("/{}/ai-chat", id));
        debug!(%url, "POST");
        let body = ChatRequest {
            message: message.to_string(),
        };
        self.send_json(self.client.post(&url).json(&body))
    }

    // Same path as `expand`; the server tells them apart by the array body.
    fn summarize(
        &self,
        id: IdeaId,
        transcript: &[ChatMessage],
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.url(&format!("/{}/ai-expand", id));
        debug!(%url, messages = transcript.len(), "POST");
        let body = self.send(self.client.post(&url).json(transcript))?;
        Ok(opaque_payload(&body))
    }
}

/// Empty bodies read as `null`, non-JSON bodies as a plain string.
fn opaque_payload(body: &str) -> serde_json::Value {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| serde_json::Value::String(body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let api = HttpApi::new(&ApiConfig {
            url: "http://example.test/api/".into(),
            timeout_secs: None,
        })
        .unwrap();
        assert_eq!(api.base_url(), "http://example.test/api");
        assert_eq!(api.url("/3/ai-chat"), "http://example.test/api/ideas/3/ai-chat");
    }

    #[test]
    fn opaque_payload_shapes() {
        assert_eq!(opaque_payload(""), serde_json::Value::Null);
        assert_eq!(opaque_payload("  \n"), serde_json::Value::Null);
        assert_eq!(
            opaque_payload("\"done\""),
            serde_json::Value::String("done".into())
        );
        assert_eq!(
            opaque_payload("Summary saved"),
            serde_json::Value::String("Summary saved".into())
        );
        assert_eq!(opaque_payload(r#"{"ok":true}"#)["ok"], true);
    }
}
