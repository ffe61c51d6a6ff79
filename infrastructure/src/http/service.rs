//! reqwest-backed implementation of [`ChatServicePort`].

use super::error::{HttpError, Result};
use super::wire::{SendReplyDto, SessionRecord};
use crate::config::FileServiceConfig;
use async_trait::async_trait;
use chatsync_application::{ChatServicePort, RemoteError, SendReply};
use chatsync_domain::{Message, Session, SessionId};
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_USER_AGENT: &str = concat!("chatsync/", env!("CARGO_PKG_VERSION"));

/// Chat service reached over its REST API.
///
/// | Operation | Request |
/// |-----------|---------|
/// | list sessions | `GET {endpoint}/chats` |
/// | load history | `GET {endpoint}/chat/{id}` |
/// | send | `POST {endpoint}/chat[?chat_id={id}]`, `text/plain` body |
pub struct HttpChatService {
    client: reqwest::Client,
    base: Url,
}

impl HttpChatService {
    /// Service at `endpoint` with no timeout and the default user agent.
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::build(endpoint, None, None)
    }

    pub fn from_config(config: &FileServiceConfig) -> Result<Self> {
        let timeout = config
            .timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        Self::build(&config.endpoint, timeout, config.user_agent.as_deref())
    }

    fn build(endpoint: &str, timeout: Option<Duration>, user_agent: Option<&str>) -> Result<Self> {
        let base = parse_endpoint(endpoint)?;

        let mut builder =
            reqwest::Client::builder().user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;

        Ok(Self { client, base })
    }

    pub fn endpoint(&self) -> &Url {
        &self.base
    }

    /// Base URL with `segments` appended, each percent-encoded as one segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| HttpError::decode(e, &body))
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let invalid = |reason: &str| HttpError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(endpoint.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("not a base URL"));
    }
    Ok(url)
}

#[async_trait]
impl ChatServicePort for HttpChatService {
    async fn list_sessions(&self) -> std::result::Result<Vec<Session>, RemoteError> {
        let url = self.url(&["chats"]);
        debug!("GET {}", url);

        let records: Vec<SessionRecord> = self.fetch_json(self.client.get(url)).await?;

        let mut sessions = Vec::with_capacity(records.len());
        for record in records {
            match record.into_session() {
                Ok(session) => sessions.push(session),
                Err(e) => warn!("Skipping listed session: {}", e),
            }
        }
        Ok(sessions)
    }

    async fn load_history(
        &self,
        session: &SessionId,
    ) -> std::result::Result<Vec<Message>, RemoteError> {
        let url = self.url(&["chat", session.as_str()]);
        debug!("GET {}", url);

        Ok(self.fetch_json(self.client.get(url)).await?)
    }

    async fn send_message(
        &self,
        text: &str,
        session: Option<&SessionId>,
    ) -> std::result::Result<SendReply, RemoteError> {
        let mut url = self.url(&["chat"]);
        if let Some(id) = session {
            url.query_pairs_mut().append_pair("chat_id", id.as_str());
        }
        debug!("POST {} ({} bytes)", url, text.len());

        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(text.to_string());
        let dto: SendReplyDto = self.fetch_json(request).await?;

        dto.into_reply(session.is_some())
            .map_err(|e| RemoteError::parse(format!("Invalid chat identity in reply: {}", e)))
    }
}
