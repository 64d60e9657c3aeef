//! Chat backend client struct and builder.

use std::time::Duration;

use chatstream_types::{
    ChatError, ChatRequest, ChatResponse, EventStream, HealthStatus, StreamCallbacks,
};
use reqwest::header::ACCEPT;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::error::{map_http_status, map_reqwest_error};
use crate::streaming::{drive, stream_events};

/// Default backend base URL.
pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const CHAT_PATH: &str = "/api/chat";
const HEALTH_PATH: &str = "/api/health";
const EVENT_STREAM: &str = "text/event-stream";
const JSON: &str = "application/json";

/// Client for the chat backend.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Example
///
/// ```no_run
/// use chatstream_client::ChatClient;
///
/// let client = ChatClient::new().base_url("http://localhost:8000");
/// ```
#[derive(Debug, Clone)]
pub struct ChatClient {
    /// Backend base URL (override for testing or proxies).
    pub(crate) base_url: String,
    /// Connect timeout the HTTP client was built with, if any.
    pub(crate) connect_timeout: Option<Duration>,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatClient {
    /// Create a client pointed at `http://localhost:8000`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            connect_timeout: None,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client configured from `CHATSTREAM_*` environment variables.
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self, ChatError> {
        ClientConfig::from_env()?.build()
    }

    /// Override the backend base URL.
    ///
    /// Useful for testing with a local mock server or a proxy.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Use a preconfigured [`reqwest::Client`].
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Build the chat endpoint URL.
    pub(crate) fn chat_url(&self) -> String {
        format!("{}{CHAT_PATH}", self.base_url)
    }

    /// Build the health endpoint URL.
    pub(crate) fn health_url(&self) -> String {
        format!("{}{HEALTH_PATH}", self.base_url)
    }

    /// Send a chat request and stream the reply.
    ///
    /// A non-success status is returned as [`ChatError::Status`] before any
    /// decoding begins. The returned [`EventStream`] yields events in record
    /// order; a body read failure is yielded once as `Err` and ends it.
    pub async fn stream_message(&self, request: &ChatRequest) -> Result<EventStream, ChatError> {
        let url = self.chat_url();
        tracing::debug!(url = %url, session_id = ?request.session_id, "sending streaming chat request");

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, EVENT_STREAM)
            .json(request)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.connect_timeout))?;

        let status = response.status();
        if !status.is_success() {
            // The status is the error; a body that fails to read only loses detail.
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(error = %e, %status, "failed to read error response body");
                    String::new()
                }
            };
            return Err(map_http_status(status, &body));
        }

        Ok(stream_events(response))
    }

    /// Send a chat request and deliver the reply through `callbacks`.
    ///
    /// Transport failures, including a non-success status, are passed to
    /// [`StreamCallbacks::on_error`] and returned. Once `cancel` fires no
    /// further hooks run and `Ok(())` is returned.
    pub async fn stream_message_with<C>(
        &self,
        request: &ChatRequest,
        callbacks: &mut C,
        cancel: &CancellationToken,
    ) -> Result<(), ChatError>
    where
        C: StreamCallbacks + ?Sized,
    {
        let opened = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!("chat request cancelled before the response arrived");
                return Ok(());
            }
            opened = self.stream_message(request) => opened,
        };

        match opened {
            Ok(stream) => drive(stream, callbacks, cancel).await,
            Err(err) => {
                callbacks.on_error(&err);
                Err(err)
            }
        }
    }

    /// Send a chat request and wait for the complete reply.
    pub async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let url = self.chat_url();
        tracing::debug!(url = %url, session_id = ?request.session_id, "sending chat request");

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, JSON)
            .json(request)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.connect_timeout))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| map_reqwest_error(e, self.connect_timeout))?;

        if !status.is_success() {
            return Err(map_http_status(status, &response_text));
        }

        serde_json::from_str(&response_text)
            .map_err(|e| ChatError::InvalidResponse(format!("invalid chat response: {e}")))
    }

    /// Query the backend's health endpoint.
    pub async fn health(&self) -> Result<HealthStatus, ChatError> {
        let url = self.health_url();
        tracing::debug!(url = %url, "checking backend health");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.connect_timeout))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| map_reqwest_error(e, self.connect_timeout))?;

        if !status.is_success() {
            return Err(map_http_status(status, &response_text));
        }

        serde_json::from_str(&response_text)
            .map_err(|e| ChatError::InvalidResponse(format!("invalid health response: {e}")))
    }
}
