//! Client configuration from the environment.

use std::time::Duration;

use chatstream_types::ChatError;

use crate::client::{ChatClient, DEFAULT_BASE_URL};

/// Environment variable holding the backend base URL.
pub const BASE_URL_VAR: &str = "CHATSTREAM_BASE_URL";

/// Environment variable holding the connect timeout in whole seconds.
pub const CONNECT_TIMEOUT_VAR: &str = "CHATSTREAM_CONNECT_TIMEOUT_SECS";

/// Settings used to build a [`ChatClient`].
///
/// Only the connect phase is bounded; a streaming response may legitimately
/// stay open for as long as the backend keeps generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without the `/api` suffix.
    pub base_url: String,
    /// Connect timeout, or `None` for reqwest's default.
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Read [`BASE_URL_VAR`] and [`CONNECT_TIMEOUT_VAR`] from the process
    /// environment.
    pub fn from_env() -> Result<Self, ChatError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Unset or blank variables fall back to defaults; a timeout that is not a
    /// whole number of seconds is rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ChatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup(CONNECT_TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|e| {
                ChatError::Config(format!("{CONNECT_TIMEOUT_VAR}={raw:?}: {e}"))
            })?;
            config.connect_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Build the client.
    pub fn build(self) -> Result<ChatClient, ChatError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ChatError::Config(format!("failed to build HTTP client: {e}")))?;

        tracing::debug!(base_url = %self.base_url, connect_timeout = ?self.connect_timeout, "chat client configured");

        let mut client = ChatClient::new().base_url(self.base_url).http_client(http);
        client.connect_timeout = self.connect_timeout;
        Ok(client)
    }
}
