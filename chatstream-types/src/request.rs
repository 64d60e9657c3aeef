//! Request and response bodies for the chat backend.

use serde::{Deserialize, Serialize};

/// Body of a chat request, streaming or not.
///
/// `session_id` is serialized as `null` when absent so the backend starts a
/// new session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
    /// Session to continue, or `None` for a fresh conversation.
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// A request that starts a new session.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: None,
        }
    }

    /// Continue an existing session.
    #[must_use]
    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// One tool invocation the agent made while producing a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallInfo {
    /// Tool name.
    pub tool_name: String,
    /// Arguments the tool was called with.
    #[serde(default)]
    pub tool_input: serde_json::Map<String, serde_json::Value>,
    /// Tool output, stringified.
    #[serde(default)]
    pub tool_output: String,
}

/// Full reply from the non-streaming chat endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Final assistant text.
    pub reply: String,
    /// Session the reply belongs to.
    pub session_id: String,
    /// Tool calls made along the way, in call order.
    #[serde(default)]
    pub tool_calls: Vec<ToolCallInfo>,
}

/// Body of the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"ok"` when the backend is up.
    pub status: String,
}

impl HealthStatus {
    /// Whether the backend reported itself healthy.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
