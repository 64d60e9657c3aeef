//! Typed events decoded from a chat event stream.

use crate::callbacks::StreamCallbacks;

/// One decoded record from the chat event stream.
///
/// Each well-formed record produces exactly one event; the decoder emits it
/// once and keeps no copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// The backend assigned (or confirmed) the conversation's session.
    SessionEstablished {
        /// Session identifier to send with follow-up requests.
        session_id: String,
    },
    /// Incremental assistant text.
    TokenDelta {
        /// Text fragment, to be appended to the assistant turn.
        text: String,
    },
    /// The backend finished generating this response.
    StreamCompleted,
}

impl ChatEvent {
    /// Build a [`ChatEvent::SessionEstablished`].
    pub fn session(session_id: impl Into<String>) -> Self {
        Self::SessionEstablished {
            session_id: session_id.into(),
        }
    }

    /// Build a [`ChatEvent::TokenDelta`].
    pub fn delta(text: impl Into<String>) -> Self {
        Self::TokenDelta { text: text.into() }
    }

    /// The wire tag this event was decoded from.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::SessionEstablished { .. } => "session",
            Self::TokenDelta { .. } => "delta",
            Self::StreamCompleted => "done",
        }
    }

    /// Route this event to the matching hook on `callbacks`.
    pub fn dispatch<C: StreamCallbacks + ?Sized>(self, callbacks: &mut C) {
        match self {
            Self::SessionEstablished { session_id } => callbacks.on_session(&session_id),
            Self::TokenDelta { text } => callbacks.on_delta(&text),
            Self::StreamCompleted => callbacks.on_done(),
        }
    }
}
