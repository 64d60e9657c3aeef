//! Consumer hooks invoked as events are decoded.

use crate::error::ChatError;

/// Receives decoded events in stream order.
///
/// Hooks run synchronously on the task driving the stream. `on_error` is only
/// called for transport failures; malformed records are never reported.
pub trait StreamCallbacks {
    /// The backend established a session.
    fn on_session(&mut self, session_id: &str);
    /// A fragment of assistant text arrived.
    fn on_delta(&mut self, text: &str);
    /// The response is complete.
    fn on_done(&mut self);
    /// The transport failed. No further hooks fire after this one.
    fn on_error(&mut self, error: &ChatError);
}

/// [`StreamCallbacks`] built from four closures.
///
/// ```
/// use chatstream_types::{ChatError, ChatEvent, FnCallbacks};
///
/// let mut text = String::new();
/// let mut callbacks = FnCallbacks::new(
///     |_session: &str| {},
///     |delta: &str| text.push_str(delta),
///     || {},
///     |_err: &ChatError| {},
/// );
/// ChatEvent::delta("Hi").dispatch(&mut callbacks);
/// drop(callbacks);
/// assert_eq!(text, "Hi");
/// ```
pub struct FnCallbacks<S, D, F, E> {
    on_session: S,
    on_delta: D,
    on_done: F,
    on_error: E,
}

impl<S, D, F, E> FnCallbacks<S, D, F, E>
where
    S: FnMut(&str),
    D: FnMut(&str),
    F: FnMut(),
    E: FnMut(&ChatError),
{
    /// Wrap the four hooks.
    pub fn new(on_session: S, on_delta: D, on_done: F, on_error: E) -> Self {
        Self {
            on_session,
            on_delta,
            on_done,
            on_error,
        }
    }
}

impl<S, D, F, E> StreamCallbacks for FnCallbacks<S, D, F, E>
where
    S: FnMut(&str),
    D: FnMut(&str),
    F: FnMut(),
    E: FnMut(&ChatError),
{
    fn on_session(&mut self, session_id: &str) {
        (self.on_session)(session_id);
    }

    fn on_delta(&mut self, text: &str) {
        (self.on_delta)(text);
    }

    fn on_done(&mut self) {
        (self.on_done)();
    }

    fn on_error(&mut self, error: &ChatError) {
        (self.on_error)(error);
    }
}
