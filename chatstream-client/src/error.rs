//! Internal error helpers for mapping HTTP/reqwest errors to [`ChatError`].

use std::time::Duration;

use chatstream_types::ChatError;

/// Reported when reqwest times out and no connect timeout was configured.
const FALLBACK_TIMEOUT: Duration = Duration::from_secs(30);

/// Map a non-success HTTP status to a [`ChatError`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ChatError {
    tracing::warn!(status = status.as_u16(), "chat backend returned an error status");
    ChatError::Status {
        status: status.as_u16(),
        body: body.to_string(),
    }
}

/// Map a [`reqwest::Error`] raised before the body started streaming.
pub(crate) fn map_reqwest_error(err: reqwest::Error, timeout: Option<Duration>) -> ChatError {
    if err.is_timeout() {
        ChatError::Timeout(timeout.unwrap_or(FALLBACK_TIMEOUT))
    } else {
        ChatError::Network(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_keeps_code_and_body() {
        let err = map_http_status(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(
            err,
            ChatError::Status { status: 502, ref body } if body == "upstream down"
        ));
        assert!(err.is_retryable());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        let err = map_http_status(reqwest::StatusCode::UNPROCESSABLE_ENTITY, "{}");
        assert_eq!(err.status(), Some(422));
        assert!(!err.is_retryable());
    }
}
