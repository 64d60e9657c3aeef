//! Event-stream decoding over an HTTP response body.
//!
//! The backend replies with `text/event-stream` records:
//!
//! ```text
//! event: session
//! data: {"session_id":"4f1c..."}
//!
//! event: delta
//! data: {"content":"Hel"}
//!
//! event: done
//! data: {}
//!
//! ```
//!
//! Body chunks are handed to a [`StreamDecoder`] as they arrive, so events
//! reach the consumer while the backend is still generating.

use bytes::Bytes;
use chatstream_decoder::StreamDecoder;
use chatstream_types::{ChatError, ChatEvent, EventStream, StreamCallbacks};
use futures::{Stream, StreamExt};
use reqwest::Response;
use tokio_util::sync::CancellationToken;

/// Wrap an HTTP response body into an [`EventStream`].
pub(crate) fn stream_events(response: Response) -> EventStream {
    EventStream::new(decode_body(response.bytes_stream()))
}

/// Decode a raw byte stream into events.
///
/// Events are yielded in record order. If the byte stream fails, the error is
/// yielded once as [`ChatError::StreamAborted`] and nothing follows it. When
/// the byte stream ends the decoder is finished, which drops any record still
/// missing its terminator.
pub fn decode_body<S, E>(
    byte_stream: S,
) -> impl Stream<Item = Result<ChatEvent, ChatError>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    async_stream::stream! {
        let mut decoder = StreamDecoder::new();
        let mut bytes_stream = std::pin::pin!(byte_stream);

        while let Some(chunk_result) = bytes_stream.next().await {
            let chunk = match chunk_result {
                Ok(b) => b,
                Err(e) => {
                    tracing::warn!(error = %e, "event stream read failed");
                    yield Err(ChatError::StreamAborted(e.to_string()));
                    return;
                }
            };

            for event in decoder.feed(&chunk) {
                yield Ok(event);
            }
        }

        for event in decoder.finish() {
            yield Ok(event);
        }
    }
}

/// Drive `stream` to completion through `callbacks`.
///
/// Each event is dispatched to its hook in order. A transport error goes to
/// [`StreamCallbacks::on_error`] and is returned. Cancellation is checked
/// before every event, so once `cancel` fires (including from inside a hook)
/// nothing else is delivered and `Ok(())` is returned.
pub async fn drive<C>(
    mut stream: EventStream,
    callbacks: &mut C,
    cancel: &CancellationToken,
) -> Result<(), ChatError>
where
    C: StreamCallbacks + ?Sized,
{
    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!("event stream cancelled by consumer");
                return Ok(());
            }
            next = stream.next() => next,
        };

        match next {
            Some(Ok(event)) => event.dispatch(callbacks),
            Some(Err(err)) => {
                callbacks.on_error(&err);
                return Err(err);
            }
            None => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(parts: &[&[u8]]) -> Vec<Result<Bytes, std::io::Error>> {
        parts.iter().map(|p| Ok(Bytes::copy_from_slice(p))).collect()
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        cancel_on_session: Option<CancellationToken>,
    }

    impl StreamCallbacks for Recorder {
        fn on_session(&mut self, session_id: &str) {
            self.calls.push(format!("session:{session_id}"));
            if let Some(token) = &self.cancel_on_session {
                token.cancel();
            }
        }

        fn on_delta(&mut self, text: &str) {
            self.calls.push(format!("delta:{text}"));
        }

        fn on_done(&mut self) {
            self.calls.push("done".into());
        }

        fn on_error(&mut self, error: &ChatError) {
            self.calls.push(format!("error:{error}"));
        }
    }

    #[tokio::test]
    async fn decodes_chunks_split_mid_character() {
        let body = "event: delta\ndata: {\"content\":\"€\"}\n\nevent: done\ndata: {}\n\n";
        let bytes = body.as_bytes();
        let cut = bytes.iter().position(|&b| b == 0xE2).unwrap() + 2;
        let stream = decode_body(futures::stream::iter(chunks(&[&bytes[..cut], &bytes[cut..]])));

        let events: Vec<_> = stream.map(Result::unwrap).collect().await;
        assert_eq!(events, vec![ChatEvent::delta("€"), ChatEvent::StreamCompleted]);
    }

    #[tokio::test]
    async fn read_error_ends_stream_after_delivered_events() {
        let mut items = chunks(&[b"event: delta\ndata: {\"content\":\"a\"}\n\nevent: del"]);
        items.push(Err(std::io::Error::other("connection reset")));
        items.extend(chunks(&[b"ta\ndata: {\"content\":\"b\"}\n\n"]));

        let results: Vec<_> = decode_body(futures::stream::iter(items)).collect().await;
        assert_eq!(results.len(), 2);
        assert!(matches!(&results[0], Ok(ChatEvent::TokenDelta { text }) if text == "a"));
        assert!(matches!(&results[1], Err(ChatError::StreamAborted(msg)) if msg == "connection reset"));
    }

    #[tokio::test]
    async fn drive_dispatches_in_order() {
        let body = chunks(&[
            b"event: session\ndata: {\"session_id\":\"abc\"}\n\nevent: delta\ndata: {\"content\":\"He\"}\n",
            b"\nevent: delta\ndata: {\"content\":\"llo\"}\n\nevent: done\ndata: {}\n\n",
        ]);
        let stream = EventStream::new(decode_body(futures::stream::iter(body)));
        let mut rec = Recorder::default();

        drive(stream, &mut rec, &CancellationToken::new()).await.unwrap();
        assert_eq!(rec.calls, vec!["session:abc", "delta:He", "delta:llo", "done"]);
    }

    #[tokio::test]
    async fn drive_reports_transport_error_once() {
        let mut items = chunks(&[b"event: delta\ndata: {\"content\":\"a\"}\n\n"]);
        items.push(Err(std::io::Error::other("eof")));
        let stream = EventStream::new(decode_body(futures::stream::iter(items)));
        let mut rec = Recorder::default();

        let err = drive(stream, &mut rec, &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, ChatError::StreamAborted(_)));
        assert_eq!(rec.calls, vec!["delta:a", "error:stream aborted: eof"]);
    }

    #[tokio::test]
    async fn cancel_from_hook_stops_delivery() {
        let cancel = CancellationToken::new();
        let body = chunks(&[
            b"event: session\ndata: {\"session_id\":\"s\"}\n\nevent: delta\ndata: {\"content\":\"x\"}\n\n",
        ]);
        let stream = EventStream::new(decode_body(futures::stream::iter(body)));
        let mut rec = Recorder {
            cancel_on_session: Some(cancel.clone()),
            ..Default::default()
        };

        drive(stream, &mut rec, &cancel).await.unwrap();
        assert_eq!(rec.calls, vec!["session:s"]);
    }
}
