//! Record framing and classification.
//!
//! A record is a group of `field: value` lines ended by a blank line:
//!
//! ```text
//! event: delta
//! data: {"content":"Hello"}
//!
//! ```
//!
//! Only `event` and `data` are recognized. The whole record is scanned before
//! it is classified, so the two fields may appear in either order.

use chatstream_types::ChatEvent;
use serde::Deserialize;

/// Separates one record from the next.
pub(crate) const TERMINATOR: &str = "\n\n";

const EVENT_PREFIX: &str = "event: ";
const DATA_PREFIX: &str = "data: ";

/// Why a record produced no event.
#[derive(Debug, thiserror::Error)]
pub(crate) enum Discard {
    #[error("record has no event line")]
    MissingEvent,
    #[error("record has no data line")]
    MissingData,
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("payload does not match `{tag}` event: {source}")]
    InvalidPayload {
        tag: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown event tag `{0}`")]
    UnknownTag(String),
}

/// The two fields of a record, borrowed from the buffer.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct RawRecord<'a> {
    pub(crate) event: &'a str,
    pub(crate) data: &'a str,
}

#[derive(Deserialize)]
struct SessionPayload {
    session_id: String,
}

#[derive(Deserialize)]
struct DeltaPayload {
    content: String,
}

/// Scan the lines of one record. Later lines overwrite earlier ones and an
/// empty value counts as absent.
pub(crate) fn scan(record: &str) -> Result<RawRecord<'_>, Discard> {
    let mut event = "";
    let mut data = "";

    for line in record.split('\n') {
        if let Some(value) = line.strip_prefix(EVENT_PREFIX) {
            event = value;
        } else if let Some(value) = line.strip_prefix(DATA_PREFIX) {
            data = value;
        }
    }

    if event.is_empty() {
        return Err(Discard::MissingEvent);
    }
    if data.is_empty() {
        return Err(Discard::MissingData);
    }
    Ok(RawRecord { event, data })
}

/// Turn one record into an event.
pub(crate) fn classify(record: &str) -> Result<ChatEvent, Discard> {
    let RawRecord { event, data } = scan(record)?;
    let payload: serde_json::Value = serde_json::from_str(data).map_err(Discard::InvalidJson)?;

    match event {
        "session" => {
            let SessionPayload { session_id } = serde_json::from_value(payload)
                .map_err(|source| Discard::InvalidPayload { tag: "session", source })?;
            Ok(ChatEvent::SessionEstablished { session_id })
        }
        "delta" => {
            let DeltaPayload { content } = serde_json::from_value(payload)
                .map_err(|source| Discard::InvalidPayload { tag: "delta", source })?;
            Ok(ChatEvent::TokenDelta { text: content })
        }
        "done" => Ok(ChatEvent::StreamCompleted),
        other => Err(Discard::UnknownTag(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_reads_both_fields() {
        let raw = scan("event: delta\ndata: {\"content\":\"x\"}").unwrap();
        assert_eq!(
            raw,
            RawRecord {
                event: "delta",
                data: "{\"content\":\"x\"}"
            }
        );
    }

    #[test]
    fn scan_strips_exact_prefix_only() {
        // The value keeps anything after the single space.
        let raw = scan("event:  delta\ndata: {}").unwrap();
        assert_eq!(raw.event, " delta");
    }

    #[test]
    fn prefix_without_space_is_ignored() {
        assert!(matches!(scan("event:delta\ndata: {}"), Err(Discard::MissingEvent)));
        assert!(matches!(scan("event: delta\ndata:{}"), Err(Discard::MissingData)));
    }

    #[test]
    fn last_occurrence_wins() {
        let raw = scan("event: session\nevent: delta\ndata: 1\ndata: 2").unwrap();
        assert_eq!(raw.event, "delta");
        assert_eq!(raw.data, "2");
    }

    #[test]
    fn other_lines_are_ignored() {
        let raw = scan(": keepalive\nid: 7\nevent: done\nretry: 10\ndata: {}").unwrap();
        assert_eq!(raw.event, "done");
    }

    #[test]
    fn empty_values_count_as_missing() {
        assert!(matches!(scan("event: \ndata: {}"), Err(Discard::MissingEvent)));
        assert!(matches!(scan("event: done\ndata: "), Err(Discard::MissingData)));
        assert!(matches!(scan(""), Err(Discard::MissingEvent)));
    }

    #[test]
    fn classify_known_tags() {
        assert_eq!(
            classify("event: session\ndata: {\"session_id\":\"abc\"}").unwrap(),
            ChatEvent::session("abc")
        );
        assert_eq!(
            classify("event: delta\ndata: {\"content\":\"He\"}").unwrap(),
            ChatEvent::delta("He")
        );
        assert_eq!(
            classify("event: done\ndata: {}").unwrap(),
            ChatEvent::StreamCompleted
        );
    }

    #[test]
    fn done_ignores_payload_contents() {
        assert_eq!(
            classify("event: done\ndata: {\"reason\":\"stop\"}").unwrap(),
            ChatEvent::StreamCompleted
        );
        assert!(matches!(
            classify("event: done\ndata: {"),
            Err(Discard::InvalidJson(_))
        ));
    }

    #[test]
    fn payload_missing_field_is_discarded() {
        assert!(matches!(
            classify("event: delta\ndata: {\"text\":\"x\"}"),
            Err(Discard::InvalidPayload { tag: "delta", .. })
        ));
        assert!(matches!(
            classify("event: session\ndata: {\"session_id\":42}"),
            Err(Discard::InvalidPayload { tag: "session", .. })
        ));
    }

    #[test]
    fn unknown_tag_is_discarded() {
        assert!(matches!(
            classify("event: tool_call\ndata: {\"name\":\"search\"}"),
            Err(Discard::UnknownTag(tag)) if tag == "tool_call"
        ));
    }
}
