//! The incremental stream decoder.
//!
//! Bytes go in as the transport delivers them; [`ChatEvent`]s come out as soon
//! as the record that carries them is terminated. Chunk boundaries may fall
//! anywhere: inside a line, inside the `\n\n` terminator, or inside a
//! multi-byte character.

use chatstream_types::ChatEvent;

use crate::record::{TERMINATOR, classify};
use crate::utf8::Utf8Decoder;

/// Counters for one decoded stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecoderStats {
    /// Records that produced an event.
    pub emitted: u64,
    /// Terminated records that were dropped as malformed or unknown.
    pub discarded: u64,
}

/// Turns an ordered sequence of byte chunks into an ordered sequence of
/// [`ChatEvent`]s.
///
/// One decoder serves exactly one stream. Chunks must be fed in arrival order
/// and never re-fed.
///
/// # Example
///
/// ```
/// use chatstream_decoder::{ChatEvent, StreamDecoder};
///
/// let mut decoder = StreamDecoder::new();
/// assert!(decoder.feed(b"event: delta\ndata: {\"content\":\"A\"}\n").is_empty());
/// assert_eq!(decoder.feed(b"\n"), vec![ChatEvent::delta("A")]);
/// ```
#[derive(Debug, Default)]
pub struct StreamDecoder {
    utf8: Utf8Decoder,
    /// Decoded text not yet consumed by a terminated record.
    buffer: String,
    stats: DecoderStats,
}

impl StreamDecoder {
    /// Create a decoder with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and collect the events it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ChatEvent> {
        let mut events = Vec::new();
        self.feed_with(chunk, |event| events.push(event));
        events
    }

    /// Feed one chunk, handing each completed event to `emit` in record order.
    ///
    /// Every record terminated by this chunk is emitted before this returns.
    /// Malformed records are dropped without calling `emit`.
    pub fn feed_with<F>(&mut self, chunk: &[u8], mut emit: F)
    where
        F: FnMut(ChatEvent),
    {
        if chunk.is_empty() {
            return;
        }

        // The old buffer holds no terminator, but its trailing `\n` may pair
        // with the first byte of this chunk.
        let mut search_from = if self.buffer.ends_with('\n') {
            self.buffer.len() - 1
        } else {
            self.buffer.len()
        };
        self.utf8.decode_into(chunk, &mut self.buffer);

        let mut consumed = 0;
        while let Some(offset) = self.buffer[search_from..].find(TERMINATOR) {
            let end = search_from + offset;
            let record = &self.buffer[consumed..end];
            // Blank padding between records is neither emitted nor discarded.
            if !record.trim().is_empty() {
                match classify(record) {
                    Ok(event) => {
                        tracing::trace!(tag = event.tag(), "emitting event");
                        self.stats.emitted += 1;
                        emit(event);
                    }
                    Err(reason) => {
                        tracing::debug!(%reason, "discarding record");
                        self.stats.discarded += 1;
                    }
                }
            }
            consumed = end + TERMINATOR.len();
            search_from = consumed;
        }

        self.buffer.drain(..consumed);
    }

    /// Signal end of transport.
    ///
    /// Records are only recognized by their terminator, so a trailing record
    /// that never got one is dropped rather than guessed at. Always returns no
    /// events; it exists so callers can treat end-of-stream like any other
    /// feed.
    pub fn finish(self) -> Vec<ChatEvent> {
        let dangling = self.utf8.finish();
        if !self.buffer.trim().is_empty() || dangling > 0 {
            tracing::warn!(
                buffered_bytes = self.buffer.len(),
                dangling_utf8_bytes = dangling,
                "stream ended inside a record, dropping it"
            );
        }
        tracing::debug!(
            emitted = self.stats.emitted,
            discarded = self.stats.discarded,
            "stream decoder finished"
        );
        Vec::new()
    }

    /// Text received but not yet part of a terminated record.
    #[must_use]
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }
}
