//! Blocking iterator over decoded events.

use std::collections::VecDeque;

use chatstream_types::ChatEvent;

use crate::decoder::StreamDecoder;

/// Decode an ordered sequence of chunks lazily.
///
/// The iterator pulls one chunk at a time and is finite: once `chunks` is
/// exhausted the decoder is finished and the iterator stays empty.
///
/// ```
/// use chatstream_decoder::{ChatEvent, decode_chunks};
///
/// let chunks: [&[u8]; 2] = [b"event: done\ndata: {}", b"\n\n"];
/// let events: Vec<_> = decode_chunks(chunks).collect();
/// assert_eq!(events, vec![ChatEvent::StreamCompleted]);
/// ```
pub fn decode_chunks<I>(chunks: I) -> DecodeChunks<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    DecodeChunks {
        chunks: chunks.into_iter(),
        decoder: Some(StreamDecoder::new()),
        ready: VecDeque::new(),
    }
}

/// Iterator returned by [`decode_chunks`].
#[derive(Debug)]
pub struct DecodeChunks<I> {
    chunks: I,
    /// `None` once the input is exhausted.
    decoder: Option<StreamDecoder>,
    ready: VecDeque<ChatEvent>,
}

impl<I> Iterator for DecodeChunks<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    type Item = ChatEvent;

    fn next(&mut self) -> Option<ChatEvent> {
        loop {
            if let Some(event) = self.ready.pop_front() {
                return Some(event);
            }
            let decoder = self.decoder.as_mut()?;
            match self.chunks.next() {
                Some(chunk) => {
                    let ready = &mut self.ready;
                    decoder.feed_with(chunk.as_ref(), |event| ready.push_back(event));
                }
                None => {
                    let decoder = self.decoder.take()?;
                    self.ready.extend(decoder.finish());
                }
            }
        }
    }
}

impl<I> std::iter::FusedIterator for DecodeChunks<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
}
