//! Incremental UTF-8 decoding.
//!
//! Network chunks do not respect character boundaries. A multi-byte character
//! split across two chunks has to be held back until its remaining bytes
//! arrive, so each chunk cannot be decoded on its own.

/// Stateful UTF-8 decoder that carries partial sequences between calls.
///
/// Invalid sequences decode to U+FFFD and never stop decoding.
#[derive(Debug, Default, Clone)]
pub struct Utf8Decoder {
    /// Leading bytes of a character whose tail has not arrived yet (at most 3).
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Create a decoder with no pending bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes` into a fresh string.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len());
        self.decode_into(bytes, &mut out);
        out
    }

    /// Decode `bytes`, appending the text to `out`.
    ///
    /// A trailing incomplete sequence is held and completed by the next call.
    pub fn decode_into(&mut self, mut bytes: &[u8], out: &mut String) {
        while !self.pending.is_empty() {
            let Some((&byte, rest)) = bytes.split_first() else {
                return;
            };
            bytes = rest;
            self.pending.push(byte);

            match std::str::from_utf8(&self.pending) {
                Ok(ch) => {
                    out.push_str(ch);
                    self.pending.clear();
                }
                Err(e) => match e.error_len() {
                    // Still incomplete, keep pulling bytes.
                    None => {}
                    Some(invalid) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        let leftover = self.pending.split_off(invalid);
                        self.pending.clear();
                        self.decode_complete(&leftover, out);
                    }
                },
            }
        }

        self.decode_complete(bytes, out);
    }

    /// Number of bytes held back waiting for the rest of a character.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// End of input. Returns how many dangling bytes were dropped.
    #[must_use]
    pub fn finish(self) -> usize {
        self.pending.len()
    }

    /// Decode with no pending prefix, stashing any incomplete tail.
    fn decode_complete(&mut self, bytes: &[u8], out: &mut String) {
        let mut chunks = bytes.utf8_chunks().peekable();
        while let Some(chunk) = chunks.next() {
            out.push_str(chunk.valid());
            let invalid = chunk.invalid();
            if invalid.is_empty() {
                continue;
            }
            // Only the very end of the input can be a sequence cut short.
            let truncated = chunks.peek().is_none()
                && std::str::from_utf8(invalid).is_err_and(|e| e.error_len().is_none());
            if truncated {
                self.pending.extend_from_slice(invalid);
            } else {
                out.push(char::REPLACEMENT_CHARACTER);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        let mut dec = Utf8Decoder::new();
        assert_eq!(dec.decode(b"hello"), "hello");
        assert_eq!(dec.pending(), 0);
    }

    #[test]
    fn split_three_byte_char_is_reassembled() {
        // "€" = E2 82 AC
        let mut dec = Utf8Decoder::new();
        assert_eq!(dec.decode(b"a\xE2"), "a");
        assert_eq!(dec.pending(), 1);
        assert_eq!(dec.decode(b"\x82"), "");
        assert_eq!(dec.pending(), 2);
        assert_eq!(dec.decode(b"\xACb"), "€b");
        assert_eq!(dec.pending(), 0);
    }

    #[test]
    fn split_four_byte_char_byte_by_byte() {
        let bytes = "🦀".as_bytes();
        let mut dec = Utf8Decoder::new();
        let mut out = String::new();
        for b in bytes {
            dec.decode_into(std::slice::from_ref(b), &mut out);
        }
        assert_eq!(out, "🦀");
    }

    #[test]
    fn empty_input_keeps_pending() {
        let mut dec = Utf8Decoder::new();
        assert_eq!(dec.decode(b"\xE4\xBD"), "");
        assert_eq!(dec.decode(b""), "");
        assert_eq!(dec.pending(), 2);
        assert_eq!(dec.decode(b"\xA0"), "你");
    }

    #[test]
    fn invalid_byte_becomes_replacement() {
        let mut dec = Utf8Decoder::new();
        assert_eq!(dec.decode(b"a\xFFb"), "a\u{FFFD}b");
    }

    #[test]
    fn broken_continuation_across_chunks_recovers() {
        // Lead byte of a 3-byte sequence followed by plain ASCII.
        let mut dec = Utf8Decoder::new();
        assert_eq!(dec.decode(b"\xE2"), "");
        assert_eq!(dec.decode(b"xy"), "\u{FFFD}xy");
        assert_eq!(dec.pending(), 0);
    }

    #[test]
    fn matches_lossy_decoding_at_every_split() {
        let inputs: [&[u8]; 4] = [
            "aé€🦀z".as_bytes(),
            b"x\xE2\x82y\xF0\x9Fz",
            b"\xC0\xAF\xED\xA0\x80\xF4\x90\x80\x80",
            b"ok\xFF\xFE\xE4\xBD\xA0",
        ];
        for input in inputs {
            let expected = String::from_utf8_lossy(input);
            for cut in 0..=input.len() {
                let mut dec = Utf8Decoder::new();
                let mut out = dec.decode(&input[..cut]);
                dec.decode_into(&input[cut..], &mut out);
                assert_eq!(out, expected, "input {input:?} split at {cut}");
                assert_eq!(dec.finish(), 0);
            }
        }
    }

    #[test]
    fn finish_reports_dangling_bytes() {
        let mut dec = Utf8Decoder::new();
        let _ = dec.decode(b"ok\xF0\x9F");
        assert_eq!(dec.finish(), 2);
    }
}
