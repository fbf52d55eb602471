//! Decoder implementation for HTTP messages with Content-Length header.
//!
//! This module decodes bodies whose size is specified by the Content-Length header,
//! as defined in [RFC 9112 Section 6.2](https://www.rfc-editor.org/rfc/rfc9112#section-6.2).

use bytes::{BufMut, BytesMut};
use tracing::trace;

/// A decoder for HTTP bodies with a known content length.
///
/// The decoder tracks the remaining bytes to be read; bytes past the announced
/// length are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The number of bytes remaining to be read from the payload
    remaining: u64,
    content: BytesMut,
}

impl LengthDecoder {
    /// Creates a new LengthDecoder instance.
    ///
    /// # Arguments
    /// * `length` - The total content length to decode, specified by Content-Length header
    pub fn new(length: u64) -> Self {
        let capacity = usize::try_from(length).unwrap_or(usize::MAX).min(MAX_RESERVE);
        Self { remaining: length, content: BytesMut::with_capacity(capacity) }
    }

    pub fn receive_byte(&mut self, byte: u8) {
        if self.remaining == 0 {
            return;
        }

        self.content.put_u8(byte);
        self.remaining -= 1;

        if self.remaining == 0 {
            trace!(len = self.content.len(), "finished reading content-length body");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// Upper bound of the up-front allocation driven by the announced length
const MAX_RESERVE: usize = 64 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let mut length_decoder = LengthDecoder::new(10);
        for &b in b"101234567890abcdef\r\n\r\n" {
            length_decoder.receive_byte(b);
        }

        assert!(length_decoder.is_finished());
        assert_eq!(length_decoder.content(), b"1012345678");
    }

    #[test]
    fn test_partial() {
        let mut length_decoder = LengthDecoder::new(4);
        length_decoder.receive_byte(b'a');
        length_decoder.receive_byte(b'b');
        assert!(!length_decoder.is_finished());
        assert_eq!(length_decoder.content(), b"ab");
    }

    #[test]
    fn test_zero_length() {
        let length_decoder = LengthDecoder::new(0);
        assert!(length_decoder.is_finished());
        assert!(length_decoder.content().is_empty());
    }
}
