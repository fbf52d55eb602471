//! Decoder implementation for HTTP chunked transfer encoding.
//!
//! This module decodes bodies that use chunked transfer encoding as specified in
//! [RFC 9112 Section 7.1](https://www.rfc-editor.org/rfc/rfc9112#section-7.1),
//! one byte at a time.
//!
//! The decoder never fails: a byte that does not fit the current state is dropped
//! and the state is left unchanged. A malformed body therefore stalls instead of
//! erroring, and the caller is expected to bound the exchange with a timeout.

use bytes::{BufMut, BytesMut};
use tracing::trace;
use ChunkedState::*;

/// Number base used to read the chunk-size line.
///
/// Real servers send hexadecimal sizes. `Decimal` reads the digits as base 10, which
/// some toy servers emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChunkSizeRadix {
    #[default]
    Hexadecimal,
    Decimal,
}

impl ChunkSizeRadix {
    #[inline]
    fn base(self) -> u64 {
        match self {
            ChunkSizeRadix::Hexadecimal => 16,
            ChunkSizeRadix::Decimal => 10,
        }
    }

    /// Value of `byte` as a digit of this radix.
    fn digit(self, byte: u8) -> Option<u64> {
        let value = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            _ => return None,
        };

        let value = u64::from(value);
        (value < self.base()).then_some(value)
    }
}

/// A decoder for HTTP chunked transfer encoding.
///
/// The decoder processes incoming bytes according to the chunked format:
/// - Each chunk starts with its size line, optionally followed by `;extensions`
/// - Then the chunk data and CRLF
/// - A zero-sized chunk indicates the end of the message
///
/// Decoded data accumulates in the decoder until the caller takes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedDecoder {
    state: ChunkedState,
    /// Size accumulator while reading a size line, bytes left while reading chunk data
    remaining_in_chunk: u64,
    content: BytesMut,
    finished: bool,
    radix: ChunkSizeRadix,
}

impl ChunkedDecoder {
    /// Creates a new ChunkedDecoder reading hexadecimal chunk sizes.
    ///
    /// The decoder starts in the Length state, ready to read the size of the first chunk.
    pub fn new() -> Self {
        Self::with_radix(ChunkSizeRadix::default())
    }

    pub fn with_radix(radix: ChunkSizeRadix) -> Self {
        Self { state: Length, remaining_in_chunk: 0, content: BytesMut::new(), finished: false, radix }
    }

    pub fn receive(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.receive_byte(byte);
        }
    }

    /// Feeds one byte through the state machine. Bytes after the last chunk are discarded.
    pub fn receive_byte(&mut self, byte: u8) {
        if self.finished {
            return;
        }

        let (next, effect) = self.state.advance(byte, self.remaining_in_chunk, self.radix);

        match effect {
            Effect::None => {}
            Effect::Digit(digit) => {
                match self.remaining_in_chunk.checked_mul(self.radix.base()).and_then(|size| size.checked_add(digit)) {
                    Some(size) => self.remaining_in_chunk = size,
                    None => trace!(size = self.remaining_in_chunk, "chunk size overflow, digit ignored"),
                }
            }
            Effect::SizeLineEnd => {
                if self.remaining_in_chunk == 0 {
                    trace!(len = self.content.len(), "finished reading chunked data");
                    self.finished = true;
                } else {
                    trace!(size = self.remaining_in_chunk, "read chunk size");
                    self.content.reserve(usize::try_from(self.remaining_in_chunk).unwrap_or(0).min(MAX_RESERVE));
                }
            }
            Effect::Data => {
                self.content.put_u8(byte);
                self.remaining_in_chunk -= 1;
            }
            Effect::NewSizeLine => self.remaining_in_chunk = 0,
        }

        self.state = next;
    }

    /// Returns true once the zero-sized chunk's size line has been terminated.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The data decoded so far, framing removed.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> ChunkedState {
        self.state
    }
}

impl Default for ChunkedDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Upper bound of a single up-front allocation driven by an announced chunk size
const MAX_RESERVE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChunkedState {
    /// Read the chunk size digits
    Length,
    /// Skip chunk extensions after `;`
    LengthExtension,
    /// Read LF after the size line
    LengthLineEnd,
    /// Read chunk data
    ReadingChunk,
    /// Read CR after chunk data
    TrailingCr,
    /// Read LF after chunk data
    TrailingLf,
}

/// Side effect of one transition, applied by [`ChunkedDecoder::receive_byte`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Effect {
    None,
    /// Append a digit to the size accumulator
    Digit(u64),
    /// The size line ended (CR seen)
    SizeLineEnd,
    /// The byte is chunk data
    Data,
    /// A new size line starts, reset the accumulator
    NewSizeLine,
}

impl ChunkedState {
    /// Pure transition: the state after `byte`, and what the decoder has to do with it.
    ///
    /// `remaining` is the number of data bytes left in the current chunk, only used in
    /// the ReadingChunk state.
    pub(crate) fn advance(self, byte: u8, remaining: u64, radix: ChunkSizeRadix) -> (ChunkedState, Effect) {
        match (self, byte) {
            (Length | LengthExtension, b'\r') => (LengthLineEnd, Effect::SizeLineEnd),
            (Length, b';') => (LengthExtension, Effect::None),
            (Length, b) => match radix.digit(b) {
                Some(digit) => (Length, Effect::Digit(digit)),
                None => (Length, Effect::None),
            },
            (LengthExtension, _) => (LengthExtension, Effect::None),

            (LengthLineEnd, b'\n') => (ReadingChunk, Effect::None),
            (LengthLineEnd, _) => (LengthLineEnd, Effect::None),

            (ReadingChunk, _) if remaining <= 1 => (TrailingCr, Effect::Data),
            (ReadingChunk, _) => (ReadingChunk, Effect::Data),

            (TrailingCr, b'\r') => (TrailingLf, Effect::None),
            (TrailingCr, _) => (TrailingCr, Effect::None),

            (TrailingLf, b'\n') => (Length, Effect::NewSizeLine),
            (TrailingLf, _) => (TrailingLf, Effect::None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(input: &[u8]) -> ChunkedDecoder {
        let mut decoder = ChunkedDecoder::new();
        decoder.receive(input);
        decoder
    }

    #[test]
    fn test_basic() {
        let decoder = decode(b"10\r\n1234567890abcdef\r\n0\r\n\r\n");
        assert!(decoder.is_finished());
        assert_eq!(decoder.content(), b"1234567890abcdef");
    }

    #[test]
    fn test_multiple_chunks() {
        let decoder = decode(b"5\r\nhello\r\n7\r\n, world\r\n0\r\n\r\n");
        assert!(decoder.is_finished());
        assert_eq!(decoder.content(), b"hello, world");
    }

    #[test]
    fn test_decimal_sizes() {
        let segments = ["0123456789", "ab", "a much longer segment of twenty-nine"];
        let mut input = String::new();
        for segment in segments {
            input.push_str(&format!("{}\r\n{segment}\r\n", segment.len()));
        }
        input.push_str("0\r\n\r\n");

        let mut decoder = ChunkedDecoder::with_radix(ChunkSizeRadix::Decimal);
        decoder.receive(input.as_bytes());

        assert!(decoder.is_finished());
        assert_eq!(decoder.content(), segments.concat().as_bytes());
    }

    #[test]
    fn test_hex_sizes_upper_and_lower() {
        let data = "x".repeat(0x1a);
        let lower = decode(format!("1a\r\n{data}\r\n0\r\n\r\n").as_bytes());
        let upper = decode(format!("1A\r\n{data}\r\n0\r\n\r\n").as_bytes());
        assert_eq!(lower.content(), data.as_bytes());
        assert_eq!(upper.content(), data.as_bytes());
    }

    #[test]
    fn test_chunks_with_extensions() {
        let decoder = decode(b"5;chunk-ext=value\r\nhello\r\n0;last\r\n\r\n");
        assert!(decoder.is_finished());
        assert_eq!(decoder.content(), b"hello");
    }

    #[test]
    fn test_chunks_with_trailers() {
        let decoder = decode(b"5\r\nhello\r\n0\r\nTrailer: value\r\n\r\n");
        assert!(decoder.is_finished());
        assert_eq!(decoder.content(), b"hello");
    }

    #[test]
    fn test_finished_at_last_size_line_cr() {
        let mut decoder = decode(b"5\r\nhello\r\n0");
        assert!(!decoder.is_finished());

        decoder.receive_byte(b'\r');
        assert!(decoder.is_finished());

        // anything that follows is discarded
        decoder.receive(b"\n3\r\nabc\r\n0\r\n\r\n");
        assert_eq!(decoder.content(), b"hello");
    }

    #[test]
    fn test_incomplete_chunk() {
        let mut decoder = decode(b"5\r\nhel");
        assert!(!decoder.is_finished());
        assert_eq!(decoder.content(), b"hel");

        decoder.receive(b"lo\r\n0\r\n\r\n");
        assert!(decoder.is_finished());
        assert_eq!(decoder.content(), b"hello");
    }

    #[test]
    fn test_byte_by_byte() {
        let input = b"3\r\nabc\r\n4\r\n\r\n\r\n\r\n0\r\n\r\n";
        let mut decoder = ChunkedDecoder::new();
        for &b in input.iter() {
            decoder.receive_byte(b);
        }
        assert!(decoder.is_finished());
        assert_eq!(decoder.content(), b"abc\r\n\r\n");
    }

    #[test]
    fn test_missing_crlf_stalls() {
        let mut decoder = decode(b"5\r\nhelloBad");
        assert!(!decoder.is_finished());
        assert_eq!(decoder.content(), b"hello");
        assert_eq!(decoder.state(), TrailingCr);

        decoder.receive(b"\r\n0\r\n\r\n");
        assert!(decoder.is_finished());
        assert_eq!(decoder.content(), b"hello");
    }

    #[test]
    fn test_invalid_size_digits_ignored() {
        // no digit survives, so the size line reads as the last chunk
        let decoder = decode(b"xyz\r\n");
        assert!(decoder.is_finished());
        assert!(decoder.content().is_empty());
    }

    #[test]
    fn test_overflowing_digit_ignored() {
        let mut decoder = ChunkedDecoder::new();
        decoder.receive(b"fffffffffffffffff");
        assert_eq!(decoder.remaining_in_chunk, u64::MAX);
        assert!(!decoder.is_finished());
    }

    #[test]
    fn test_large_chunk() {
        let size = 1024 * 1024;
        let mut data = Vec::with_capacity(size + 16);
        data.extend(format!("{size:x}\r\n").into_bytes());
        data.extend(vec![b'A'; size]);
        data.extend(b"\r\n0\r\n\r\n");

        let decoder = decode(&data);
        assert!(decoder.is_finished());
        assert_eq!(decoder.content().len(), size);
        assert!(decoder.content().iter().all(|&b| b == b'A'));
    }

    #[test]
    fn test_zero_size_chunk() {
        let decoder = decode(b"0\r\n\r\n");
        assert!(decoder.is_finished());
        assert!(decoder.content().is_empty());
    }

    #[test]
    fn transitions() {
        let hex = ChunkSizeRadix::Hexadecimal;
        let dec = ChunkSizeRadix::Decimal;

        assert_eq!(Length.advance(b'7', 0, hex), (Length, Effect::Digit(7)));
        assert_eq!(Length.advance(b'f', 0, hex), (Length, Effect::Digit(15)));
        assert_eq!(Length.advance(b'f', 0, dec), (Length, Effect::None));
        assert_eq!(Length.advance(b' ', 0, hex), (Length, Effect::None));
        assert_eq!(Length.advance(b';', 0, hex), (LengthExtension, Effect::None));
        assert_eq!(Length.advance(b'\r', 0, hex), (LengthLineEnd, Effect::SizeLineEnd));
        assert_eq!(LengthExtension.advance(b'1', 0, hex), (LengthExtension, Effect::None));
        assert_eq!(LengthExtension.advance(b'\r', 0, hex), (LengthLineEnd, Effect::SizeLineEnd));
        assert_eq!(LengthLineEnd.advance(b'x', 5, hex), (LengthLineEnd, Effect::None));
        assert_eq!(LengthLineEnd.advance(b'\n', 5, hex), (ReadingChunk, Effect::None));
        assert_eq!(ReadingChunk.advance(b'\r', 5, hex), (ReadingChunk, Effect::Data));
        assert_eq!(ReadingChunk.advance(b'z', 1, hex), (TrailingCr, Effect::Data));
        assert_eq!(TrailingCr.advance(b'\n', 0, hex), (TrailingCr, Effect::None));
        assert_eq!(TrailingCr.advance(b'\r', 0, hex), (TrailingLf, Effect::None));
        assert_eq!(TrailingLf.advance(b'\r', 0, hex), (TrailingLf, Effect::None));
        assert_eq!(TrailingLf.advance(b'\n', 0, hex), (Length, Effect::NewSizeLine));
    }
}
