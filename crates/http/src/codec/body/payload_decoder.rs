//! Decoder implementation for HTTP response payloads.
//!
//! This module provides a unified decoder for the different ways a response body
//! can be framed:
//! - Chunked transfer encoding
//! - Content-Length based payloads
//! - Bodies delimited by the server closing the connection
//! - Messages with no body
//!
//! The response decoder picks the strategy once, when the header block closes.

use bytes::{BufMut, BytesMut};

use crate::codec::body::chunked_decoder::{ChunkSizeRadix, ChunkedDecoder};
use crate::codec::body::length_decoder::LengthDecoder;
use crate::protocol::PayloadSize;

/// A unified decoder for HTTP response payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadDecoder {
    /// The specific decoding strategy to use
    kind: Kind,
}

/// Enum representing different payload decoding strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    /// Decode payload with a fixed content length
    Length(LengthDecoder),

    /// Decode payload using chunked transfer encoding
    Chunked(ChunkedDecoder),

    /// Everything until the end of the stream
    UntilClose { content: BytesMut, eof: bool },

    /// Handle messages with no body
    NoBody,
}

impl PayloadDecoder {
    /// Creates a PayloadDecoder for messages with no body.
    pub fn empty() -> Self {
        Self { kind: Kind::NoBody }
    }

    /// Creates a PayloadDecoder for chunked transfer encoding.
    pub fn chunked(radix: ChunkSizeRadix) -> Self {
        Self { kind: Kind::Chunked(ChunkedDecoder::with_radix(radix)) }
    }

    /// Creates a PayloadDecoder for a fixed-length payload.
    ///
    /// # Arguments
    /// * `size` - The expected content length in bytes
    pub fn fix_length(size: u64) -> Self {
        Self { kind: Kind::Length(LengthDecoder::new(size)) }
    }

    /// Creates a PayloadDecoder that only completes at the end of the stream.
    pub fn until_close() -> Self {
        Self { kind: Kind::UntilClose { content: BytesMut::new(), eof: false } }
    }

    /// Creates the decoder matching `payload_size`.
    pub fn from_size(payload_size: PayloadSize, radix: ChunkSizeRadix) -> Self {
        match payload_size {
            PayloadSize::Length(size) => Self::fix_length(size),
            PayloadSize::Chunked => Self::chunked(radix),
            PayloadSize::UntilClose => Self::until_close(),
            PayloadSize::Empty => Self::empty(),
        }
    }

    /// Forwards one body byte to the active strategy.
    pub fn receive_byte(&mut self, byte: u8) {
        match &mut self.kind {
            Kind::Length(length_decoder) => length_decoder.receive_byte(byte),
            Kind::Chunked(chunked_decoder) => chunked_decoder.receive_byte(byte),
            Kind::UntilClose { content, eof: false } => content.put_u8(byte),
            Kind::UntilClose { eof: true, .. } | Kind::NoBody => {}
        }
    }

    /// Signals the end of the stream. Only a body delimited by connection close
    /// becomes finished through this.
    pub fn finish_eof(&mut self) {
        if let Kind::UntilClose { eof, .. } = &mut self.kind {
            *eof = true;
        }
    }

    pub fn is_finished(&self) -> bool {
        match &self.kind {
            Kind::Length(length_decoder) => length_decoder.is_finished(),
            Kind::Chunked(chunked_decoder) => chunked_decoder.is_finished(),
            Kind::UntilClose { eof, .. } => *eof,
            Kind::NoBody => true,
        }
    }

    /// The body decoded so far.
    pub fn content(&self) -> &[u8] {
        match &self.kind {
            Kind::Length(length_decoder) => length_decoder.content(),
            Kind::Chunked(chunked_decoder) => chunked_decoder.content(),
            Kind::UntilClose { content, .. } => content,
            Kind::NoBody => &[],
        }
    }

    /// Returns whether this decoder handles chunked transfer encoding.
    pub fn is_chunked(&self) -> bool {
        matches!(self.kind, Kind::Chunked(_))
    }

    /// Returns whether this decoder handles messages with no body.
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, Kind::NoBody)
    }

    /// Returns whether this decoder handles fixed-length payloads.
    pub fn is_fix_length(&self) -> bool {
        matches!(self.kind, Kind::Length(_))
    }

    /// Returns whether this decoder reads until the connection closes.
    pub fn is_until_close(&self) -> bool {
        matches!(self.kind, Kind::UntilClose { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(decoder: &mut PayloadDecoder, bytes: &[u8]) {
        for &b in bytes {
            decoder.receive_byte(b);
        }
    }

    #[test]
    fn from_size() {
        let radix = ChunkSizeRadix::Hexadecimal;
        assert!(PayloadDecoder::from_size(PayloadSize::Chunked, radix).is_chunked());
        assert!(PayloadDecoder::from_size(PayloadSize::Length(3), radix).is_fix_length());
        assert!(PayloadDecoder::from_size(PayloadSize::UntilClose, radix).is_until_close());
        assert!(PayloadDecoder::from_size(PayloadSize::Empty, radix).is_empty());
    }

    #[test]
    fn empty_is_finished_immediately() {
        let mut decoder = PayloadDecoder::empty();
        assert!(decoder.is_finished());
        feed(&mut decoder, b"ignored");
        assert!(decoder.content().is_empty());
    }

    #[test]
    fn chunked_delegates() {
        let mut decoder = PayloadDecoder::chunked(ChunkSizeRadix::Decimal);
        feed(&mut decoder, b"12\r\nhello, world");
        assert!(!decoder.is_finished());
        feed(&mut decoder, b"\r\n0\r\n\r\n");
        assert!(decoder.is_finished());
        assert_eq!(decoder.content(), b"hello, world");
    }

    #[test]
    fn until_close_needs_eof() {
        let mut decoder = PayloadDecoder::until_close();
        feed(&mut decoder, b"streamed body");
        assert!(!decoder.is_finished());

        decoder.finish_eof();
        assert!(decoder.is_finished());
        assert_eq!(decoder.content(), b"streamed body");

        feed(&mut decoder, b" after eof");
        assert_eq!(decoder.content(), b"streamed body");
    }

    #[test]
    fn eof_does_not_finish_other_kinds() {
        let mut decoder = PayloadDecoder::fix_length(4);
        feed(&mut decoder, b"ab");
        decoder.finish_eof();
        assert!(!decoder.is_finished());

        let mut decoder = PayloadDecoder::chunked(ChunkSizeRadix::Hexadecimal);
        feed(&mut decoder, b"4\r\nab");
        decoder.finish_eof();
        assert!(!decoder.is_finished());
    }
}
