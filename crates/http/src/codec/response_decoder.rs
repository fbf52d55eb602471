//! HTTP response decoder module
//!
//! This module decodes an HTTP/1.1 response incrementally, one byte at a time,
//! so that parsing starts with the first delivery from the transport and resumes
//! at any byte boundary.
//!
//! # Components
//!
//! - [`ResponseDecoder`]: state machine for the status line and header block,
//!   which then forwards every remaining byte to a [`PayloadDecoder`]
//! - Payload handling: the [`PayloadDecoder`] is chosen once, when the header block closes
//!
//! # Example
//!
//! ```
//! use micro_http_client::codec::ResponseDecoder;
//!
//! let mut decoder = ResponseDecoder::new();
//! decoder.receive(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhel");
//! assert!(!decoder.is_finished());
//!
//! decoder.receive(b"lo\r\n0\r\n\r\n");
//! assert!(decoder.is_finished());
//!
//! let response = decoder.response().unwrap();
//! assert_eq!(response.status_code, 200);
//! assert_eq!(response.status_text, "OK");
//! assert_eq!(response.headers.get("Transfer-Encoding"), Some("chunked"));
//! assert_eq!(response.body, "hello");
//! ```
//!
//! # Malformed input
//!
//! A byte that does not fit the current state is dropped and the state is left
//! unchanged. Malformed responses therefore never complete rather than failing,
//! and the connection layer bounds every exchange with a timeout.

use bytes::{Bytes, BytesMut};
use http::Method;
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use crate::codec::body::{ChunkSizeRadix, PayloadDecoder};
use crate::protocol::{HeaderMap, ParseError, PayloadSize, Response, StatusLine};

/// A decoder for HTTP responses that handles both the head and the payload
///
/// The decoder operates in two phases:
/// 1. Head parsing: the status line and `Name: Value` lines, until the blank line
/// 2. Payload parsing: every following byte goes to the [`PayloadDecoder`]
///
/// # State Machine
///
/// The decoder never goes back to head parsing once the header block has closed,
/// and the header map is complete before the first body byte is seen.
#[derive(Debug)]
pub struct ResponseDecoder {
    state: ResponseState,
    status_line: Vec<u8>,
    headers: HeaderMap,
    header_name: Vec<u8>,
    header_value: Vec<u8>,
    payload_decoder: Option<PayloadDecoder>,
    radix: ChunkSizeRadix,
    head_request: bool,
    response_taken: bool,
}

impl ResponseDecoder {
    /// Creates a new `ResponseDecoder` reading hexadecimal chunk sizes
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a new `ResponseDecoder` reading chunk sizes in `radix`
    pub fn with_chunk_size_radix(radix: ChunkSizeRadix) -> Self {
        Self {
            state: ResponseState::StatusLine,
            status_line: Vec::new(),
            headers: HeaderMap::new(),
            header_name: Vec::new(),
            header_value: Vec::new(),
            payload_decoder: None,
            radix,
            head_request: false,
            response_taken: false,
        }
    }

    /// Creates a decoder for the response to a `method` request.
    pub fn for_method(method: &Method, radix: ChunkSizeRadix) -> Self {
        let mut decoder = Self::with_chunk_size_radix(radix);
        decoder.set_request_method(method);
        decoder
    }

    /// Records the method of the request being answered.
    ///
    /// A response to `HEAD` never has a body, whatever its framing headers announce.
    pub fn set_request_method(&mut self, method: &Method) {
        self.head_request = *method == Method::HEAD;
    }

    /// Feeds a delivery from the transport, consumed byte by byte.
    pub fn receive(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.receive_byte(byte);
        }
    }

    /// Feeds a single byte through the state machine.
    pub fn receive_byte(&mut self, byte: u8) {
        let (next, action) = self.state.advance(byte);

        match action {
            Action::None => {}
            Action::StatusLine => self.status_line.push(byte),
            Action::HeaderName => self.header_name.push(byte),
            Action::HeaderValue => self.header_value.push(byte),
            Action::CommitHeader => self.commit_header(),
            Action::CloseHeaderBlock => self.close_header_block(),
            Action::Body => {
                if let Some(payload_decoder) = &mut self.payload_decoder {
                    payload_decoder.receive_byte(byte);
                }
            }
        }

        self.state = next;
    }

    /// Signals that the transport reached the end of the stream.
    ///
    /// Only a body delimited by connection close can complete this way.
    pub fn finish_eof(&mut self) {
        if let Some(payload_decoder) = &mut self.payload_decoder {
            payload_decoder.finish_eof();
        }
    }

    /// True iff a body decoder exists and reports completion.
    pub fn is_finished(&self) -> bool {
        self.payload_decoder.as_ref().is_some_and(PayloadDecoder::is_finished)
    }

    /// Headers received so far, in receipt order.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Builds the response from the status line, headers and decoded body.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Incomplete`] until [`is_finished`](Self::is_finished) is true
    /// - [`ParseError::InvalidStatusLine`] if the status line is not `HTTP/1.1 <code> <text>`
    pub fn response(&self) -> Result<Response, ParseError> {
        let payload_decoder = self.payload_decoder.as_ref().filter(|decoder| decoder.is_finished()).ok_or(ParseError::Incomplete)?;

        let status_line = StatusLine::parse(&String::from_utf8_lossy(&self.status_line))?;

        Ok(Response::new(status_line, self.headers.clone(), Bytes::copy_from_slice(payload_decoder.content())))
    }

    fn commit_header(&mut self) {
        let name = String::from_utf8_lossy(&self.header_name).into_owned();
        let value = String::from_utf8_lossy(&self.header_value).into_owned();
        trace!(name = %name, "read header");

        self.headers.insert(name, value);
        self.header_name.clear();
        self.header_value.clear();
    }

    fn close_header_block(&mut self) {
        let status_line = StatusLine::parse(&String::from_utf8_lossy(&self.status_line)).ok();
        let status_code = status_line.as_ref().map(StatusLine::code);
        let payload_size = if self.head_request { PayloadSize::Empty } else { parse_payload(&self.headers, status_code) };
        debug!(
            version = ?status_line.as_ref().map(StatusLine::version),
            status = ?status_code,
            headers = self.headers.len(),
            payload = ?payload_size,
            "response head received"
        );

        self.payload_decoder = Some(PayloadDecoder::from_size(payload_size, self.radix));
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> ResponseState {
        self.state
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::with_chunk_size_radix(ChunkSizeRadix::default())
    }
}

impl Decoder for ResponseDecoder {
    type Item = Response;
    type Error = ParseError;

    /// Feeds everything buffered so far into the state machine
    ///
    /// # Returns
    ///
    /// - `Ok(Some(response))`: the response completed; this happens once per decoder
    /// - `Ok(None)`: need more data to proceed, or the response was already returned
    /// - `Err(_)`: the completed response has an invalid status line
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let bytes = src.split();
        if self.response_taken {
            trace!(len = bytes.len(), "discard bytes after response");
            return Ok(None);
        }

        self.receive(&bytes);
        self.take_response()
    }

    /// Handles the end of the stream
    ///
    /// A body delimited by connection close completes here. Any other response that
    /// has started but not completed is reported as [`ParseError::UnexpectedEof`].
    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(response) = self.decode(buf)? {
            return Ok(Some(response));
        }

        if self.response_taken {
            return Ok(None);
        }

        self.finish_eof();
        if self.is_finished() {
            return self.take_response();
        }

        if self.state == ResponseState::StatusLine && self.status_line.is_empty() {
            // nothing has been received at all
            return Ok(None);
        }

        Err(ParseError::UnexpectedEof)
    }
}

impl ResponseDecoder {
    fn take_response(&mut self) -> Result<Option<Response>, ParseError> {
        if !self.is_finished() {
            return Ok(None);
        }

        self.response_taken = true;
        self.response().map(Some)
    }
}

/// Parsing states, in the order a well-formed response visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResponseState {
    /// Accumulate the status line
    StatusLine,
    /// Swallow the LF ending the status line or a header line
    HeaderLineEnd,
    /// Accumulate a header name, or see the CR of the blank line
    HeaderName,
    /// Wait for the single space after `:`
    HeaderSpace,
    /// Accumulate a header value
    HeaderValue,
    /// Swallow the LF of the blank line
    HeaderBlockEnd,
    /// Forward everything to the payload decoder
    Body,
}

/// Side effect of one transition, applied by [`ResponseDecoder::receive_byte`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    StatusLine,
    HeaderName,
    HeaderValue,
    CommitHeader,
    CloseHeaderBlock,
    Body,
}

impl ResponseState {
    /// Pure transition: the state after `byte`, and what the decoder has to do with it.
    pub(crate) fn advance(self, byte: u8) -> (ResponseState, Action) {
        match (self, byte) {
            (Self::StatusLine, b'\r') => (Self::HeaderLineEnd, Action::None),
            // tolerate LF-only line endings after the status line
            (Self::StatusLine, b'\n') => (Self::HeaderName, Action::None),
            (Self::StatusLine, _) => (Self::StatusLine, Action::StatusLine),

            (Self::HeaderLineEnd, b'\n') => (Self::HeaderName, Action::None),
            (Self::HeaderLineEnd, _) => (Self::HeaderLineEnd, Action::None),

            (Self::HeaderName, b':') => (Self::HeaderSpace, Action::None),
            (Self::HeaderName, b'\r') => (Self::HeaderBlockEnd, Action::CloseHeaderBlock),
            (Self::HeaderName, _) => (Self::HeaderName, Action::HeaderName),

            (Self::HeaderSpace, b' ') => (Self::HeaderValue, Action::None),
            (Self::HeaderSpace, _) => (Self::HeaderSpace, Action::None),

            (Self::HeaderValue, b'\r') => (Self::HeaderLineEnd, Action::CommitHeader),
            (Self::HeaderValue, _) => (Self::HeaderValue, Action::HeaderValue),

            (Self::HeaderBlockEnd, b'\n') => (Self::Body, Action::None),
            (Self::HeaderBlockEnd, _) => (Self::HeaderBlockEnd, Action::None),

            (Self::Body, _) => (Self::Body, Action::Body),
        }
    }
}

/// Determines how the response body is framed.
///
/// Rules, in order:
/// - 1xx, 204 and 304 responses never carry a body
///
/// An interim 1xx response is treated as the final one, so requests must not ask for
/// `Expect: 100-continue`.
/// - `Transfer-Encoding` ending with `chunked` selects chunked decoding
/// - a numeric `Content-Length` selects fixed-length decoding
/// - otherwise the body runs until the server closes the connection
fn parse_payload(headers: &HeaderMap, status_code: Option<u16>) -> PayloadSize {
    if matches!(status_code, Some(100..=199 | 204 | 304)) {
        return PayloadSize::Empty;
    }

    if is_chunked(headers.get_ignore_case(http::header::TRANSFER_ENCODING.as_str())) {
        return PayloadSize::Chunked;
    }

    let content_length = headers.get_ignore_case(http::header::CONTENT_LENGTH.as_str()).and_then(parse_content_length);

    match content_length {
        Some(length) => PayloadSize::Length(length),
        None => PayloadSize::UntilClose,
    }
}

/// Only ASCII digits are a valid `Content-Length`, surrounding whitespace aside.
fn parse_content_length(value: &str) -> Option<u64> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse::<u64>().ok()
}

/// Checks if the Transfer-Encoding header indicates chunked encoding.
///
/// According to RFC 9112, chunked must be the last encoding if present.
fn is_chunked(header_value: Option<&str>) -> bool {
    header_value
        .and_then(|value| value.rsplit(',').next())
        .is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
}
