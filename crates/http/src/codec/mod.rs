//! HTTP codec module for encoding requests and decoding responses
//!
//! This module provides the client side of HTTP/1.1 message processing:
//! request encoding and incremental response decoding. Both plug into
//! `tokio_util`'s [`FramedWrite`](tokio_util::codec::FramedWrite) and
//! [`FramedRead`](tokio_util::codec::FramedRead).
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestEncoder`]: Encodes outgoing HTTP requests
//!   - Head encoding via the [`header`] module
//!
//! - Response handling:
//!   - [`ResponseDecoder`]: Decodes the incoming HTTP response byte by byte
//!   - Payload decoding via the [`body`] module
//!
//! # Example
//!
//! ```
//! use micro_http_client::codec::{RequestEncoder, ResponseDecoder};
//! use micro_http_client::protocol::RequestBody;
//! use tokio_util::codec::{Decoder, Encoder};
//! use bytes::BytesMut;
//!
//! // Encode outgoing request
//! let request = http::Request::get("http://example.test/").body(RequestBody::Empty).unwrap();
//! let mut request_buffer = BytesMut::new();
//! RequestEncoder::new().encode(request, &mut request_buffer).unwrap();
//!
//! // Decode incoming response
//! let mut decoder = ResponseDecoder::new();
//! let mut response_buffer = BytesMut::from(&b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok"[..]);
//! let response = decoder.decode(&mut response_buffer).unwrap().unwrap();
//! assert_eq!(response.body, "ok");
//! ```

pub mod body;
pub mod header;
mod request_encoder;
mod response_decoder;

pub use body::ChunkSizeRadix;
pub use request_encoder::RequestEncoder;
pub use response_decoder::ResponseDecoder;
