//! HTTP header processing module for encoding request heads
//!
//! - [`HeaderEncoder`]: Encodes the request line and headers to bytes
//!   - Implements standard HTTP/1.1 header formatting
//!   - Derives `Host` and `Content-Type` when the caller left them out
//!   - Always announces the body size through `Content-Length`
//!
//! Response headers are parsed by the byte-level state machine in
//! [`ResponseDecoder`](crate::codec::ResponseDecoder) instead.

mod header_encoder;

pub use header_encoder::HeaderEncoder;
