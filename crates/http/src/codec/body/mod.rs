//! HTTP body handling module for decoding response payloads
//!
//! This module decodes HTTP response bodies byte by byte, using the transfer
//! strategy announced by the response headers.
//!
//! # Components
//!
//! - [`ChunkedDecoder`]: Handles chunked transfer encoded payloads
//! - [`LengthDecoder`]: Processes fixed-length payloads
//! - [`PayloadDecoder`]: Main decoder that coordinates different decoding strategies
//!
//! # Features
//!
//! - Support for chunked transfer encoding (RFC 9112), hexadecimal or decimal sizes
//! - Content-Length based payload handling
//! - Read-until-close bodies
//! - Resumable at any byte boundary

mod chunked_decoder;
mod length_decoder;
mod payload_decoder;

pub use chunked_decoder::ChunkSizeRadix;
pub use chunked_decoder::ChunkedDecoder;
pub use length_decoder::LengthDecoder;
pub use payload_decoder::PayloadDecoder;
