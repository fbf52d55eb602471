//! HTTP connection handling module
//!
//! This module drives one request/response exchange over any pair of async
//! byte streams.
//!
//! # Components
//!
//! - [`HttpConnection`]: Main connection handler that:
//!   - Encodes and flushes the request
//!   - Feeds response bytes to the decoder as they arrive
//!   - Resolves exactly once, with the response or an error
//!
//! Opening sockets and bounding the exchange with a timeout is done by
//! [`Client`](crate::client::Client).

mod http_connection;

pub use http_connection::DEFAULT_READ_BUFFER_CAPACITY;
pub use http_connection::HttpConnection;
