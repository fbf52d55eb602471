//! Core HTTP protocol types shared by the codec and connection layers.
//!
//! # Architecture
//!
//! - **Response side**
//!   - [`Response`]: the decoded response value, produced once per exchange
//!   - [`HeaderMap`]: raw, ordered response headers
//!   - [`StatusLine`]: decomposed `HTTP/1.1 <code> <text>` line
//!   - [`PayloadSize`]: how the response body is framed
//!
//! - **Request side**
//!   - [`ClientRequest`]: an `http::Request` carrying a [`RequestBody`]
//!
//! - **Error Handling** ([`error`])
//!   - [`HttpError`]: Top-level error type
//!   - [`ParseError`]: Response decoding errors
//!   - [`SendError`]: Request sending errors

mod message;
pub use message::PayloadSize;

mod header_map;
pub use header_map::HeaderMap;

mod status_line;
pub use status_line::StatusLine;

mod request;
pub use request::ClientRequest;
pub use request::RequestBody;

mod response;
pub use response::Response;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
