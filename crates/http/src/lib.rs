//! An asynchronous micro HTTP/1.1 client
//!
//! This crate sends one request per connection and decodes the response incrementally,
//! byte by byte, as it arrives. It is built on top of tokio and `tokio_util` codecs.
//!
//! # Features
//!
//! - Response decoding independent of how the bytes are split across deliveries
//! - Chunked transfer encoding, with hexadecimal or decimal chunk sizes
//! - `Content-Length` and read-until-close bodies
//! - Form, JSON, text and raw request bodies with derived framing headers
//! - Connect/send/receive bounded by a single timeout
//!
//! # Example
//!
//! ```no_run
//! use http::Request;
//! use micro_http_client::Client;
//! use micro_http_client::protocol::RequestBody;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let body = RequestBody::form(&[("name", "caihuiting")])?;
//!     let request = Request::post("http://127.0.0.1:8088/").header("X-Foo2", "customed").body(body)?;
//!
//!     let response = Client::new().send(request).await?;
//!     println!("{} {}\n{}", response.status_code, response.status_text, response.body);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: Request, response, header and error types
//! - [`codec`]: The response decoder state machines and the request encoder
//! - [`connection`]: One exchange over any pair of async streams
//! - [`client`]: TCP transport and configuration
//!
//! # Limitations
//!
//! - HTTP/1.1 only, plain `http` scheme only (no TLS)
//! - One request per connection, no keep-alive or pipelining
//! - No redirects, no content decoding

pub mod client;
pub mod codec;
pub mod connection;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;

pub use client::{Client, ClientBuilder, ClientConfig};
