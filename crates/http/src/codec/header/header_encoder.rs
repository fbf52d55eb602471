//! HTTP header encoder implementation for serializing HTTP request heads
//!
//! This module encodes the request line and request headers into raw bytes.
//! It fills in the headers a server needs to frame the exchange:
//!
//! - `Host`, derived from the request URI when the caller did not set one
//! - `Content-Type`, from the body kind when the caller did not set one
//! - `Content-Length`, always replaced by the serialized body length

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use http::request::Parts;
use http::{HeaderValue, Version, header};
use tokio_util::codec::Encoder;
use tracing::error;

use crate::protocol::{RequestBody, SendError};

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

/// Encoder for HTTP request heads implementing the [`Encoder`] trait.
///
/// The body is only inspected for its length and default content type; writing it
/// is left to the caller.
#[derive(Debug)]
pub struct HeaderEncoder;

impl Encoder<(Parts, &RequestBody)> for HeaderEncoder {
    type Error = SendError;

    /// Encodes the request line and headers into the provided bytes buffer.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - HTTP version is not supported (only HTTP/1.1 supported)
    /// - no `Host` header is set and the URI has no host
    /// - a derived header value is not valid
    fn encode(&mut self, item: (Parts, &RequestBody), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (mut parts, body) = item;

        if parts.version != Version::HTTP_11 {
            error!(http_version = ?parts.version, "unsupported http version");
            return Err(SendError::UnsupportedVersion(parts.version));
        }

        if !parts.headers.contains_key(header::HOST) {
            let host = host_value(&parts)?;
            parts.headers.insert(header::HOST, host);
        }

        if !parts.headers.contains_key(header::CONTENT_TYPE) {
            if let Some(content_type) = body.default_content_type() {
                let value = HeaderValue::from_str(content_type.as_ref()).map_err(SendError::invalid_body)?;
                parts.headers.insert(header::CONTENT_TYPE, value);
            }
        }

        parts.headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));

        dst.reserve(INIT_HEADER_SIZE);
        let target = parts.uri.path_and_query().map_or("/", |path_and_query| path_and_query.as_str());
        write!(FastWrite(dst), "{} {} HTTP/1.1\r\n", parts.method, target)?;

        // Write all headers
        for (header_name, header_value) in &parts.headers {
            dst.put_slice(header_name.as_ref());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_ref());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Builds the `Host` header value from the request URI, keeping an explicit port.
fn host_value(parts: &Parts) -> Result<HeaderValue, SendError> {
    let host = parts.uri.host().ok_or_else(|| SendError::invalid_uri(format!("no host in {}", parts.uri)))?;

    let value = match parts.uri.port_u16() {
        Some(port) => HeaderValue::from_str(&format!("{host}:{port}")),
        None => HeaderValue::from_str(host),
    };

    value.map_err(SendError::invalid_uri)
}

/// Fast writer implementation for writing to BytesMut.
///
/// This is an optimization to avoid unnecessary bounds checking when writing
/// to the bytes buffer, since we've already reserved enough space.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;

    fn encode(request: Request<RequestBody>) -> Result<String, SendError> {
        let (parts, body) = request.into_parts();
        let mut dst = BytesMut::new();
        HeaderEncoder.encode((parts, &body), &mut dst)?;
        Ok(String::from_utf8(dst.to_vec()).unwrap())
    }

    #[test]
    fn get_without_body() {
        let request = Request::get("http://example.test/index.html?a=1").body(RequestBody::Empty).unwrap();
        assert_eq!(encode(request).unwrap(), "GET /index.html?a=1 HTTP/1.1\r\nhost: example.test\r\ncontent-length: 0\r\n\r\n");
    }

    #[test]
    fn host_keeps_port_and_default_path() {
        let request = Request::post("http://127.0.0.1:8088").body(RequestBody::Form("name=x".into())).unwrap();
        let head = encode(request).unwrap();

        assert!(head.starts_with("POST / HTTP/1.1\r\n"));
        assert!(head.contains("host: 127.0.0.1:8088\r\n"));
        assert!(head.contains("content-type: application/x-www-form-urlencoded\r\n"));
        assert!(head.contains("content-length: 6\r\n"));
        assert!(head.ends_with("\r\n\r\n"));
    }

    #[test]
    fn caller_headers_win_except_content_length() {
        let request = Request::post("http://example.test/")
            .header(header::HOST, "virtual.test")
            .header(header::CONTENT_TYPE, "text/csv")
            .header(header::CONTENT_LENGTH, "999")
            .header("X-Foo2", "customed")
            .body(RequestBody::text("a,b"))
            .unwrap();
        let head = encode(request).unwrap();

        assert!(head.contains("host: virtual.test\r\n"));
        assert!(head.contains("content-type: text/csv\r\n"));
        assert!(head.contains("content-length: 3\r\n"));
        assert!(!head.contains("999"));
        assert!(head.contains("x-foo2: customed\r\n"));
    }

    #[test]
    fn missing_host() {
        let request = Request::get("/relative").body(RequestBody::Empty).unwrap();
        assert!(matches!(encode(request), Err(SendError::InvalidUri { .. })));
    }

    #[test]
    fn relative_uri_with_host_header() {
        let request = Request::get("/relative").header(header::HOST, "example.test").body(RequestBody::Empty).unwrap();
        assert!(encode(request).unwrap().starts_with("GET /relative HTTP/1.1\r\nhost: example.test\r\n"));
    }

    #[test]
    fn unsupported_version() {
        let request = Request::get("http://example.test/").version(Version::HTTP_2).body(RequestBody::Empty).unwrap();
        assert!(matches!(encode(request), Err(SendError::UnsupportedVersion(Version::HTTP_2))));
    }
}
