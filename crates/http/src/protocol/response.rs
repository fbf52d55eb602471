//! The decoded HTTP response value.
//!
//! A [`Response`] is produced exactly once per exchange, when the body decoder
//! reports completion. Headers are kept raw in receipt order, the body is the
//! entity body with transfer framing removed.

use bytes::Bytes;
use http::{HeaderName, HeaderValue, StatusCode};

use crate::protocol::{HeaderMap, ParseError, StatusLine};

/// A completed HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status_code: u16,
    pub status_text: String,
    pub headers: HeaderMap,
    pub body: String,
    body_bytes: Bytes,
}

impl Response {
    /// Builds a response from its decoded parts.
    ///
    /// The body octets are kept as received; the `body` string is their UTF-8
    /// decoding, with invalid sequences replaced by U+FFFD.
    pub fn new(status_line: StatusLine, headers: HeaderMap, body_bytes: Bytes) -> Self {
        let (status_code, status_text) = status_line.into_parts();
        let body = String::from_utf8_lossy(&body_bytes).into_owned();
        Self { status_code, status_text, headers, body, body_bytes }
    }

    /// The raw body octets.
    pub fn body_bytes(&self) -> &Bytes {
        &self.body_bytes
    }

    /// Converts into an [`http::Response`].
    ///
    /// Fails when the status code is outside `100..=999` or a header cannot be represented
    /// as an [`http`] header.
    pub fn into_http(self) -> Result<http::Response<String>, ParseError> {
        let status = StatusCode::from_u16(self.status_code)
            .map_err(|e| ParseError::invalid_status_line(format!("{} {}: {e}", self.status_code, self.status_text)))?;

        let mut response = http::Response::new(self.body);
        *response.status_mut() = status;

        let headers = response.headers_mut();
        headers.reserve(self.headers.len());
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(ParseError::invalid_header)?;
            let value = HeaderValue::from_str(value).map_err(ParseError::invalid_header)?;
            headers.insert(name, value);
        }

        Ok(response)
    }
}
