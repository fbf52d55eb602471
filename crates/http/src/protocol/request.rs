//! Outbound request body handling.
//!
//! Requests are plain [`http::Request`]s carrying a [`RequestBody`]. The body is
//! serialized eagerly when it is built, so the encoder always knows the exact
//! `Content-Length` to announce.

use bytes::Bytes;
use mime::Mime;
use serde::Serialize;

use crate::protocol::SendError;

/// A request ready to be sent by the client.
pub type ClientRequest = http::Request<RequestBody>;

/// The already-serialized body of an outgoing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    /// No body, announced as `Content-Length: 0`
    #[default]
    Empty,
    /// Plain text
    Text(String),
    /// `application/x-www-form-urlencoded` pairs
    Form(String),
    /// `application/json` document
    Json(String),
    /// Raw bytes with no default content type
    Bytes(Bytes),
}

impl RequestBody {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Serializes `value` as url-encoded form pairs.
    pub fn form<T: Serialize + ?Sized>(value: &T) -> Result<Self, SendError> {
        serde_urlencoded::to_string(value).map(Self::Form).map_err(SendError::invalid_body)
    }

    /// Serializes `value` as a JSON document.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, SendError> {
        serde_json::to_string(value).map(Self::Json).map_err(SendError::invalid_body)
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RequestBody::Empty => &[],
            RequestBody::Text(s) | RequestBody::Form(s) | RequestBody::Json(s) => s.as_bytes(),
            RequestBody::Bytes(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `Content-Type` used when the request does not set one.
    pub fn default_content_type(&self) -> Option<Mime> {
        match self {
            RequestBody::Empty | RequestBody::Bytes(_) => None,
            RequestBody::Text(_) => Some(mime::TEXT_PLAIN_UTF_8),
            RequestBody::Form(_) => Some(mime::APPLICATION_WWW_FORM_URLENCODED),
            RequestBody::Json(_) => Some(mime::APPLICATION_JSON),
        }
    }
}

impl From<String> for RequestBody {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&'static str> for RequestBody {
    fn from(value: &'static str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<Bytes> for RequestBody {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<()> for RequestBody {
    fn from((): ()) -> Self {
        Self::Empty
    }
}
