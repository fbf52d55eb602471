use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::codec::header::HeaderEncoder;
use crate::protocol::{ClientRequest, SendError};

/// Encodes a whole [`ClientRequest`]: request line, headers and body.
///
/// The body is already serialized, so the announced `Content-Length` always matches
/// the bytes written after the head.
#[derive(Debug)]
pub struct RequestEncoder {
    header_encoder: HeaderEncoder,
}

impl RequestEncoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for RequestEncoder {
    fn default() -> Self {
        Self { header_encoder: HeaderEncoder }
    }
}

impl Encoder<ClientRequest> for RequestEncoder {
    type Error = SendError;

    fn encode(&mut self, item: ClientRequest, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (parts, body) = item.into_parts();
        trace!(method = %parts.method, uri = %parts.uri, body_size = body.len(), "encode request");

        self.header_encoder.encode((parts, &body), dst)?;
        dst.put_slice(body.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::RequestBody;
    use http::Request;
    use indoc::indoc;

    #[test]
    fn post_form() {
        let body = RequestBody::form(&[("name", "caihuiting")]).unwrap();
        let request = Request::post("http://127.0.0.1:8088/").header("X-Foo2", "customed").body(body).unwrap();

        let mut dst = BytesMut::new();
        RequestEncoder::new().encode(request, &mut dst).unwrap();

        let expected = indoc! {"
            POST / HTTP/1.1
            x-foo2: customed
            host: 127.0.0.1:8088
            content-type: application/x-www-form-urlencoded
            content-length: 15

            name=caihuiting"}
        .replace('\n', "\r\n");

        assert_eq!(&dst[..], expected.as_bytes());
    }

    #[test]
    fn json_body_follows_head() {
        let body = RequestBody::json(&serde_json::json!({"name": "caihuiting"})).unwrap();
        let request = Request::put("http://example.test/users/1").body(body).unwrap();

        let mut dst = BytesMut::new();
        RequestEncoder::new().encode(request, &mut dst).unwrap();

        let text = std::str::from_utf8(&dst).unwrap();
        let (head, body) = text.split_once("\r\n\r\n").unwrap();
        assert!(head.starts_with("PUT /users/1 HTTP/1.1\r\n"));
        assert!(head.contains("content-type: application/json"));
        assert!(head.contains(&format!("content-length: {}", body.len())));
        assert_eq!(body, r#"{"name":"caihuiting"}"#);
    }
}
