use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, info};

use crate::codec::{RequestEncoder, ResponseDecoder};
use crate::protocol::{ClientRequest, HttpError, Response};

/// Default capacity of the read buffer handed to the decoder
pub const DEFAULT_READ_BUFFER_CAPACITY: usize = 8 * 1024;

/// An HTTP connection that carries exactly one request/response exchange
///
/// `HttpConnection` handles the full lifecycle of one exchange:
/// - Encoding and flushing the request
/// - Feeding every delivery from the reader into a [`ResponseDecoder`]
/// - Returning the completed response, once
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, ResponseDecoder>,
    framed_write: FramedWrite<W, RequestEncoder>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_decoder(reader, writer, ResponseDecoder::new(), DEFAULT_READ_BUFFER_CAPACITY)
    }

    /// Creates a connection using a preconfigured decoder and read buffer capacity.
    pub fn with_decoder(reader: R, writer: W, decoder: ResponseDecoder, capacity: usize) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, decoder, capacity),
            framed_write: FramedWrite::new(writer, RequestEncoder::new()),
        }
    }

    /// Sends `request` and waits for the complete response.
    ///
    /// The connection is consumed: decoder state never outlives the exchange, and a
    /// failed exchange exposes no partial response.
    ///
    /// # Errors
    ///
    /// - [`HttpError::RequestError`] when the request can't be encoded or written
    /// - [`HttpError::ResponseError`] when reading fails or the stream ends mid-response
    /// - [`HttpError::ConnectionClosed`] when the stream ends before any response byte
    pub async fn send(mut self, request: ClientRequest) -> Result<Response, HttpError> {
        let method = request.method().clone();
        let uri = request.uri().clone();
        self.framed_read.decoder_mut().set_request_method(&method);

        // using send instead of feed, because the whole request must reach the peer
        // before we start waiting for its answer
        self.framed_write.send(request).await?;
        debug!(%method, %uri, "request sent");

        match self.framed_read.next().await {
            Some(Ok(response)) => {
                info!(%method, %uri, status = response.status_code, body_size = response.body_bytes().len(), "received response");
                Ok(response)
            }

            Some(Err(e)) => {
                error!(cause = %e, "can't receive response");
                Err(e.into())
            }

            None => {
                error!("connection closed before a response was received");
                Err(HttpError::ConnectionClosed)
            }
        }
    }
}
