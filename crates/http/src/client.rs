//! TCP transport: one connection per request, bounded by a timeout.

use std::time::Duration;

use http::Uri;
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::codec::{ChunkSizeRadix, ResponseDecoder};
use crate::connection::{DEFAULT_READ_BUFFER_CAPACITY, HttpConnection};
use crate::protocol::{ClientRequest, HttpError, Response, SendError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_HTTP_PORT: u16 = 80;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Upper bound for connect, send and receive together
    pub timeout: Duration,
    pub read_buffer_capacity: usize,
    pub chunk_size_radix: ChunkSizeRadix,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            read_buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY,
            chunk_size_radix: ChunkSizeRadix::default(),
        }
    }
}

#[derive(Debug)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    fn new() -> Self {
        Self { config: ClientConfig::default() }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn read_buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.read_buffer_capacity = capacity;
        self
    }

    pub fn chunk_size_radix(mut self, radix: ChunkSizeRadix) -> Self {
        self.config.chunk_size_radix = radix;
        self
    }

    pub fn build(self) -> Client {
        Client { config: self.config }
    }
}

/// Sends requests over plain `http` TCP connections.
///
/// Every call to [`Client::send`] opens its own connection, so one client can be shared
/// by concurrent tasks.
///
/// ```no_run
/// use http::Request;
/// use micro_http_client::Client;
/// use micro_http_client::protocol::RequestBody;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::builder().timeout(std::time::Duration::from_secs(5)).build();
/// let request = Request::get("http://127.0.0.1:8088/").body(RequestBody::Empty)?;
/// let response = client.send(request).await?;
/// println!("{} {}", response.status_code, response.body);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Client {
    config: ClientConfig,
}

impl Client {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends `request` and resolves with the complete response.
    ///
    /// The first response received is the result, even an interim 1xx one. Don't set
    /// `Expect: 100-continue` on `request`.
    ///
    /// # Errors
    ///
    /// - [`HttpError::RequestError`] when the URI is not a usable `http` URI
    /// - [`HttpError::Connect`] when the TCP connection can't be opened
    /// - [`HttpError::Timeout`] when the exchange does not finish within the configured timeout
    /// - any error of [`HttpConnection::send`]
    pub async fn send(&self, request: ClientRequest) -> Result<Response, HttpError> {
        let (host, port) = target_address(request.uri())?;
        let timeout = self.config.timeout;

        match tokio::time::timeout(timeout, self.exchange(&host, port, request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(%host, port, ?timeout, "request timed out");
                Err(HttpError::Timeout(timeout))
            }
        }
    }

    async fn exchange(&self, host: &str, port: u16, request: ClientRequest) -> Result<Response, HttpError> {
        let tcp_stream = TcpStream::connect((host, port)).await.map_err(HttpError::connect)?;
        debug!(host, port, "connected");

        let (reader, writer) = tcp_stream.into_split();
        let decoder = ResponseDecoder::for_method(request.method(), self.config.chunk_size_radix);
        let connection = HttpConnection::with_decoder(reader, writer, decoder, self.config.read_buffer_capacity);
        connection.send(request).await
    }
}

/// Resolves the host and port to connect to, only plain `http` is supported.
fn target_address(uri: &Uri) -> Result<(String, u16), SendError> {
    match uri.scheme_str() {
        Some("http") => {}
        Some(scheme) => return Err(SendError::invalid_uri(format!("unsupported scheme {scheme} in {uri}"))),
        None => return Err(SendError::invalid_uri(format!("no scheme in {uri}"))),
    }

    let host = uri.host().ok_or_else(|| SendError::invalid_uri(format!("no host in {uri}")))?;
    Ok((host.to_string(), uri.port_u16().unwrap_or(DEFAULT_HTTP_PORT)))
}
