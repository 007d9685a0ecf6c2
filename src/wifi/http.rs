//! HTTP(S) client for the dashboard: `reqwless` over `embassy-net`.
//!
//! One TCP socket is shared by every request; `http://` URLs go out in
//! the clear, `https://` URLs through `embedded-tls`. The server
//! certificate is not verified. Each exchange, DNS and TLS handshake
//! included, is bounded by the caller's timeout.

use defmt::debug;
use embassy_net::dns::DnsSocket;
use embassy_net::tcp::client::{TcpClient, TcpClientState};
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration};
use embedded_io_async::{ErrorKind, Read};
use heapless::Vec;
use reqwless::client::{HttpClient as Client, TlsConfig, TlsVerify};
use reqwless::request::{Method, RequestBuilder};
use reqwless::response::Response;
use static_cell::{ConstStaticCell, StaticCell};

use touchdash::transport::{Header, Transport, TransportError};

const TCP_BUFFER_LEN: usize = 1024;
/// A full TLS record plus its header and tag.
const TLS_READ_LEN: usize = 16640;
const TLS_WRITE_LEN: usize = 4096;
const MAX_HEADERS: usize = 4;

type Tcp = TcpClient<'static, 1, TCP_BUFFER_LEN, TCP_BUFFER_LEN>;

static TCP_STATE: StaticCell<TcpClientState<1, TCP_BUFFER_LEN, TCP_BUFFER_LEN>> =
    StaticCell::new();
static TCP: StaticCell<Tcp> = StaticCell::new();
static DNS: StaticCell<DnsSocket<'static>> = StaticCell::new();
static TLS_READ: ConstStaticCell<[u8; TLS_READ_LEN]> = ConstStaticCell::new([0; TLS_READ_LEN]);
static TLS_WRITE: ConstStaticCell<[u8; TLS_WRITE_LEN]> = ConstStaticCell::new([0; TLS_WRITE_LEN]);

/// [`Transport`] on the Wi-Fi network stack.
///
/// [`TransportError::OutOfMemory`] is reported when the network layer
/// fails with `ErrorKind::OutOfMemory`. With a single pooled socket and
/// static TLS buffers that only happens if the stack itself is starved.
pub struct HttpClient {
    client: Client<'static, Tcp, DnsSocket<'static>>,
}

impl HttpClient {
    /// Call once; the socket pool and TLS buffers are static.
    pub fn new(stack: Stack<'static>, tls_seed: u64) -> Self {
        let tcp = TCP.init(TcpClient::new(stack, TCP_STATE.init(TcpClientState::new())));
        let dns = DNS.init(DnsSocket::new(stack));
        let tls = TlsConfig::new(
            tls_seed,
            TLS_READ.take(),
            TLS_WRITE.take(),
            TlsVerify::None,
        );
        Self {
            client: Client::new_with_tls(tcp, dns, tls),
        }
    }

    async fn exchange<'b>(
        &mut self,
        method: Method,
        url: &str,
        headers: &[Header<'_>],
        body: Option<&str>,
        timeout: Duration,
        response: &'b mut [u8],
    ) -> Result<&'b str, TransportError> {
        let mut pairs: Vec<(&str, &str), MAX_HEADERS> = Vec::new();
        for header in headers {
            pairs
                .push((header.name, header.value))
                .map_err(|_| TransportError::RequestTooLarge)?;
        }

        let body = with_timeout(timeout, async move {
            let request = self
                .client
                .request(method, url)
                .await
                .map_err(transport_error)?
                .headers(&pairs);
            match body {
                Some(body) => {
                    let mut request = request.body(body.as_bytes());
                    read_body(request.send(response).await.map_err(transport_error)?).await
                }
                None => {
                    let mut request = request;
                    read_body(request.send(response).await.map_err(transport_error)?).await
                }
            }
        })
        .await
        .map_err(|_| TransportError::Timeout)??;

        debug!("{} bytes from {}", body.len(), url);
        core::str::from_utf8(body).map_err(|_| TransportError::BadResponse)
    }
}

async fn read_body<'b, C: Read>(reply: Response<'_, 'b, C>) -> Result<&'b [u8], TransportError> {
    if !reply.status.is_successful() {
        return Err(TransportError::BadResponse);
    }
    let body = reply.body().read_to_end().await.map_err(transport_error)?;
    Ok(body)
}

fn transport_error(e: reqwless::Error) -> TransportError {
    match e {
        reqwless::Error::Dns => TransportError::Dns,
        reqwless::Error::Network(ErrorKind::OutOfMemory) => TransportError::OutOfMemory,
        reqwless::Error::Network(ErrorKind::TimedOut) => TransportError::Timeout,
        reqwless::Error::Network(ErrorKind::ConnectionRefused) => TransportError::Connect,
        reqwless::Error::BufferTooSmall => TransportError::ResponseTooLarge,
        reqwless::Error::InvalidUrl(_) => TransportError::Unsupported,
        reqwless::Error::Codec => TransportError::BadResponse,
        _ => TransportError::Io,
    }
}

impl Transport for HttpClient {
    async fn post<'b>(
        &mut self,
        url: &str,
        body: &str,
        headers: &[Header<'_>],
        timeout: Duration,
        response: &'b mut [u8],
    ) -> Result<&'b str, TransportError> {
        self.exchange(Method::POST, url, headers, Some(body), timeout, response)
            .await
    }

    async fn get<'b>(
        &mut self,
        url: &str,
        timeout: Duration,
        response: &'b mut [u8],
    ) -> Result<&'b str, TransportError> {
        self.exchange(Method::GET, url, &[], None, timeout, response)
            .await
    }
}
