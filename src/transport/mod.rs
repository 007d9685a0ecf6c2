//! Network transport contract.
//!
//! The dashboard only ever issues single request/response exchanges with a
//! fixed timeout. Bodies are returned as text borrowed from a buffer the
//! caller owns, so no allocator is needed on either side.

use embassy_time::Duration;

pub use crate::error::TransportError;

/// One HTTP request header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

impl<'a> Header<'a> {
    pub const fn new(name: &'a str, value: &'a str) -> Self {
        Self { name, value }
    }
}

/// Request/response transport (HTTP over the Wi-Fi link).
///
/// Implementations enforce `timeout` themselves and never retry.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// POST `body` to `url` and return the response body.
    async fn post<'b>(
        &mut self,
        url: &str,
        body: &str,
        headers: &[Header<'_>],
        timeout: Duration,
        response: &'b mut [u8],
    ) -> Result<&'b str, TransportError>;

    /// GET `url` and return the response body.
    async fn get<'b>(
        &mut self,
        url: &str,
        timeout: Duration,
        response: &'b mut [u8],
    ) -> Result<&'b str, TransportError>;
}
