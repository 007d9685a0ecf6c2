//! One-shot router status probe over UPnP/SOAP.
//!
//! Each probe is exactly one POST to the router's IGD control URL and one
//! element lookup in the response. There is no retry here; the poller
//! owns the cadence.

use core::fmt::Write;

use heapless::String;

use super::{StatusKind, StatusValue};
use crate::config::{STATUS_RESPONSE_LEN, TRANSPORT_TIMEOUT};
use crate::error::{Fatal, ProbeError, TransportError};
use crate::transport::{Header, Transport};

/// Capacity of a control URL.
const URL_LEN: usize = 128;

const CONTROL_PATH: &str = "/igdupnp/control/";

const GET_STATUS_INFO: &str = concat!(
    r#"<?xml version="1.0" encoding="utf-8"?><s:Envelope s:encodingStyle="#,
    r#""http://schemas.xmlsoap.org/soap/encoding/"xmlns:s="#,
    r#""http://schemas.xmlsoap.org/soap/envelope/"><s:Body><u:GetStatusInfo "#,
    r#"xmlns:u="urn:schemas-upnp-org:service:WANIPConnection:1">"#,
    r#"</u:GetStatusInfo></s:Body></s:Envelope>"#,
);

const GET_COMMON_LINK_PROPERTIES: &str = concat!(
    r#"<?xml version="1.0" encoding="utf-8"?><s:Envelope s:encodingStyle="#,
    r#""http://schemas.xmlsoap.org/soap/encoding/"xmlns:s="#,
    r#""http://schemas.xmlsoap.org/soap/envelope/"><s:Body>"#,
    r#"<u:GetCommonLinkProperties "#,
    r#"xmlns:u="urn:schemas-upnp-org:service:WANCommonInterfaceConfig:1">"#,
    r#"</u:GetCommonLinkProperties></s:Body></s:Envelope>"#,
);

/// Fixed request/response shape of one status query.
struct SoapCall {
    url_suffix: &'static str,
    action: &'static str,
    body: &'static str,
    /// Response element carrying the status text.
    element: &'static str,
    /// Status text that means "up"; anything else means "down".
    up_value: &'static str,
}

const CONNECTION_STATUS: SoapCall = SoapCall {
    url_suffix: "WANIPConn1",
    action: "urn:schemas-upnp-org:service:WANIPConnection:1#GetStatusInfo",
    body: GET_STATUS_INFO,
    element: "NewConnectionStatus",
    up_value: "Connected",
};

const LINK_STATUS: SoapCall = SoapCall {
    url_suffix: "WANCommonIFC1",
    action: "urn:schemas-upnp-org:service:WANCommonInterfaceConfig:1#GetCommonLinkProperties",
    body: GET_COMMON_LINK_PROPERTIES,
    element: "NewPhysicalLinkStatus",
    up_value: "Up",
};

impl StatusKind {
    fn soap_call(self) -> &'static SoapCall {
        match self {
            StatusKind::Linked => &LINK_STATUS,
            StatusKind::Connected => &CONNECTION_STATUS,
        }
    }
}

/// Where the router's UPnP control service listens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouterEndpoint {
    pub host: &'static str,
    pub port: u16,
}

/// Issues status queries against one router.
pub struct StatusProbe {
    router: RouterEndpoint,
}

impl StatusProbe {
    pub const fn new(router: RouterEndpoint) -> Self {
        Self { router }
    }

    /// Control URL for `kind`.
    pub fn url(&self, kind: StatusKind) -> Result<String<URL_LEN>, ProbeError> {
        let mut url = String::new();
        write!(
            url,
            "http://{}:{}{}{}",
            self.router.host,
            self.router.port,
            CONTROL_PATH,
            kind.soap_call().url_suffix
        )
        .map_err(|_| ProbeError::Request)?;
        Ok(url)
    }

    /// Perform one probe and report every failure as it happened.
    pub async fn request<T: Transport>(
        &self,
        transport: &mut T,
        kind: StatusKind,
    ) -> Result<StatusValue, ProbeError> {
        let call = kind.soap_call();
        let url = self.url(kind)?;
        let headers = [
            Header::new("charset", "utf-8"),
            Header::new("content-type", "text/xml"),
            Header::new("soapaction", call.action),
        ];

        debug!("Get: {}", call.url_suffix);
        let mut buf = [0u8; STATUS_RESPONSE_LEN];
        let response = transport
            .post(&url, call.body, &headers, TRANSPORT_TIMEOUT, &mut buf)
            .await?;

        let status = extract_element(response, call.element).ok_or(ProbeError::Parse)?;
        debug!("Received {} state: {}", kind, status);

        Ok(if status == call.up_value {
            StatusValue::Up
        } else {
            StatusValue::Down
        })
    }

    /// Perform one probe; every recoverable failure reads as `Unknown`.
    pub async fn query<T: Transport>(
        &self,
        transport: &mut T,
        kind: StatusKind,
    ) -> Result<StatusValue, Fatal> {
        match self.request(transport, kind).await {
            Ok(value) => Ok(value),
            Err(ProbeError::Transport(TransportError::OutOfMemory)) => {
                error!("Out of memory while probing {}", kind);
                Err(Fatal::OutOfMemory)
            }
            Err(ProbeError::Transport(e)) => {
                warn!("Couldn't get {} status ({}), will try again later", kind, e);
                Ok(StatusValue::Unknown)
            }
            Err(ProbeError::Parse) => {
                warn!("No {} element in router response", kind);
                Ok(StatusValue::Unknown)
            }
            Err(ProbeError::Request) => {
                warn!("Control URL for {} too long", kind);
                Ok(StatusValue::Unknown)
            }
        }
    }
}

/// Text between `<name>` and the matching `</name>`.
pub fn extract_element<'a>(xml: &'a str, name: &str) -> Option<&'a str> {
    let mut rest = xml;
    let content = loop {
        let at = rest.find('<')?;
        rest = &rest[at + 1..];
        if let Some(tail) = rest.strip_prefix(name).and_then(|t| t.strip_prefix('>')) {
            break tail;
        }
    };

    let mut offset = 0;
    loop {
        let at = offset + content[offset..].find("</")?;
        let closing = &content[at + 2..];
        if closing
            .strip_prefix(name)
            .is_some_and(|t| t.starts_with('>'))
        {
            return Some(&content[..at]);
        }
        offset = at + 2;
    }
}
