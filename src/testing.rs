//! In-memory collaborator doubles for host tests.

use std::collections::VecDeque;

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

pub use embassy_futures::block_on;

use crate::error::TransportError;
use crate::hid::{HidOutput, Shortcut};
use crate::transport::{Header, Transport};
use crate::ui::{IconId, InputDevice, Renderer, TextRegion, TouchSample};

/// One request seen by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct Request {
    pub method: &'static str,
    pub url: String,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Transport answering from a queue of canned replies.
///
/// An empty queue answers `Timeout`, like an unreachable host.
#[derive(Default)]
pub struct MockTransport {
    replies: VecDeque<Result<String, TransportError>>,
    pub requests: Vec<Request>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&mut self, body: &str) {
        self.replies.push_back(Ok(body.to_string()));
    }

    pub fn fail(&mut self, error: TransportError) {
        self.replies.push_back(Err(error));
    }

    pub fn calls(&self) -> usize {
        self.requests.len()
    }

    fn answer<'b>(&mut self, response: &'b mut [u8]) -> Result<&'b str, TransportError> {
        let body = self.replies.pop_front().unwrap_or(Err(TransportError::Timeout))?;
        let bytes = body.as_bytes();
        if bytes.len() > response.len() {
            return Err(TransportError::ResponseTooLarge);
        }
        response[..bytes.len()].copy_from_slice(bytes);
        core::str::from_utf8(&response[..bytes.len()]).map_err(|_| TransportError::BadResponse)
    }
}

impl Transport for MockTransport {
    async fn post<'b>(
        &mut self,
        url: &str,
        body: &str,
        headers: &[Header<'_>],
        _timeout: Duration,
        response: &'b mut [u8],
    ) -> Result<&'b str, TransportError> {
        self.requests.push(Request {
            method: "POST",
            url: url.to_string(),
            body: body.to_string(),
            headers: headers
                .iter()
                .map(|h| (h.name.to_string(), h.value.to_string()))
                .collect(),
        });
        self.answer(response)
    }

    async fn get<'b>(
        &mut self,
        url: &str,
        _timeout: Duration,
        response: &'b mut [u8],
    ) -> Result<&'b str, TransportError> {
        self.requests.push(Request {
            method: "GET",
            url: url.to_string(),
            body: String::new(),
            headers: Vec::new(),
        });
        self.answer(response)
    }
}

/// SOAP envelope the router sends back, carrying one status element.
pub fn soap_response(element: &str, value: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\
         <s:Envelope xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\">\
         <s:Body><u:Response><{element}>{value}</{element}></u:Response>\
         </s:Body></s:Envelope>"
    )
}

/// Quote service JSON body.
pub fn quote_json(text: &str, author: &str) -> String {
    format!("[{{\"text\":\"{text}\",\"author\":\"{author}\"}}]")
}

/// Something the dashboard asked a collaborator to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Icon(IconId, bool),
    Text(TextRegion, String),
    Button(usize, bool),
}

/// Renderer double recording every call in order.
#[derive(Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl Recorder {
    pub fn icon_swaps(&self) -> Vec<(IconId, bool)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Icon(icon, active) => Some((*icon, *active)),
                _ => None,
            })
            .collect()
    }

    pub fn button_states(&self) -> Vec<(usize, bool)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Button(button, selected) => Some((*button, *selected)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Text(_, text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for Recorder {
    fn set_icon_image(&mut self, icon: IconId, active: bool) {
        self.events.push(Event::Icon(icon, active));
    }

    fn set_text(&mut self, region: TextRegion, text: &str) {
        self.events.push(Event::Text(region, text.to_string()));
    }

    fn set_button_state(&mut self, button: usize, selected: bool) {
        self.events.push(Event::Button(button, selected));
    }
}

/// HID double; records the key codes of each chord.
#[derive(Default)]
pub struct RecordingHid {
    pub chords: Vec<Vec<u8>>,
}

impl HidOutput for RecordingHid {
    async fn send_chord(&mut self, shortcut: &Shortcut) {
        self.chords
            .push(shortcut.keys().iter().map(|k| k.0).collect());
    }
}

/// Delay double; returns immediately and remembers what was asked.
#[derive(Default)]
pub struct NoDelay {
    pub waited_ns: Vec<u32>,
}

impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.waited_ns.push(ns);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.waited_ns.push(ms.saturating_mul(1_000_000));
    }
}

/// Touch panel replaying a script, one entry per read; `None` once empty.
#[derive(Default)]
pub struct ScriptedInput {
    script: VecDeque<Option<TouchSample>>,
    pub reads: usize,
}

impl ScriptedInput {
    pub fn press(&mut self, points: &[(i32, i32)]) {
        for &(x, y) in points {
            self.script.push_back(Some(TouchSample { x, y, pressure: 1 }));
        }
    }

    pub fn release(&mut self) {
        self.script.push_back(None);
    }
}

impl InputDevice for ScriptedInput {
    async fn read_touch(&mut self) -> Option<TouchSample> {
        self.reads += 1;
        self.script.pop_front().flatten()
    }
}
