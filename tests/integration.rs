//! Integration tests: the control loop driven end to end through the public
//! API with in-memory collaborators.

use std::collections::VecDeque;

use embassy_futures::block_on;
use embassy_time::{Duration, Instant};
use embedded_hal_async::delay::DelayNs;

use touchdash::config::{QUOTE_URL, SCENES};
use touchdash::error::{Fatal, TransportError};
use touchdash::hid::{chord_reports, HidOutput, Shortcut};
use touchdash::quote::ContentRefresher;
use touchdash::status::{PollPeriod, RouterEndpoint, StatusKind, StatusProbe, StatusValue};
use touchdash::transport::{Header, Transport};
use touchdash::ui::{ButtonRegistry, IconId, InputDevice, Renderer, TextRegion, TouchSample};
use touchdash::{tick, DashboardState, Peripherals, TickReport};

// ═══════════════════════════════════════════════════════════════════════════
// Collaborators
// ═══════════════════════════════════════════════════════════════════════════

/// Router that answers every SOAP call from per-status scripts and the
/// quote service from a fixed body.
#[derive(Default)]
struct FakeNetwork {
    connection: VecDeque<&'static str>,
    link: VecDeque<&'static str>,
    quote: Option<&'static str>,
    posts: usize,
    gets: usize,
}

impl FakeNetwork {
    fn respond<'b>(body: &str, response: &'b mut [u8]) -> Result<&'b str, TransportError> {
        let bytes = body.as_bytes();
        let out = response
            .get_mut(..bytes.len())
            .ok_or(TransportError::ResponseTooLarge)?;
        out.copy_from_slice(bytes);
        core::str::from_utf8(out).map_err(|_| TransportError::BadResponse)
    }
}

impl Transport for FakeNetwork {
    async fn post<'b>(
        &mut self,
        url: &str,
        _body: &str,
        headers: &[Header<'_>],
        _timeout: Duration,
        response: &'b mut [u8],
    ) -> Result<&'b str, TransportError> {
        self.posts += 1;
        assert!(headers.iter().any(|h| h.name == "soapaction"));

        let (element, next) = if url.ends_with("WANIPConn1") {
            ("NewConnectionStatus", self.connection.pop_front())
        } else {
            ("NewPhysicalLinkStatus", self.link.pop_front())
        };
        let value = next.ok_or(TransportError::Timeout)?;
        let body = format!("<s:Envelope><s:Body><{element}>{value}</{element}></s:Body></s:Envelope>");
        Self::respond(&body, response)
    }

    async fn get<'b>(
        &mut self,
        url: &str,
        _timeout: Duration,
        response: &'b mut [u8],
    ) -> Result<&'b str, TransportError> {
        self.gets += 1;
        assert_eq!(url, QUOTE_URL);
        let body = self.quote.ok_or(TransportError::Connect)?;
        Self::respond(body, response)
    }
}

#[derive(Default)]
struct Screen {
    icon_swaps: Vec<(IconId, bool)>,
    quote: String,
    button_states: Vec<(usize, bool)>,
}

impl Renderer for Screen {
    fn set_icon_image(&mut self, icon: IconId, active: bool) {
        self.icon_swaps.push((icon, active));
    }

    fn set_text(&mut self, region: TextRegion, text: &str) {
        assert_eq!(region, TextRegion::Quote);
        self.quote = text.to_string();
    }

    fn set_button_state(&mut self, button: usize, selected: bool) {
        self.button_states.push((button, selected));
    }
}

#[derive(Default)]
struct Finger {
    samples: VecDeque<Option<TouchSample>>,
    reads: usize,
}

impl Finger {
    fn tap(&mut self, x: i32, y: i32) {
        for _ in 0..3 {
            self.samples.push_back(Some(TouchSample { x, y, pressure: 30 }));
        }
        self.samples.push_back(None);
    }
}

impl InputDevice for Finger {
    async fn read_touch(&mut self) -> Option<TouchSample> {
        self.reads += 1;
        self.samples.pop_front().flatten()
    }
}

/// Host keyboard; keeps every 8-byte report it would have sent.
#[derive(Default)]
struct Host {
    reports: Vec<[u8; 8]>,
}

impl HidOutput for Host {
    async fn send_chord(&mut self, shortcut: &Shortcut) {
        for report in chord_reports(shortcut) {
            let mut buf = [0u8; 8];
            report.serialize(&mut buf);
            self.reports.push(buf);
        }
    }
}

#[derive(Default)]
struct Clockless {
    total_ms: u64,
}

impl DelayNs for Clockless {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ms += u64::from(ns) / 1_000_000;
    }
}

type Io = Peripherals<FakeNetwork, Screen, Finger, Host, Clockless>;

fn setup(keyboard: bool) -> (DashboardState, Io) {
    let state = DashboardState::new(
        StatusProbe::new(RouterEndpoint {
            host: "192.168.178.1",
            port: 49000,
        }),
        ContentRefresher::new(QUOTE_URL),
        ButtonRegistry::bottom_row(480, 320, &SCENES).expect("layout"),
    );
    let io = Peripherals {
        transport: FakeNetwork {
            quote: Some(r#"[{"text":"Simplicity is prerequisite for reliability.","author":"Edsger Dijkstra"}]"#),
            ..Default::default()
        },
        renderer: Screen::default(),
        input: Finger::default(),
        hid: keyboard.then(Host::default),
        delay: Clockless::default(),
    };
    (state, io)
}

fn step(state: &mut DashboardState, io: &mut Io, now: Instant) -> TickReport {
    block_on(tick(state, io, now)).expect("tick")
}

fn connection_period(state: &DashboardState) -> PollPeriod {
    state
        .poller(StatusKind::Connected)
        .map(|p| p.period())
        .expect("connected poller")
}

// ═══════════════════════════════════════════════════════════════════════════
// Scenarios
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn three_downs_then_up_backs_off_and_lights_dsl_once() {
    let (mut state, mut io) = setup(true);
    state.start(&mut io.renderer, true, true);
    io.renderer.icon_swaps.clear();

    io.transport.connection.extend(["Disconnected"; 3]);
    io.transport.connection.push_back("Connected");
    io.transport.link.extend(["Up"; 4]);

    let mut periods = Vec::new();
    let mut now = Instant::from_secs(0);
    for _ in 0..4 {
        let report = step(&mut state, &mut io, now);
        let connected = report
            .samples
            .iter()
            .find(|s| s.kind == StatusKind::Connected)
            .expect("connection probed");
        assert_ne!(connected.value, StatusValue::Unknown);
        periods.push(connection_period(&state));
        now = now + connection_period(&state).duration();
    }

    assert_eq!(
        periods,
        [PollPeriod::Fast, PollPeriod::Fast, PollPeriod::Fast, PollPeriod::Slow]
    );
    assert_eq!(io.renderer.icon_swaps, [(IconId::Dsl, true)]);
}

#[test]
fn polling_respects_the_gate_over_a_minute() {
    let (mut state, mut io) = setup(true);
    io.transport.connection.extend(["Connected"; 8]);
    io.transport.link.extend(["Up"; 8]);

    // One tick every 20 ms for a minute.
    for ms in (0..60_000).step_by(20) {
        step(&mut state, &mut io, Instant::from_millis(ms));
    }

    // Both statuses at 0, 15, 30 and 45 s.
    assert_eq!(io.transport.posts, 8);
    assert_eq!(io.transport.gets, 1);
}

#[test]
fn failing_router_is_retried_at_the_fast_period_only() {
    let (mut state, mut io) = setup(true);

    for ms in (0..10_000).step_by(20) {
        step(&mut state, &mut io, Instant::from_millis(ms));
    }

    // Both statuses at 0, 2, 4, 6 and 8 s.
    assert_eq!(io.transport.posts, 10);
    assert_eq!(connection_period(&state), PollPeriod::Fast);
    assert!(!state.icons().is_active(IconId::Dsl));
}

#[test]
fn tapping_a_scene_sends_its_chord_once() {
    let (mut state, mut io) = setup(true);
    io.input.tap(80, 280);

    let pressed: Vec<_> = (0..6)
        .map(|t| step(&mut state, &mut io, Instant::from_millis(t * 20)).pressed)
        .collect();

    assert_eq!(pressed, [None, None, Some(0), None, None, None]);
    let host = io.hid.as_ref().expect("keyboard");
    assert_eq!(
        host.reports,
        [
            [0x0Fu8, 0x00, 0x21, 0x00, 0x00, 0x00, 0x00, 0x00],
            [0x00u8; 8],
        ]
    );
    assert_eq!(io.renderer.button_states, [(0, true), (0, false)]);
    assert_eq!(io.delay.total_ms, 200);
}

#[test]
fn without_keyboard_touch_is_never_read() {
    let (mut state, mut io) = setup(false);
    state.start(&mut io.renderer, true, false);
    io.input.tap(80, 280);

    for t in 0..6 {
        assert_eq!(step(&mut state, &mut io, Instant::from_millis(t * 20)).pressed, None);
    }

    assert_eq!(io.input.reads, 0);
    assert!(!state.icons().is_active(IconId::Keyboard));
    assert!(io.renderer.quote.starts_with("\"Simplicity is prerequisite"));
}

#[test]
fn quote_is_wrapped_for_the_screen() {
    let (mut state, mut io) = setup(true);
    let report = step(&mut state, &mut io, Instant::from_secs(0));

    assert!(report.quote_updated);
    assert_eq!(
        io.renderer.quote,
        "\"Simplicity is prerequisite for\nreliability.\" - Edsger Dijkstra"
    );
}

#[test]
fn out_of_memory_stops_the_loop() {
    struct Exhausted;

    impl Transport for Exhausted {
        async fn post<'b>(
            &mut self,
            _url: &str,
            _body: &str,
            _headers: &[Header<'_>],
            _timeout: Duration,
            _response: &'b mut [u8],
        ) -> Result<&'b str, TransportError> {
            Err(TransportError::OutOfMemory)
        }

        async fn get<'b>(
            &mut self,
            _url: &str,
            _timeout: Duration,
            _response: &'b mut [u8],
        ) -> Result<&'b str, TransportError> {
            Err(TransportError::OutOfMemory)
        }
    }

    let (mut state, io) = setup(true);
    let mut io = Peripherals {
        transport: Exhausted,
        renderer: io.renderer,
        input: io.input,
        hid: io.hid,
        delay: io.delay,
    };

    let result = block_on(tick(&mut state, &mut io, Instant::from_secs(0)));
    assert_eq!(result, Err(Fatal::OutOfMemory));
}
