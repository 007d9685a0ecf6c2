//! The dashboard control loop, one tick at a time.
//!
//! All state lives in [`DashboardState`], owned by the caller and lent to
//! [`tick`] for its duration. Collaborators are bundled in [`Peripherals`].
//! A tick never sleeps on its own: pollers and the quote refresher are
//! interval-gated on the `now` passed in, and the only wait is the short
//! button hold after a chord was sent.
//!
//! Order inside a tick is fixed:
//!
//! 1. status pollers (Linked, then Connected)
//! 2. quote refresher
//! 3. one touch read, debounced, hit-tested, dispatched

use embassy_time::Instant;
use embedded_hal_async::delay::DelayNs;
use heapless::Vec;

use crate::config::BUTTON_HOLD_MS;
use crate::error::Fatal;
use crate::hid::HidOutput;
use crate::quote::ContentRefresher;
use crate::status::{AdaptivePoller, StatusKind, StatusProbe, StatusSample, StatusValue};
use crate::transport::Transport;
use crate::ui::{
    ButtonRegistry, IconId, IconStateReducer, InputDevice, Renderer, TextRegion, TouchDebouncer,
};

/// Everything the loop remembers between ticks.
pub struct DashboardState {
    pollers: [AdaptivePoller; 2],
    probe: StatusProbe,
    refresher: ContentRefresher,
    debouncer: TouchDebouncer,
    buttons: ButtonRegistry,
    icons: IconStateReducer,
}

/// Collaborators a tick talks to.
///
/// `hid` is `None` when the host never enumerated the keyboard interface;
/// touch input is then not read at all.
pub struct Peripherals<T, R, I, H, D> {
    pub transport: T,
    pub renderer: R,
    pub input: I,
    pub hid: Option<H>,
    pub delay: D,
}

/// What one tick did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Probes that ran, in poll order.
    pub samples: Vec<StatusSample, 2>,
    /// A new quote was sent to the screen.
    pub quote_updated: bool,
    /// Index of the button whose chord was sent.
    pub pressed: Option<usize>,
}

impl DashboardState {
    pub fn new(probe: StatusProbe, refresher: ContentRefresher, buttons: ButtonRegistry) -> Self {
        Self {
            pollers: StatusKind::ALL.map(AdaptivePoller::new),
            probe,
            refresher,
            debouncer: TouchDebouncer::new(),
            buttons,
            icons: IconStateReducer::new(),
        }
    }

    /// Draw the initial screen: every icon inactive, then the Wi-Fi and
    /// keyboard icons as known at bring-up, then the current quote text.
    pub fn start<R: Renderer>(&mut self, renderer: &mut R, wifi_up: bool, keyboard: bool) {
        self.icons.init(renderer);
        self.icons.set_status(renderer, IconId::Wifi, wifi_up);
        self.icons.set_status(renderer, IconId::Keyboard, keyboard);
        renderer.set_text(TextRegion::Quote, self.refresher.displayed());
        if !keyboard {
            warn!("No keyboard found, touch input disabled");
        }
    }

    /// Follow the Wi-Fi join state; the icon only redraws when it changes.
    pub fn show_wifi<R: Renderer>(&mut self, renderer: &mut R, joined: bool) -> bool {
        let changed = self.icons.set_status(renderer, IconId::Wifi, joined);
        if changed {
            info!("Wi-Fi {}", if joined { "joined" } else { "lost" });
        }
        changed
    }

    pub fn poller(&self, kind: StatusKind) -> Option<&AdaptivePoller> {
        self.pollers.iter().find(|p| p.kind() == kind)
    }

    pub fn buttons(&self) -> &ButtonRegistry {
        &self.buttons
    }

    pub fn icons(&self) -> &IconStateReducer {
        &self.icons
    }

    /// Quote text currently on screen.
    pub fn quote(&self) -> &str {
        self.refresher.displayed()
    }
}

/// Run one iteration of the control loop.
///
/// Only [`Fatal`] conditions are returned; the caller is expected to
/// restart the device.
pub async fn tick<T, R, I, H, D>(
    state: &mut DashboardState,
    io: &mut Peripherals<T, R, I, H, D>,
    now: Instant,
) -> Result<TickReport, Fatal>
where
    T: Transport,
    R: Renderer,
    I: InputDevice,
    H: HidOutput,
    D: DelayNs,
{
    let mut report = TickReport::default();

    for poller in state.pollers.iter_mut() {
        let Some(sample) = poller.maybe_poll(&state.probe, &mut io.transport, now).await? else {
            continue;
        };
        show_status(&mut state.icons, &mut io.renderer, sample);
        // One sample per poller, capacity matches.
        let _ = report.samples.push(sample);
    }

    if let Some(text) = state.refresher.maybe_refresh(&mut io.transport, now).await? {
        io.renderer.set_text(TextRegion::Quote, text);
        report.quote_updated = true;
    }

    if let Some(hid) = io.hid.as_mut() {
        let touch = io.input.read_touch().await;
        if let Some((x, y)) = state.debouncer.feed(touch) {
            if let Some(index) = state.buttons.hit_index(x, y) {
                if let Some(button) = state.buttons.get(index) {
                    info!("Button {} pressed", index);
                    io.renderer.set_button_state(index, true);
                    hid.send_chord(&button.action).await;
                    io.delay.delay_ms(BUTTON_HOLD_MS).await;
                    io.renderer.set_button_state(index, false);
                    report.pressed = Some(index);
                }
            }
        }
    }

    Ok(report)
}

fn show_status<R: Renderer>(icons: &mut IconStateReducer, renderer: &mut R, sample: StatusSample) {
    match (sample.kind, sample.value) {
        (StatusKind::Connected, StatusValue::Up) => {
            icons.set_status(renderer, IconId::Dsl, true);
        }
        (StatusKind::Connected, StatusValue::Down) => {
            icons.set_status(renderer, IconId::Dsl, false);
        }
        (StatusKind::Connected, StatusValue::Unknown) => {}
        (StatusKind::Linked, value) => {
            info!("Is linked: {}", value);
        }
    }
}
