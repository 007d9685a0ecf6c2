//! Router line status: one-shot probes and the adaptive poller around them.
//!
//! ## Components
//!
//! - **Probe**: one SOAP request against the router's UPnP control URL,
//!   answer reduced to Up / Down / Unknown
//! - **Poller**: per-status interval gate that polls every 2 s while the
//!   line is degraded and every 15 s while it is healthy

pub mod poller;
pub mod probe;

pub use poller::{AdaptivePoller, PollPeriod};
pub use probe::{RouterEndpoint, StatusProbe};

/// Which router status a probe asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusKind {
    /// DSL physical link to the provider.
    Linked,
    /// WAN IP connection (internet reachable).
    Connected,
}

impl StatusKind {
    pub const ALL: [StatusKind; 2] = [StatusKind::Linked, StatusKind::Connected];
}

/// Outcome of one probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusValue {
    Up,
    Down,
    /// Probe failed transiently; says nothing about the line.
    Unknown,
}

/// One probe result, consumed in the tick that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSample {
    pub kind: StatusKind,
    pub value: StatusValue,
}
