//! Adaptive status poller.
//!
//! Polls fast while the line is degraded so recovery shows up quickly, and
//! slowly while it is healthy to keep router load low. The gate is a plain
//! comparison against an injected `now`, so nothing here sleeps.

use embassy_time::{Duration, Instant};

use super::{StatusKind, StatusProbe, StatusSample, StatusValue};
use crate::config::{FAST_POLL_PERIOD, SLOW_POLL_PERIOD};
use crate::error::Fatal;
use crate::transport::Transport;

/// The only two poll cadences.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollPeriod {
    Fast,
    Slow,
}

impl PollPeriod {
    pub const fn duration(self) -> Duration {
        match self {
            PollPeriod::Fast => FAST_POLL_PERIOD,
            PollPeriod::Slow => SLOW_POLL_PERIOD,
        }
    }
}

/// Timing state of one monitored status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollState {
    /// When the last probe was attempted; `None` until the first one.
    pub last_check: Option<Instant>,
    pub period: PollPeriod,
}

/// Interval-gated wrapper around [`StatusProbe`] for one [`StatusKind`].
pub struct AdaptivePoller {
    kind: StatusKind,
    state: PollState,
}

impl AdaptivePoller {
    /// New poller; the first call to [`maybe_poll`](Self::maybe_poll) probes.
    pub const fn new(kind: StatusKind) -> Self {
        Self {
            kind,
            state: PollState {
                last_check: None,
                period: PollPeriod::Fast,
            },
        }
    }

    pub fn kind(&self) -> StatusKind {
        self.kind
    }

    pub fn period(&self) -> PollPeriod {
        self.state.period
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Whether a probe is allowed at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.state.last_check {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.state.period.duration(),
        }
    }

    /// Probe if the current period has elapsed since the last attempt.
    ///
    /// Returns `Ok(None)` without touching the transport when not due.
    /// Only a fatal transport condition is returned as an error.
    pub async fn maybe_poll<T: Transport>(
        &mut self,
        probe: &StatusProbe,
        transport: &mut T,
        now: Instant,
    ) -> Result<Option<StatusSample>, Fatal> {
        if !self.is_due(now) {
            return Ok(None);
        }

        // Stamp before probing so a failing router is retried at the
        // current period, not on every tick.
        self.state.last_check = Some(now);

        let value = probe.query(transport, self.kind).await?;
        self.record(value);

        Ok(Some(StatusSample {
            kind: self.kind,
            value,
        }))
    }

    fn record(&mut self, value: StatusValue) {
        let next = match value {
            StatusValue::Up => PollPeriod::Slow,
            StatusValue::Down => PollPeriod::Fast,
            StatusValue::Unknown => return,
        };

        if next != self.state.period {
            info!("{} poll period {} -> {}", self.kind, self.state.period, next);
            self.state.period = next;
        }
    }
}
