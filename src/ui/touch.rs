//! Touch sampling and debouncing.
//!
//! The panel reports a burst of samples per finger-down. The first one is
//! usually taken while the finger is still settling, so a press is only
//! confirmed once three samples have arrived: the first is thrown away and
//! the other two are averaged.

use heapless::Vec;

/// Samples per confirmed press.
pub const SAMPLES_PER_PRESS: usize = 3;

/// One raw reading from the touch panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchSample {
    pub x: i32,
    pub y: i32,
    pub pressure: u16,
}

/// Touch panel, polled once per tick.
#[allow(async_fn_in_trait)]
pub trait InputDevice {
    /// Current touch, or `None` while nothing touches the panel.
    async fn read_touch(&mut self) -> Option<TouchSample>;
}

/// Buffers the samples of one press.
#[derive(Debug, Default)]
pub struct TouchDebouncer {
    buffer: Vec<TouchSample, SAMPLES_PER_PRESS>,
}

impl TouchDebouncer {
    pub const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Samples buffered for the current press.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed one tick's reading. Returns the confirmed coordinate on the
    /// third sample of a press.
    ///
    /// `None` ends the press; a partial buffer is dropped.
    pub fn feed(&mut self, sample: Option<TouchSample>) -> Option<(i32, i32)> {
        let Some(sample) = sample else {
            self.buffer.clear();
            return None;
        };

        if self.buffer.push(sample).is_err() {
            // Cannot happen while the buffer is drained at three.
            self.buffer.clear();
            return None;
        }
        if !self.buffer.is_full() {
            return None;
        }

        let a = self.buffer[1];
        let b = self.buffer[2];
        self.buffer.clear();

        let point = ((a.x + b.x) / 2, (a.y + b.y) / 2);
        debug!("Touch confirmed at ({}, {})", point.0, point.1);
        Some(point)
    }
}
