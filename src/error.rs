//! Error types for touchdash.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.
//!
//! Only [`Fatal`] ever leaves the control loop. Everything else is absorbed
//! by the component that detected it and turned into a typed value
//! (`Unknown`, `None`, previous text retained).

/// Failure reported by the network transport collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// No response within the request timeout.
    Timeout,
    /// Host name could not be resolved.
    Dns,
    /// TCP connection could not be established.
    Connect,
    /// Connection broke while sending or receiving.
    Io,
    /// Non-success status, malformed reply or a body that is not UTF-8.
    BadResponse,
    /// Response head and body did not fit the caller's buffer.
    ResponseTooLarge,
    /// URL the transport cannot parse.
    Unsupported,
    /// More request headers than the transport forwards.
    RequestTooLarge,
    /// The network stack ran out of memory. Fatal.
    OutOfMemory,
}

/// Why a status probe produced no usable answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeError {
    Transport(TransportError),
    /// Response did not contain the expected status element.
    Parse,
    /// Request URL did not fit its buffer.
    Request,
}

/// Why a quote refresh was not shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QuoteError {
    Transport(TransportError),
    /// Response was not the expected JSON shape.
    Parse,
    /// Formatted quote needs more lines than the screen shows.
    Overflow,
}

/// Conditions the loop must not try to survive; the device restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fatal {
    OutOfMemory,
}

/// Button registration failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutError {
    /// Registry already holds `MAX_BUTTONS`.
    Full,
    /// New region shares pixels with an earlier one.
    Overlap,
    /// Region has zero width or height.
    Empty,
}

/// Top-level error type used by device bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// USB stack could not be configured.
    Usb,
    /// Display controller did not initialise.
    Display,
    /// Touch controller did not answer on I²C.
    Touch,
    /// Wi-Fi coprocessor failed to join the network.
    Wifi,
    /// No USB keyboard interface; touch dispatch is disabled.
    NoKeyboardDevice,
    Layout(LayoutError),
    Fatal(Fatal),
}

// Convenience conversions

impl From<TransportError> for ProbeError {
    fn from(e: TransportError) -> Self {
        ProbeError::Transport(e)
    }
}

impl From<TransportError> for QuoteError {
    fn from(e: TransportError) -> Self {
        QuoteError::Transport(e)
    }
}

impl From<LayoutError> for Error {
    fn from(e: LayoutError) -> Self {
        Error::Layout(e)
    }
}

impl From<Fatal> for Error {
    fn from(e: Fatal) -> Self {
        Error::Fatal(e)
    }
}
