//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, screen geometry, and protocol constants live
//! here so they can be tuned in one place.

use embassy_time::Duration;

use crate::hid::keycode::{Keycode, Shortcut};

// Router status polling

/// Poll interval while the line is down or the last probe failed.
pub const FAST_POLL_PERIOD: Duration = Duration::from_secs(2);

/// Poll interval while the line is up.
pub const SLOW_POLL_PERIOD: Duration = Duration::from_secs(15);

/// Upper bound for one request/response, enforced by the transport.
pub const TRANSPORT_TIMEOUT: Duration = Duration::from_secs(2);

/// Router UPnP control port (FRITZ!Box default).
pub const ROUTER_DEFAULT_PORT: u16 = 49000;

/// Scratch space for one SOAP response body.
pub const STATUS_RESPONSE_LEN: usize = 2048;

// Quote

/// Quote refresh cadence.
pub const QUOTE_REFRESH_PERIOD: Duration = Duration::from_secs(3600);

/// Quote service endpoint (JSON: `[{"text": .., "author": ..}]`).
pub const QUOTE_URL: &str = "https://www.adafruit.com/api/quotes.php";

/// Characters per wrapped quote line.
pub const QUOTE_LINE_WIDTH: usize = 40;

/// Quotes that need more lines than this are not shown.
pub const QUOTE_MAX_LINES: usize = 4;

/// Capacity of the wrapped quote text in bytes: every line full of
/// four-byte characters plus its newline.
pub const QUOTE_TEXT_CAPACITY: usize = QUOTE_MAX_LINES * (QUOTE_LINE_WIDTH + 1) * 4;

/// Quote requests go over TLS; the handshake alone can take seconds.
pub const QUOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Scratch space for one quote response, headers included.
pub const QUOTE_RESPONSE_LEN: usize = 4096;

/// Shown until the first quote arrives.
pub const QUOTE_PLACEHOLDER: &str = "Loading Quote...";

// Screen & buttons
//
// Adafruit 2.8" TFT shield: ILI9341 (SPI) + FT6206 capacitive touch (I²C).

/// Panel width in landscape orientation (pixels).
pub const SCREEN_WIDTH: u16 = 320;

/// Panel height in landscape orientation (pixels).
pub const SCREEN_HEIGHT: u16 = 240;

/// Gap between a button cell's edge and the drawn button.
pub const BUTTON_PADDING: i32 = 8;

/// Maximum number of buttons the registry can hold.
pub const MAX_BUTTONS: usize = 6;

/// How long a pressed button stays highlighted after its chord was sent.
pub const BUTTON_HOLD_MS: u32 = 200;

/// Scene buttons, left to right. Every chord is Command+Control+Option+Shift
/// plus a digit.
pub const SCENES: [(&str, Shortcut); 3] = [
    (
        "Developer\nScene",
        Shortcut::new(&[
            Keycode::LEFT_GUI,
            Keycode::LEFT_CONTROL,
            Keycode::LEFT_ALT,
            Keycode::LEFT_SHIFT,
            Keycode::FOUR,
        ]),
    ),
    (
        "Web Developer\nScene",
        Shortcut::new(&[
            Keycode::LEFT_GUI,
            Keycode::LEFT_CONTROL,
            Keycode::LEFT_ALT,
            Keycode::LEFT_SHIFT,
            Keycode::ONE,
        ]),
    ),
    (
        "Office\nScene",
        Shortcut::new(&[
            Keycode::LEFT_GUI,
            Keycode::LEFT_CONTROL,
            Keycode::LEFT_ALT,
            Keycode::LEFT_SHIFT,
            Keycode::TWO,
        ]),
    ),
];

// Event loop

/// Pause between two loop ticks; also the touch sampling interval.
pub const TICK_INTERVAL: Duration = Duration::from_millis(20);

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "touchdash";
pub const USB_PRODUCT: &str = "Touch Dashboard Keyboard";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 10;

/// How long bring-up waits for the host to enable the keyboard endpoint.
pub const KEYBOARD_ENUM_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound for one keyboard report write.
pub const USB_WRITE_TIMEOUT: Duration = Duration::from_millis(100);

// Wi-Fi

/// One join attempt: association plus DHCP.
pub const WIFI_JOIN_TIMEOUT: Duration = Duration::from_secs(20);

/// Pause between link checks, and between join attempts while offline.
pub const WIFI_RETRY_PERIOD: Duration = Duration::from_secs(10);

/// Sockets the network stack holds: DHCP and DNS plus one HTTP request.
pub const NET_SOCKETS: usize = 3;
