//! touchdash - touchscreen router-status and scene-shortcut dashboard.
//!
//! The library holds the whole control loop and everything it decides:
//! router status polling, the hourly quote, touch debouncing, button hit
//! testing and the USB keyboard reports for scene shortcuts. Hardware is
//! reached through small traits ([`transport::Transport`], [`ui::Renderer`],
//! [`ui::InputDevice`], [`hid::HidOutput`]) so all of it runs on the host.
//!
//! Usage: `cargo test` (host). The embedded binary in `main.rs` needs the
//! `embedded` feature and an nRF52840 target.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible in every module.
#[macro_use]
mod fmt;

// ═══════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════

pub mod config;
pub mod dashboard;
pub mod error;
pub mod hid;
pub mod quote;
pub mod status;
pub mod transport;
pub mod ui;

#[cfg(test)]
mod testing;

pub use dashboard::{tick, DashboardState, Peripherals, TickReport};
pub use error::{Error, Fatal};

// ═══════════════════════════════════════════════════════════════════════════
// Cross-module checks
// ═══════════════════════════════════════════════════════════════════════════
