//! Keyboard side of the dashboard: key codes, shortcuts and the
//! boot-protocol report they are sent as.

pub mod keyboard;
pub mod keycode;


pub use keyboard::{chord_reports, KeyboardReport};
pub use keycode::{Keycode, Shortcut};

/// Host keyboard output.
///
/// Fire-and-forget: implementations log their own failures. One call must
/// produce exactly one press and one release on the host.
#[allow(async_fn_in_trait)]
pub trait HidOutput {
    async fn send_chord(&mut self, shortcut: &Shortcut);
}
