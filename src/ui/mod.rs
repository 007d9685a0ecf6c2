//! User interface subsystem - TFT touchscreen.
//!
//! Pure state that decides *what* the screen should show. Pixels are pushed
//! by a [`Renderer`] implementation that lives in the binary.
//!
//! ## Components
//!
//! - **Touch**: 3-sample debouncer turning raw panel samples into one press
//! - **Buttons**: scene buttons along the bottom edge, hit-tested per press
//! - **Icons**: status icons that only redraw on a real state change

pub mod buttons;
pub mod icons;
pub mod touch;

pub use buttons::{ButtonDefinition, ButtonRegistry, Rect};
pub use icons::IconStateReducer;
pub use touch::{InputDevice, TouchDebouncer, TouchSample};

/// Status icons across the top of the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IconId {
    /// Internet connection through the DSL line.
    Dsl,
    Wifi,
    /// USB keyboard interface towards the host.
    Keyboard,
}

impl IconId {
    pub const ALL: [IconId; 3] = [IconId::Dsl, IconId::Wifi, IconId::Keyboard];
    pub const COUNT: usize = Self::ALL.len();

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Text areas the renderer knows how to fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextRegion {
    Quote,
}

/// Screen output. Calls are fire-and-forget; a renderer that fails to
/// draw logs and carries on.
pub trait Renderer {
    fn set_icon_image(&mut self, icon: IconId, active: bool);

    fn set_text(&mut self, region: TextRegion, text: &str);

    /// Draw button `button` (registration index) selected or normal.
    fn set_button_state(&mut self, button: usize, selected: bool);
}
