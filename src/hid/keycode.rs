//! Key codes and keyboard shortcuts.

/// A USB HID keyboard usage code (usage page 0x07).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Keycode(pub u8);

impl Keycode {
    pub const ONE: Self = Self(0x1E);
    pub const TWO: Self = Self(0x1F);
    pub const THREE: Self = Self(0x20);
    pub const FOUR: Self = Self(0x21);

    pub const LEFT_CONTROL: Self = Self(0xE0);
    pub const LEFT_SHIFT: Self = Self(0xE1);
    /// Option on macOS.
    pub const LEFT_ALT: Self = Self(0xE2);
    /// Command on macOS.
    pub const LEFT_GUI: Self = Self(0xE3);
    pub const RIGHT_CONTROL: Self = Self(0xE4);
    pub const RIGHT_SHIFT: Self = Self(0xE5);
    pub const RIGHT_ALT: Self = Self(0xE6);
    pub const RIGHT_GUI: Self = Self(0xE7);

    /// Bit in the report's modifier byte, if this is a modifier key.
    pub const fn modifier_bit(self) -> Option<u8> {
        match self.0 {
            0xE0..=0xE7 => Some(1 << (self.0 - 0xE0)),
            _ => None,
        }
    }
}

/// An ordered set of keys sent to the host as one chord.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Shortcut {
    keys: &'static [Keycode],
}

impl Shortcut {
    pub const fn new(keys: &'static [Keycode]) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &'static [Keycode] {
        self.keys
    }
}
