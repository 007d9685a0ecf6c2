//! Boot-protocol keyboard reports for scene chords.
//!
//! ```text
//! [0]     modifiers  LCtrl LShift LAlt LGUI RCtrl RShift RAlt RGUI (bit 0..7)
//! [1]     reserved, always 0
//! [2..8]  pressed key usages, unused slots 0
//! ```

use super::keycode::{Keycode, Shortcut};

/// Keyboard report size in bytes.
pub const KEYBOARD_REPORT_SIZE: usize = 8;

/// Number of non-modifier key slots in a boot report.
pub const KEYBOARD_ROLLOVER: usize = 6;

/// One 8-byte keyboard input report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    pub modifier: u8,
    pub reserved: u8,
    pub keycodes: [u8; KEYBOARD_ROLLOVER],
}

impl KeyboardReport {
    /// All keys released.
    pub const fn empty() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0; KEYBOARD_ROLLOVER],
        }
    }

    /// Build the report that holds every key of `shortcut` down at once.
    ///
    /// Modifier usages (0xE0..=0xE7) go into the modifier byte, everything
    /// else fills the key slots in order. Keys beyond the sixth slot are
    /// dropped, which is what a boot-protocol host would see anyway.
    pub fn pressing(shortcut: &Shortcut) -> Self {
        let mut report = Self::empty();
        let mut slot = 0;
        for key in shortcut.keys() {
            if let Some(bit) = key.modifier_bit() {
                report.modifier |= bit;
            } else if slot < KEYBOARD_ROLLOVER {
                report.keycodes[slot] = key.0;
                slot += 1;
            }
        }
        report
    }

    /// Write the wire form into `buf`; returns 0 if `buf` is too short.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < KEYBOARD_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.modifier;
        buf[1] = self.reserved;
        buf[2..8].copy_from_slice(&self.keycodes);
        KEYBOARD_REPORT_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.keycodes.iter().all(|&k| k == 0)
    }

    /// Whether `key` is held in this report.
    pub fn holds(&self, key: Keycode) -> bool {
        match key.modifier_bit() {
            Some(bit) => self.modifier & bit != 0,
            None => key.0 != 0 && self.keycodes.contains(&key.0),
        }
    }
}

/// The two reports that make up one chord: every key down, then all up.
pub fn chord_reports(shortcut: &Shortcut) -> [KeyboardReport; 2] {
    [KeyboardReport::pressing(shortcut), KeyboardReport::empty()]
}

/// Boot keyboard report descriptor (HID 1.11, appendix B.1).
///
/// Eight modifier bits, a constant byte, five LED outputs padded to a byte
/// and six key-array bytes. Hosts that only speak the boot protocol parse
/// the same layout without reading this.
pub const KEYBOARD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // USAGE_PAGE Generic Desktop
    0x09, 0x06, // USAGE Keyboard
    0xA1, 0x01, // COLLECTION Application
    0x05, 0x07, //   USAGE_PAGE Key Codes
    0x19, 0xE0, //   USAGE_MINIMUM 224
    0x29, 0xE7, //   USAGE_MAXIMUM 231
    0x15, 0x00, //   LOGICAL_MINIMUM 0
    0x25, 0x01, //   LOGICAL_MAXIMUM 1
    0x75, 0x01, //   REPORT_SIZE 1
    0x95, 0x08, //   REPORT_COUNT 8
    0x81, 0x02, //   INPUT Data,Var,Abs   ; modifier byte
    0x95, 0x01, //   REPORT_COUNT 1
    0x75, 0x08, //   REPORT_SIZE 8
    0x81, 0x01, //   INPUT Cnst           ; reserved byte
    0x05, 0x08, //   USAGE_PAGE LEDs
    0x19, 0x01, //   USAGE_MINIMUM 1
    0x29, 0x05, //   USAGE_MAXIMUM 5
    0x95, 0x05, //   REPORT_COUNT 5
    0x75, 0x01, //   REPORT_SIZE 1
    0x91, 0x02, //   OUTPUT Data,Var,Abs  ; LED report
    0x95, 0x01, //   REPORT_COUNT 1
    0x75, 0x03, //   REPORT_SIZE 3
    0x91, 0x01, //   OUTPUT Cnst          ; LED padding
    0x05, 0x07, //   USAGE_PAGE Key Codes
    0x19, 0x00, //   USAGE_MINIMUM 0
    0x29, 0xFF, //   USAGE_MAXIMUM 255
    0x15, 0x00, //   LOGICAL_MINIMUM 0
    0x26, 0xFF, 0x00, // LOGICAL_MAXIMUM 255
    0x95, 0x06, //   REPORT_COUNT 6
    0x75, 0x08, //   REPORT_SIZE 8
    0x81, 0x00, //   INPUT Data,Ary,Abs   ; key array
    0xC0,       // END_COLLECTION
];
