//! USB Device subsystem - presents a HID keyboard to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`. One HID interface (boot-protocol keyboard) carries the
//! scene chords; the device runner is spawned as its own task.

pub mod hid_device;
