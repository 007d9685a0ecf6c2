//! FT6206 capacitive touch controller over I²C.
//!
//! Register map (subset):
//! ```text
//! 0x02  TD_STATUS   number of touch points (low nibble)
//! 0x03  P1_XH       event flag (7:6), X high nibble (3:0)
//! 0x04  P1_XL       X low byte
//! 0x05  P1_YH       touch id (7:4), Y high nibble (3:0)
//! 0x06  P1_YL       Y low byte
//! 0x07  P1_WEIGHT   touch pressure
//! 0x80  TH_GROUP    touch threshold
//! 0xA8  VENDID      0x11 for FocalTech
//! ```
//! The panel reports in portrait; coordinates are rotated to the
//! landscape orientation the display runs in.

use defmt::{info, warn};
use embedded_hal_async::i2c::I2c;

use touchdash::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use touchdash::error::Error;
use touchdash::ui::{InputDevice, TouchSample};

const FT6206_ADDR: u8 = 0x38;

const REG_TD_STATUS: u8 = 0x02;
const REG_THRESHOLD: u8 = 0x80;
const REG_VENDOR_ID: u8 = 0xA8;

const FOCALTECH_VENDOR_ID: u8 = 0x11;
const TOUCH_THRESHOLD: u8 = 128;

pub struct Ft6206<I> {
    i2c: I,
}

impl<I: I2c> Ft6206<I> {
    /// Check the vendor id and set the touch threshold.
    pub async fn new(mut i2c: I) -> Result<Self, Error> {
        let mut vendor = [0u8; 1];
        i2c.write_read(FT6206_ADDR, &[REG_VENDOR_ID], &mut vendor)
            .await
            .map_err(|_| Error::Touch)?;
        if vendor[0] != FOCALTECH_VENDOR_ID {
            warn!("Unexpected touch vendor id {:#x}", vendor[0]);
            return Err(Error::Touch);
        }

        i2c.write(FT6206_ADDR, &[REG_THRESHOLD, TOUCH_THRESHOLD])
            .await
            .map_err(|_| Error::Touch)?;

        info!("FT6206 touch controller ready");
        Ok(Self { i2c })
    }
}

impl<I: I2c> InputDevice for Ft6206<I> {
    async fn read_touch(&mut self) -> Option<TouchSample> {
        let mut regs = [0u8; 6];
        if self
            .i2c
            .write_read(FT6206_ADDR, &[REG_TD_STATUS], &mut regs)
            .await
            .is_err()
        {
            warn!("Touch read failed");
            return None;
        }

        let points = regs[0] & 0x0F;
        if points == 0 || points > 2 {
            return None;
        }

        let raw_x = (i32::from(regs[1] & 0x0F) << 8) | i32::from(regs[2]);
        let raw_y = (i32::from(regs[3] & 0x0F) << 8) | i32::from(regs[4]);
        let (x, y) = to_landscape(raw_x, raw_y);

        Some(TouchSample {
            x,
            y,
            pressure: u16::from(regs[5]),
        })
    }
}

/// Portrait panel coordinates to the landscape screen.
fn to_landscape(raw_x: i32, raw_y: i32) -> (i32, i32) {
    let x = raw_y.clamp(0, i32::from(SCREEN_WIDTH) - 1);
    let y = (i32::from(SCREEN_HEIGHT) - 1 - raw_x).clamp(0, i32::from(SCREEN_HEIGHT) - 1);
    (x, y)
}
