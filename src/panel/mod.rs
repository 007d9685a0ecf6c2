//! Adafruit 2.8" TFT shield: ILI9341 display on SPI and FT6206 capacitive
//! touch on I²C.

pub mod display;
pub mod touch;
