//! ILI9341 TFT renderer.
//!
//! Draws the dashboard with `embedded-graphics` primitives on any RGB565
//! draw target; in the firmware that is a `mipidsi` display on SPI.
//! Drawing errors are ignored: the next state change redraws anyway.

use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_6X13_BOLD, FONT_7X13_ITALIC};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle,
};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use heapless::Vec;

use touchdash::config::{MAX_BUTTONS, SCREEN_WIDTH};
use touchdash::ui::{ButtonRegistry, IconId, Rect, Renderer, TextRegion};

const BACKGROUND: Rgb565 = Rgb565::new(2, 4, 6);
const BUTTON_FILL: Rgb565 = rgb(0x60, 0x1D, 0x83);
const BUTTON_LABEL: Rgb565 = rgb(0xD7, 0xC6, 0xE0);
const QUOTE_COLOR: Rgb565 = rgb(0xFE, 0xD7, 0x3F);
const ICON_ON: Rgb565 = rgb(0x03, 0xAD, 0x31);
const ICON_OFF: Rgb565 = rgb(0x80, 0x80, 0x80);

/// Icons sit in a row at the top left.
const ICON_ORIGIN: Point = Point::new(5, 5);
const ICON_SIZE: Size = Size::new(42, 24);
const ICON_STRIDE: i32 = 47;

/// Quote block below the icons, above the buttons.
const QUOTE_ORIGIN: Point = Point::new(10, 50);
const QUOTE_SIZE: Size = Size::new(SCREEN_WIDTH as u32 - 20, 4 * 16);
const QUOTE_FONT: &MonoFont<'static> = &FONT_7X13_ITALIC;

const fn rgb(r: u8, g: u8, b: u8) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

/// Renderer over an RGB565 draw target.
pub struct TftRenderer<D> {
    target: D,
    buttons: Vec<(Rect, &'static str), MAX_BUTTONS>,
}

impl<D> TftRenderer<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    /// Clear the screen and draw every button in its normal state.
    pub fn new(mut target: D, registry: &ButtonRegistry) -> Self {
        let _ = target.clear(BACKGROUND);

        let mut buttons = Vec::new();
        for button in registry.iter() {
            // Registry and renderer share MAX_BUTTONS.
            let _ = buttons.push((button.region, button.label));
        }

        let mut renderer = Self { target, buttons };
        for index in 0..renderer.buttons.len() {
            renderer.set_button_state(index, false);
        }
        renderer
    }

    fn icon_label(icon: IconId) -> &'static str {
        match icon {
            IconId::Dsl => "DSL",
            IconId::Wifi => "WiFi",
            IconId::Keyboard => "KBD",
        }
    }
}

impl<D> Renderer for TftRenderer<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn set_icon_image(&mut self, icon: IconId, active: bool) {
        let origin = ICON_ORIGIN + Point::new(icon.index() as i32 * ICON_STRIDE, 0);
        let area = Rectangle::new(origin, ICON_SIZE);
        let colour = if active { ICON_ON } else { ICON_OFF };

        let _ = RoundedRectangle::with_equal_corners(area, Size::new(4, 4))
            .into_styled(PrimitiveStyle::with_fill(colour))
            .draw(&mut self.target);
        let _ = Text::with_text_style(
            Self::icon_label(icon),
            area.center(),
            MonoTextStyle::new(&FONT_6X10, Rgb565::BLACK),
            TextStyleBuilder::new()
                .alignment(Alignment::Center)
                .baseline(Baseline::Middle)
                .build(),
        )
        .draw(&mut self.target);
    }

    fn set_text(&mut self, region: TextRegion, text: &str) {
        match region {
            TextRegion::Quote => {
                let _ = Rectangle::new(QUOTE_ORIGIN, QUOTE_SIZE)
                    .into_styled(PrimitiveStyle::with_fill(BACKGROUND))
                    .draw(&mut self.target);
                let _ = Text::with_baseline(
                    text,
                    QUOTE_ORIGIN,
                    MonoTextStyle::new(QUOTE_FONT, QUOTE_COLOR),
                    Baseline::Top,
                )
                .draw(&mut self.target);
            }
        }
    }

    fn set_button_state(&mut self, button: usize, selected: bool) {
        let Some(&(region, label)) = self.buttons.get(button) else {
            return;
        };
        let (fill, ink) = if selected {
            (BUTTON_LABEL, BUTTON_FILL)
        } else {
            (BUTTON_FILL, BUTTON_LABEL)
        };
        let area = Rectangle::new(
            Point::new(region.x, region.y),
            Size::new(region.width as u32, region.height as u32),
        );

        let _ = RoundedRectangle::with_equal_corners(area, Size::new(8, 8))
            .into_styled(
                PrimitiveStyleBuilder::new()
                    .fill_color(fill)
                    .stroke_color(BUTTON_LABEL)
                    .stroke_width(1)
                    .build(),
            )
            .draw(&mut self.target);
        // Labels are two lines; lift the first by half a line to centre both.
        let _ = Text::with_text_style(
            label,
            area.center() - Point::new(0, 6),
            MonoTextStyle::new(&FONT_6X13_BOLD, ink),
            TextStyleBuilder::new()
                .alignment(Alignment::Center)
                .baseline(Baseline::Middle)
                .build(),
        )
        .draw(&mut self.target);
    }
}
