//! On-screen scene buttons.
//!
//! A fixed, ordered set of rectangles each bound to one keyboard shortcut.
//! Buttons are registered once at startup; after that the registry is only
//! read. Regions are half-open, so two buttons that share an edge never both
//! contain the same pixel, and overlapping regions are refused outright.

use heapless::Vec;

use crate::config::{BUTTON_PADDING, MAX_BUTTONS};
use crate::error::LayoutError;
use crate::hid::Shortcut;

/// Axis-aligned rectangle in screen pixels, `[x, x + width) x [y, y + height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub const fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub const fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Shrink by `by` pixels on every side.
    pub const fn inset(&self, by: i32) -> Rect {
        Rect::new(
            self.x + by,
            self.y + by,
            self.width - 2 * by,
            self.height - 2 * by,
        )
    }
}

/// One touchable button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonDefinition {
    pub region: Rect,
    pub action: Shortcut,
    /// Text drawn on the button; `\n` separates lines.
    pub label: &'static str,
}

/// Ordered button set.
#[derive(Debug, Default)]
pub struct ButtonRegistry {
    buttons: Vec<ButtonDefinition, MAX_BUTTONS>,
}

impl ButtonRegistry {
    pub const fn new() -> Self {
        Self {
            buttons: Vec::new(),
        }
    }

    /// One button per scene, side by side in a row along the bottom edge.
    ///
    /// The row is `screen_height * 2 / 9` tall and split into equal cells,
    /// each inset by [`BUTTON_PADDING`].
    pub fn bottom_row(
        screen_width: u16,
        screen_height: u16,
        scenes: &[(&'static str, Shortcut)],
    ) -> Result<Self, LayoutError> {
        let mut registry = Self::new();
        if scenes.is_empty() {
            return Ok(registry);
        }
        if scenes.len() > MAX_BUTTONS {
            return Err(LayoutError::Full);
        }

        let width = i32::from(screen_width);
        let height = i32::from(screen_height);
        let cell_width = width / scenes.len() as i32;
        let row_height = height * 2 / 9;
        let row_y = height - row_height;

        for (i, &(label, action)) in scenes.iter().enumerate() {
            let cell = Rect::new(i as i32 * cell_width, row_y, cell_width, row_height);
            registry.register(ButtonDefinition {
                region: cell.inset(BUTTON_PADDING),
                action,
                label,
            })?;
        }
        Ok(registry)
    }

    /// Append a button; returns its index.
    pub fn register(&mut self, button: ButtonDefinition) -> Result<usize, LayoutError> {
        if button.region.is_empty() {
            return Err(LayoutError::Empty);
        }
        if self
            .buttons
            .iter()
            .any(|b| b.region.intersects(&button.region))
        {
            return Err(LayoutError::Overlap);
        }
        self.buttons.push(button).map_err(|_| LayoutError::Full)?;
        Ok(self.buttons.len() - 1)
    }

    /// Index of the first button containing `(x, y)`.
    pub fn hit_index(&self, x: i32, y: i32) -> Option<usize> {
        self.buttons.iter().position(|b| b.region.contains(x, y))
    }

    pub fn hit_test(&self, x: i32, y: i32) -> Option<&ButtonDefinition> {
        self.hit_index(x, y).and_then(|i| self.buttons.get(i))
    }

    pub fn get(&self, index: usize) -> Option<&ButtonDefinition> {
        self.buttons.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ButtonDefinition> {
        self.buttons.iter()
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}
