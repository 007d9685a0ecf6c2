//! Status icon state.
//!
//! Image swaps are slow on the TFT, so the reducer remembers what each icon
//! currently shows and only asks the renderer to redraw on a change.

use super::{IconId, Renderer};

#[derive(Debug, Default)]
pub struct IconStateReducer {
    active: [bool; IconId::COUNT],
}

impl IconStateReducer {
    pub const fn new() -> Self {
        Self {
            active: [false; IconId::COUNT],
        }
    }

    /// Draw every icon in its inactive state and reset the record to match.
    pub fn init<R: Renderer>(&mut self, renderer: &mut R) {
        for icon in IconId::ALL {
            self.active[icon.index()] = false;
            renderer.set_icon_image(icon, false);
        }
    }

    pub fn is_active(&self, icon: IconId) -> bool {
        self.active[icon.index()]
    }

    /// Record `active` for `icon`, redrawing only on change.
    ///
    /// Returns whether the icon changed.
    pub fn set_status<R: Renderer>(&mut self, renderer: &mut R, icon: IconId, active: bool) -> bool {
        let slot = &mut self.active[icon.index()];
        if *slot == active {
            return false;
        }
        *slot = active;
        info!("{} icon {}", icon, if active { "on" } else { "off" });
        renderer.set_icon_image(icon, active);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Recorder;

    #[test]
    fn init_draws_all_inactive() {
        let mut renderer = Recorder::default();
        let mut icons = IconStateReducer::new();
        icons.init(&mut renderer);

        assert_eq!(
            renderer.icon_swaps(),
            vec![
                (IconId::Dsl, false),
                (IconId::Wifi, false),
                (IconId::Keyboard, false)
            ]
        );
    }

    #[test]
    fn repeated_status_swaps_once() {
        let mut renderer = Recorder::default();
        let mut icons = IconStateReducer::new();

        assert!(icons.set_status(&mut renderer, IconId::Wifi, true));
        assert!(!icons.set_status(&mut renderer, IconId::Wifi, true));

        assert_eq!(renderer.icon_swaps(), vec![(IconId::Wifi, true)]);
        assert!(icons.is_active(IconId::Wifi));
    }

    #[test]
    fn unchanged_inactive_is_noop() {
        let mut renderer = Recorder::default();
        let mut icons = IconStateReducer::new();
        assert!(!icons.set_status(&mut renderer, IconId::Dsl, false));
        assert!(renderer.events.is_empty());
    }

    #[test]
    fn icons_are_independent() {
        let mut renderer = Recorder::default();
        let mut icons = IconStateReducer::new();
        icons.set_status(&mut renderer, IconId::Dsl, true);
        icons.set_status(&mut renderer, IconId::Keyboard, true);
        icons.set_status(&mut renderer, IconId::Dsl, false);

        assert!(!icons.is_active(IconId::Dsl));
        assert!(icons.is_active(IconId::Keyboard));
        assert!(!icons.is_active(IconId::Wifi));
        assert_eq!(renderer.icon_swaps().len(), 3);
    }

    #[test]
    fn init_resets_record() {
        let mut renderer = Recorder::default();
        let mut icons = IconStateReducer::new();
        icons.set_status(&mut renderer, IconId::Wifi, true);
        icons.init(&mut renderer);
        assert!(!icons.is_active(IconId::Wifi));
        assert!(icons.set_status(&mut renderer, IconId::Wifi, true));
    }
}
