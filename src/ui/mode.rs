//! Mode state machine driven by button 1.
//!
//! The controller itself lives in the main loop; the active mode is
//! mirrored into [`SharedState`](crate::shared::SharedState) so the input
//! handlers can guard the scroll buttons.

use super::Mode;

/// Cyclic Temperature → Light → StorageBrowser → Temperature machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeController {
    current: Mode,
}

impl ModeController {
    pub const fn new(initial: Mode) -> Self {
        Self { current: initial }
    }

    pub const fn current(&self) -> Mode {
        self.current
    }

    /// Consume one mode-switch request and return the new mode.
    pub fn advance(&mut self) -> Mode {
        self.current = self.current.next();
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_all_modes() {
        let mut modes = ModeController::new(Mode::StorageBrowser);
        assert_eq!(modes.advance(), Mode::Temperature);
        assert_eq!(modes.advance(), Mode::Light);
        assert_eq!(modes.advance(), Mode::StorageBrowser);
        assert_eq!(modes.advance(), Mode::Temperature);
        assert_eq!(modes.current(), Mode::Temperature);
    }

    #[test]
    fn mode_round_trips_through_u8() {
        for mode in [Mode::Temperature, Mode::Light, Mode::StorageBrowser] {
            assert_eq!(Mode::from_u8(mode.as_u8()), mode);
        }
        assert_eq!(Mode::from_u8(0xFF), Mode::StorageBrowser);
    }

    #[test]
    fn only_graph_views_are_sensor_modes() {
        assert!(Mode::Temperature.is_sensor());
        assert!(Mode::Light.is_sensor());
        assert!(!Mode::StorageBrowser.is_sensor());
    }
}
