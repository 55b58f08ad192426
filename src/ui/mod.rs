//! User interface subsystem - OLED display + physical buttons.
//!
//! The main loop keeps a mode state machine that reacts to button presses
//! and card-detect edges, rendering the current view on the SSD1306 OLED.
//!
//! ## Components
//!
//! - **Display**: SSD1306 128×32 OLED, page/column addressed
//! - **Buttons**: 3 tactile switches with debouncing (MODE, UP, DOWN)
//! - **Card detect**: SD socket switch, debounced like a button

pub mod debounce;
pub mod display;
pub mod graph;
pub mod input_logic;
pub mod mode;
pub mod render;

#[cfg(feature = "embedded")]
pub mod buttons;
#[cfg(feature = "embedded")]
pub mod oled;

/// Views the UI can be in, in button-1 cycle order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// Die temperature graph + readout.
    Temperature = 0,
    /// Ambient light graph + readout.
    Light = 1,
    /// SD card information and root directory listing.
    StorageBrowser = 2,
}

impl Mode {
    /// Next view in cycle order.
    pub const fn next(self) -> Self {
        match self {
            Mode::Temperature => Mode::Light,
            Mode::Light => Mode::StorageBrowser,
            Mode::StorageBrowser => Mode::Temperature,
        }
    }

    /// Decode the value stored in the shared state. Unknown values map to
    /// the browser, which is also the boot value.
    pub const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Mode::Temperature,
            1 => Mode::Light,
            _ => Mode::StorageBrowser,
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// True for the two graph views.
    pub const fn is_sensor(self) -> bool {
        matches!(self, Mode::Temperature | Mode::Light)
    }
}

/// Physical buttons (after debouncing).
///
///   - MODE: cycle Temperature → Light → Storage browser
///   - UP/DOWN: scroll the directory listing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Button 1.
    ModeSwitch,
    /// Button 2, scroll towards the first entry.
    PageUp,
    /// Button 3, scroll towards the last entry.
    PageDown,
}
