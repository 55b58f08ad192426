//! SSD1306 OLED adapter.
//!
//! Runs the controller in basic (unbuffered) mode: every [`PageDisplay`]
//! write goes straight to the panel through a one-page draw window.
//! Addressing commands only move the local cursor; the next data run
//! carries its own draw window.

use defmt::{debug, warn, Debug2Format};
use ssd1306::mode::BasicMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use crate::config::{DISPLAY_COLUMNS, DISPLAY_PAGES, PAGE_HEIGHT};
use crate::ui::display::{Command, Cursor, PageDisplay};

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Panel<I2C> = Ssd1306<I2CInterface<I2C>, DisplaySize128x32, BasicMode>;

pub struct OledPanel<I2C> {
    panel: Panel<I2C>,
    cursor: Cursor,
}

impl<I2C> OledPanel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    pub fn new(i2c: I2C) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        Self {
            panel: Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0),
            cursor: Cursor::default(),
        }
    }

    /// Send a run that does not cross the right edge.
    fn send(&mut self, bytes: &[u8]) {
        let Cursor { page, column } = self.cursor;
        if page < DISPLAY_PAGES {
            let top = page * PAGE_HEIGHT;
            let result = self
                .panel
                .set_draw_area((column, top), (DISPLAY_COLUMNS, top + PAGE_HEIGHT))
                .and_then(|()| self.panel.draw(bytes));
            if let Err(e) = result {
                warn!("OLED write failed: {}", Debug2Format(&e));
            }
        }
        self.cursor.advance(bytes.len());
    }
}

impl<I2C> PageDisplay for OledPanel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn init(&mut self) {
        if let Err(e) = self.panel.init() {
            warn!("OLED init failed: {}", Debug2Format(&e));
        }
        self.clear();
    }

    fn clear(&mut self) {
        if let Err(e) = self.panel.clear() {
            warn!("OLED clear failed: {}", Debug2Format(&e));
        }
        self.cursor = Cursor::default();
    }

    fn write_command(&mut self, command: u8) {
        match Command::decode(command) {
            Command::DisplayOn(on) => {
                if let Err(e) = self.panel.set_display_on(on) {
                    warn!("OLED display on/off failed: {}", Debug2Format(&e));
                }
            }
            Command::Other(byte) => debug!("OLED command {=u8:#x} ignored", byte),
            addressing => {
                self.cursor.apply(addressing);
            }
        }
    }

    fn write_data(&mut self, byte: u8) {
        self.send(&[byte]);
    }

    fn write_run(&mut self, bytes: &[u8]) {
        let mut rest = bytes;
        while !rest.is_empty() {
            let room = usize::from(DISPLAY_COLUMNS - self.cursor.column);
            let (now, later) = rest.split_at(room.min(rest.len()));
            self.send(now);
            rest = later;
        }
    }
}
