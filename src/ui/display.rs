//! Page/column addressed display abstraction.
//!
//! The SSD1306 stores 8 vertically stacked pixels per byte: one byte per
//! column per page, bit 0 at the top of the page. Everything the UI draws
//! goes through a cursor (`set_page_address` + `set_column_address`)
//! followed by sequential data bytes; the column auto-increments.
//!
//! Cursor placement is expressed as raw controller commands, so a
//! [`PageDisplay`] only has to understand [`Command`] bytes and data bytes.

use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::config::{DISPLAY_COLUMNS, DISPLAY_PAGES, GLYPH_WIDTH, PAGE_HEIGHT};

/// Page addressing mode commands the UI relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `0x00..=0x0F`: lower nibble of the column start.
    ColumnLow(u8),
    /// `0x10..=0x17`: upper bits of the column start.
    ColumnHigh(u8),
    /// `0xAE` / `0xAF`.
    DisplayOn(bool),
    /// `0xB0..=0xB7`: page start.
    PageStart(u8),
    /// Anything else, passed through untouched.
    Other(u8),
}

impl Command {
    pub const fn decode(byte: u8) -> Self {
        match byte {
            0x00..=0x0F => Command::ColumnLow(byte),
            0x10..=0x17 => Command::ColumnHigh(byte & 0x07),
            0xAE => Command::DisplayOn(false),
            0xAF => Command::DisplayOn(true),
            0xB0..=0xB7 => Command::PageStart(byte & 0x07),
            _ => Command::Other(byte),
        }
    }
}

/// Page/column write position as the controller tracks it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub page: u8,
    pub column: u8,
}

impl Cursor {
    /// Apply an addressing command. Returns false for anything else.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::ColumnLow(low) => self.column = (self.column & 0xF0) | low,
            Command::ColumnHigh(high) => self.column = (high << 4) | (self.column & 0x0F),
            Command::PageStart(page) => self.page = page,
            Command::DisplayOn(_) | Command::Other(_) => return false,
        }
        true
    }

    /// Move past `written` data bytes, wrapping within the page.
    pub fn advance(&mut self, written: usize) {
        let next = (usize::from(self.column) + written) % usize::from(DISPLAY_COLUMNS);
        self.column = next as u8;
    }
}

/// The operations the renderer needs from the display controller.
pub trait PageDisplay {
    /// Bring the controller up and blank it.
    fn init(&mut self);

    /// Blank every page.
    fn clear(&mut self);

    /// Send one raw controller command byte.
    fn write_command(&mut self, command: u8);

    fn set_page_address(&mut self, page: u8) {
        self.write_command(0xB0 | (page & 0x07));
    }

    fn set_column_address(&mut self, column: u8) {
        let column = column % DISPLAY_COLUMNS;
        self.write_command(0x10 | (column >> 4));
        self.write_command(column & 0x0F);
    }

    /// Write one column byte at the cursor and advance the column.
    fn write_data(&mut self, byte: u8);

    /// Write consecutive column bytes starting at the cursor.
    fn write_run(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_data(byte);
        }
    }

    /// Write fixed-width text at the cursor, one glyph cell per char.
    fn write_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.write_run(&rasterize_glyph(ch));
        }
    }

    /// Blank one glyph cell at the cursor.
    fn clear_cell(&mut self) {
        self.write_run(&[0u8; GLYPH_WIDTH]);
    }
}

/// One text cell collected column-wise, ready to be sent as data bytes.
struct GlyphCell {
    columns: [u8; GLYPH_WIDTH],
}

impl OriginDimensions for GlyphCell {
    fn size(&self) -> Size {
        Size::new(GLYPH_WIDTH as u32, u32::from(PAGE_HEIGHT))
    }
}

impl DrawTarget for GlyphCell {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if !color.is_on() {
                continue;
            }
            let (Ok(x), Ok(y)) = (usize::try_from(point.x), u8::try_from(point.y)) else {
                continue;
            };
            if y < PAGE_HEIGHT {
                if let Some(column) = self.columns.get_mut(x) {
                    *column |= 1 << y;
                }
            }
        }
        Ok(())
    }
}

/// Render `ch` with the 5×8 font into one page-high glyph cell.
///
/// Characters outside the font render as the font's replacement glyph.
pub fn rasterize_glyph(ch: char) -> [u8; GLYPH_WIDTH] {
    let mut cell = GlyphCell {
        columns: [0; GLYPH_WIDTH],
    };
    let mut utf8 = [0u8; 4];
    let style = MonoTextStyle::new(&FONT_5X8, BinaryColor::On);
    let _ = Text::with_baseline(ch.encode_utf8(&mut utf8), Point::zero(), style, Baseline::Top)
        .draw(&mut cell);
    cell.columns
}

const COLUMNS: usize = DISPLAY_COLUMNS as usize;
const PAGES: usize = DISPLAY_PAGES as usize;

/// In-memory 128×32 panel with SSD1306 page-addressing semantics.
///
/// Used for host tests and previews. Writes to pages beyond the panel are
/// dropped; the column wraps to 0 after the last column, like the
/// controller does in page addressing mode.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pages: [[u8; COLUMNS]; PAGES],
    cursor: Cursor,
    display_on: bool,
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            pages: [[0; COLUMNS]; PAGES],
            cursor: Cursor { page: 0, column: 0 },
            display_on: false,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn is_display_on(&self) -> bool {
        self.display_on
    }

    /// Column bytes of one page (empty for pages past the panel).
    pub fn page(&self, page: u8) -> &[u8] {
        self.pages
            .get(usize::from(page))
            .map_or(&[][..], |row| &row[..])
    }

    pub fn byte(&self, page: u8, column: u8) -> u8 {
        self.page(page)
            .get(usize::from(column))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_blank(&self) -> bool {
        self.pages.iter().flatten().all(|&b| b == 0)
    }

    pub fn is_page_blank(&self, page: u8) -> bool {
        self.page(page).iter().all(|&b| b == 0)
    }

    /// True if `text` is drawn starting at `page`/`column`.
    pub fn shows_text(&self, page: u8, column: u8, text: &str) -> bool {
        let row = self.page(page);
        let mut offset = usize::from(column);
        for ch in text.chars() {
            let glyph = rasterize_glyph(ch);
            match row.get(offset..offset + GLYPH_WIDTH) {
                Some(cells) if cells == &glyph[..] => {}
                _ => return false,
            }
            offset += GLYPH_WIDTH;
        }
        true
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageDisplay for FrameBuffer {
    fn init(&mut self) {
        self.clear();
        self.display_on = true;
    }

    fn clear(&mut self) {
        self.pages = [[0; COLUMNS]; PAGES];
        self.cursor = Cursor::default();
    }

    fn write_command(&mut self, command: u8) {
        let command = Command::decode(command);
        if let Command::DisplayOn(on) = command {
            self.display_on = on;
        } else {
            self.cursor.apply(command);
        }
    }

    fn write_data(&mut self, byte: u8) {
        if let Some(cell) = self
            .pages
            .get_mut(usize::from(self.cursor.page))
            .and_then(|row| row.get_mut(usize::from(self.cursor.column)))
        {
            *cell = byte;
        }
        self.cursor.advance(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_is_blank_and_letters_are_not() {
        assert_eq!(rasterize_glyph(' '), [0; GLYPH_WIDTH]);
        assert_ne!(rasterize_glyph('A'), [0; GLYPH_WIDTH]);
        assert_ne!(rasterize_glyph('A'), rasterize_glyph('B'));
    }

    #[test]
    fn glyph_keeps_trailing_gap_column() {
        for ch in ['A', 'M', 'W', '0', '/'] {
            assert_eq!(rasterize_glyph(ch)[GLYPH_WIDTH - 1], 0, "{ch}");
        }
    }

    #[test]
    fn write_text_advances_cursor_by_glyph_width() {
        let mut fb = FrameBuffer::new();
        fb.set_page_address(1);
        fb.set_column_address(10);
        fb.write_text("AB");
        assert!(fb.shows_text(1, 10, "AB"));
        assert!(fb.is_page_blank(0));
        // Cursor sits right after the second cell.
        fb.write_data(0xFF);
        assert_eq!(fb.byte(1, 10 + 2 * GLYPH_WIDTH as u8), 0xFF);
    }

    #[test]
    fn clear_cell_wipes_previous_glyph() {
        let mut fb = FrameBuffer::new();
        fb.set_page_address(2);
        fb.set_column_address(0);
        fb.write_text("8");
        fb.set_column_address(0);
        fb.clear_cell();
        assert!(fb.is_blank());
    }

    #[test]
    fn writes_past_last_page_are_dropped() {
        let mut fb = FrameBuffer::new();
        fb.write_command(0xB0 | DISPLAY_PAGES);
        fb.set_column_address(0);
        fb.write_data(0xFF);
        assert!(fb.is_blank());
    }

    #[test]
    fn addressing_helpers_emit_page_mode_commands() {
        let mut sent: heapless::Vec<u8, 4> = heapless::Vec::new();
        struct Recorder<'a>(&'a mut heapless::Vec<u8, 4>);
        impl PageDisplay for Recorder<'_> {
            fn init(&mut self) {}
            fn clear(&mut self) {}
            fn write_command(&mut self, command: u8) {
                self.0.push(command).unwrap();
            }
            fn write_data(&mut self, _: u8) {}
        }

        let mut recorder = Recorder(&mut sent);
        recorder.set_page_address(2);
        recorder.set_column_address(0x5A);
        assert_eq!(sent.as_slice(), &[0xB2, 0x15, 0x0A]);
    }

    #[test]
    fn raw_commands_move_the_cursor() {
        let mut fb = FrameBuffer::new();
        fb.write_command(0xB3);
        fb.write_command(0x12);
        fb.write_command(0x04);
        assert_eq!(fb.cursor(), Cursor { page: 3, column: 0x24 });

        fb.write_data(0x81);
        assert_eq!(fb.byte(3, 0x24), 0x81);
        assert_eq!(fb.cursor().column, 0x25);

        // Only the low nibble changes.
        fb.write_command(0x0F);
        assert_eq!(fb.cursor(), Cursor { page: 3, column: 0x2F });
    }

    #[test]
    fn non_addressing_commands_leave_cursor_alone() {
        let mut fb = FrameBuffer::new();
        fb.init();
        assert!(fb.is_display_on());
        fb.set_page_address(1);
        fb.set_column_address(40);

        fb.write_command(0xAE);
        fb.write_command(0x81);
        assert!(!fb.is_display_on());
        assert_eq!(fb.cursor(), Cursor { page: 1, column: 40 });
        assert_eq!(Command::decode(0x81), Command::Other(0x81));
    }

    #[test]
    fn column_wraps_within_page() {
        let mut fb = FrameBuffer::new();
        fb.set_page_address(0);
        fb.set_column_address(DISPLAY_COLUMNS - 1);
        fb.write_run(&[0x01, 0x02]);
        assert_eq!(fb.byte(0, DISPLAY_COLUMNS - 1), 0x01);
        assert_eq!(fb.byte(0, 0), 0x02);
        assert!(fb.is_page_blank(1));
    }
}
