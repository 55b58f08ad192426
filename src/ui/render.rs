//! Screen layouts for each view.
//!
//! Everything here is drawn through [`PageDisplay`] cursor placement and
//! sequential writes, so the same code paints the OLED and the host-side
//! [`FrameBuffer`](super::display::FrameBuffer).

use core::fmt::Write;

use heapless::String;

use super::display::PageDisplay;
use super::graph::{draw_graph, GraphArea};
use super::Mode;
use crate::browser::CardInfo;
use crate::config::{
    DISPLAY_COLUMNS, GLYPH_WIDTH, GRAPH_BOTTOM_PAGE, GRAPH_COLUMNS, GRAPH_TOP_PAGE, READOUT_COLUMN,
    READOUT_PAGE,
};
use crate::error::StorageError;
use crate::sensors::Reading;

/// Region the sensor graphs occupy, below the header line.
pub const GRAPH_AREA: GraphArea = GraphArea {
    column: 0,
    page: GRAPH_TOP_PAGE,
    width: GRAPH_COLUMNS as u8,
    height: GRAPH_BOTTOM_PAGE,
};

/// Glyph cells available for the readout between its column and the edge.
const READOUT_CELLS: usize = (DISPLAY_COLUMNS - READOUT_COLUMN) as usize / GLYPH_WIDTH;

/// Header line of each view.
pub const fn title(mode: Mode) -> &'static str {
    match mode {
        Mode::Temperature => "Temperature sensor:",
        Mode::Light => "Light sensor:",
        Mode::StorageBrowser => "SD card information:",
    }
}

/// Write `text` at `page`/`column`, dropping whatever would run past the
/// right edge of the panel.
pub fn text_at<D: PageDisplay>(display: &mut D, page: u8, column: u8, text: &str) {
    let room = usize::from(DISPLAY_COLUMNS.saturating_sub(column)) / GLYPH_WIDTH;
    let end = text
        .char_indices()
        .nth(room)
        .map_or(text.len(), |(index, _)| index);

    display.set_page_address(page);
    display.set_column_address(column);
    display.write_text(&text[..end]);
}

/// Blank the panel and draw the header of a sensor view.
pub fn sensor_header<D: PageDisplay>(display: &mut D, mode: Mode) {
    display.clear();
    text_at(display, 0, 0, title(mode));
}

/// Repaint the graph and the numeric readout of a sensor view. The header
/// is left alone.
pub fn sensor_view<D: PageDisplay>(display: &mut D, samples: &[u8], reading: Reading) {
    draw_graph(display, GRAPH_AREA, samples);

    let mut text: String<8> = String::new();
    // A readout longer than the buffer is clipped by text_at anyway.
    let _ = write!(text, "{reading}");
    text_at(display, READOUT_PAGE, READOUT_COLUMN, &text);

    // Wipe digits left over from a longer previous reading.
    for _ in text.chars().count().min(READOUT_CELLS)..READOUT_CELLS {
        display.clear_cell();
    }
}

/// Card information screen, shown at scroll position 0 and whenever the
/// card cannot be browsed.
///
/// `status` is the outcome of the last mount: the number of visible
/// entries, or why there is nothing to browse.
pub fn storage_info<D: PageDisplay>(
    display: &mut D,
    card: Option<CardInfo>,
    status: Result<u32, StorageError>,
) {
    display.clear();

    if status == Err(StorageError::StorageAbsent) {
        text_at(display, 0, 0, StorageError::StorageAbsent.message());
        return;
    }

    text_at(display, 0, 0, title(Mode::StorageBrowser));

    if let Some(card) = card {
        let mut line: String<24> = String::new();
        let _ = write!(line, "Type: {}", card.kind.label());
        text_at(display, 1, 0, &line);

        line.clear();
        let _ = write!(line, "Size: {} KB", card.capacity_kb);
        text_at(display, 2, 0, &line);
    }

    let status_line = match status {
        Ok(0) => "<no content>",
        Ok(_) => "<B2-3 to browse>",
        Err(e) => e.message(),
    };
    text_at(display, 3, 0, status_line);
}

/// One directory listing line: the name prefixed with `/`.
pub fn file_line<D: PageDisplay>(display: &mut D, page: u8, name: &str) {
    text_at(display, page, 0, "/");
    text_at(display, page, GLYPH_WIDTH as u8, name);
}
