//! Bar graph rendering on a page-addressed panel.
//!
//! Each sample becomes one column. The graph area is split into page
//! bands; a band is written as a single data byte built from a run of set
//! bits pushed to the bottom of the page, so no per-pixel addressing is
//! needed.

use super::display::PageDisplay;
use crate::config::PAGE_HEIGHT;

/// Where the graph goes. Field meanings follow the controller's cursor
/// model rather than a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GraphArea {
    /// First column drawn.
    pub column: u8,
    /// Top page band.
    pub page: u8,
    /// End column, exclusive. Samples are indexed by absolute column.
    pub width: u8,
    /// Bottom page band, inclusive.
    pub height: u8,
}

/// Magnitude above which the band at `page` is fully lit.
///
/// The bottom band (`page == height`) has threshold 8, the one above it
/// 16, and so on.
pub fn band_scale(page: u8, height: u8) -> u16 {
    (u16::from(height) + 1).saturating_sub(u16::from(page)) * u16::from(PAGE_HEIGHT)
}

/// Lit pixel rows of one band. The band switches on once the magnitude
/// strictly exceeds its threshold; a magnitude equal to the threshold
/// leaves it dark.
pub fn filled_rows(magnitude: u8, scale: u16) -> u8 {
    if u16::from(magnitude) > scale {
        PAGE_HEIGHT
    } else {
        0
    }
}

/// Column byte with the bottom `filled` rows set (bit 7 is the bottom row).
pub fn band_byte(filled: u8) -> u8 {
    let filled = filled.min(PAGE_HEIGHT);
    let run: u16 = (1u16 << filled) - 1;
    let shifted = run << (PAGE_HEIGHT - filled);
    (shifted & 0xFF) as u8
}

/// Draw `samples` as vertical bars over `area`.
///
/// Missing samples (slice shorter than `area.width`) draw as empty columns.
pub fn draw_graph<D: PageDisplay>(display: &mut D, area: GraphArea, samples: &[u8]) {
    for column in area.column..area.width {
        let magnitude = samples.get(usize::from(column)).copied().unwrap_or(0);
        for page in area.page..=area.height {
            let scale = band_scale(page, area.height);
            display.set_page_address(page);
            display.set_column_address(column);
            display.write_data(band_byte(filled_rows(magnitude, scale)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::display::FrameBuffer;

    #[test]
    fn band_byte_fills_from_bottom() {
        assert_eq!(band_byte(0), 0x00);
        assert_eq!(band_byte(1), 0x80);
        assert_eq!(band_byte(3), 0xE0);
        assert_eq!(band_byte(8), 0xFF);
        assert_eq!(band_byte(12), 0xFF);
    }

    #[test]
    fn scale_grows_towards_top_band() {
        assert_eq!(band_scale(3, 3), 8);
        assert_eq!(band_scale(2, 3), 16);
        assert_eq!(band_scale(1, 3), 24);
        assert_eq!(band_scale(1, 1), 8);
    }

    #[test]
    fn threshold_tie_leaves_band_dark() {
        let scale = band_scale(1, 1);
        assert_eq!(filled_rows(8, scale), 0);
        assert_eq!(band_byte(filled_rows(8, scale)), 0x00);
        assert_eq!(filled_rows(9, scale), 8);
        assert_eq!(band_byte(filled_rows(9, scale)), 0xFF);
    }

    #[test]
    fn filled_rows_is_monotonic_in_magnitude() {
        for page in 0..=3u8 {
            let scale = band_scale(page, 3);
            let mut previous = 0;
            for magnitude in 0..=u8::MAX {
                let rows = filled_rows(magnitude, scale);
                assert!(rows >= previous, "page {page} magnitude {magnitude}");
                assert!(rows <= PAGE_HEIGHT);
                previous = rows;
            }
        }
    }

    #[test]
    fn draw_graph_stacks_bands_per_column() {
        let mut fb = FrameBuffer::new();
        let area = GraphArea {
            column: 0,
            page: 1,
            width: 4,
            height: 3,
        };
        let samples = [0u8, 9, 17, 25];
        draw_graph(&mut fb, area, &samples);

        // Column 0: nothing lit.
        assert_eq!([fb.byte(1, 0), fb.byte(2, 0), fb.byte(3, 0)], [0, 0, 0]);
        // Column 1: bottom band only.
        assert_eq!([fb.byte(1, 1), fb.byte(2, 1), fb.byte(3, 1)], [0, 0, 0xFF]);
        // Column 2: two bands.
        assert_eq!([fb.byte(1, 2), fb.byte(2, 2), fb.byte(3, 2)], [0, 0xFF, 0xFF]);
        // Column 3: full bar.
        assert_eq!([fb.byte(1, 3), fb.byte(2, 3), fb.byte(3, 3)], [0xFF, 0xFF, 0xFF]);
        // Header page untouched, nothing past the area.
        assert!(fb.is_page_blank(0));
        assert_eq!(fb.byte(3, 4), 0);
    }

    #[test]
    fn short_sample_slice_draws_empty_columns() {
        let mut fb = FrameBuffer::new();
        fb.set_page_address(3);
        fb.set_column_address(5);
        fb.write_data(0xFF);
        let area = GraphArea {
            column: 0,
            page: 3,
            width: 8,
            height: 3,
        };
        draw_graph(&mut fb, area, &[200, 200]);
        assert_eq!(fb.byte(3, 1), 0xFF);
        assert_eq!(fb.byte(3, 5), 0x00);
    }
}
