//! Application-wide constants and compile-time configuration.
//!
//! All display geometry, timing parameters, and pin assignments live
//! here so they can be tuned in one place.

// Display

/// SSD1306 panel width in pixels (= addressable columns).
pub const DISPLAY_COLUMNS: u8 = 128;

/// Number of 8-pixel pages on the 128×32 panel.
pub const DISPLAY_PAGES: u8 = 4;

/// Pixel rows per page; one data byte covers one column of a page.
pub const PAGE_HEIGHT: u8 = 8;

/// Width of one text cell: 5 px glyph + 1 px gap.
pub const GLYPH_WIDTH: usize = 6;

// Storage browser

/// Directory lines shown per screen.
pub const BROWSER_WINDOW_LINES: usize = 4;

/// Character marking an entry as hidden (also matches "." and "..").
pub const HIDDEN_MARKER: char = '.';

/// Longest directory name kept for display: an 8.3 short name.
pub const MAX_NAME_LEN: usize = 12;

// Sensor views

/// Number of samples kept per sensor; one sample per graph column.
pub const GRAPH_COLUMNS: usize = 96;

/// First (top) page of the graph area.
pub const GRAPH_TOP_PAGE: u8 = 1;

/// Last (bottom) page of the graph area, inclusive.
pub const GRAPH_BOTTOM_PAGE: u8 = 3;

/// Page of the numeric readout next to the graph.
pub const READOUT_PAGE: u8 = 2;

/// Column of the numeric readout next to the graph.
pub const READOUT_COLUMN: u8 = 100;

/// Sensor readings are mapped to `0..=GRAPH_SPAN` graph magnitude.
pub const GRAPH_SPAN: u16 = 32;

/// Temperature drawn at full graph height (°C). Zero and below is empty.
pub const TEMPERATURE_GRAPH_MAX_C: i16 = 48;

/// Full-scale raw SAADC reading (12-bit).
pub const LIGHT_ADC_FULL_SCALE: i32 = 4096;

// Input

/// Consecutive stable samples required before an edge is accepted.
pub const DEBOUNCE_TICKS: u8 = 10;

/// Period of one debounce sample (ms).
pub const DEBOUNCE_TICK_MS: u64 = 1;

// Main loop

/// Delay between main loop iterations (ms); also keeps the OLED from flickering.
pub const FRAME_DELAY_MS: u64 = 50;

/// Delay between SD card readiness polls (ms).
pub const CARD_READY_POLL_MS: u64 = 1;

/// Give up waiting for the card after this many polls.
pub const CARD_READY_MAX_POLLS: u32 = 1000;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button 1 (mode)      → P0.11
//   Button 2 (page up)   → P0.12
//   Button 3 (page down) → P0.24
//   SD card detect       → P0.03 (low = card present)
//   Light sensor (AIN0)  → P0.02
//   I²C SDA / SCL (OLED) → P0.26 / P0.27
//   SPI SCK/MISO/MOSI/CS → P0.19 / P0.21 / P0.20 / P0.22
