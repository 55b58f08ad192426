//! sensor-browser: sensor graphs and an SD card browser on a 128×32 OLED.
//!
//! Everything except the hardware adapters is plain `no_std` logic that
//! builds and tests on the host:
//!
//! - [`shared`]: flags and counters shared between input handlers and the
//!   main loop
//! - [`ui`]: mode state machine, debouncing, page-addressed rendering
//! - [`browser`]: root directory counting and windowing
//! - [`sensors`]: sample history and graph scaling
//! - [`app`]: one main loop iteration
//!
//! Usage: `cargo test` (host) or `cargo run --release --features embedded`
//! (target, via probe-rs).
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main].

#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod browser;
pub mod config;
pub mod error;
pub mod sensors;
pub mod shared;
pub mod ui;

#[cfg(feature = "embedded")]
pub mod board;
#[cfg(feature = "embedded")]
pub mod storage;
