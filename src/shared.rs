//! Shared event state between the input handlers and the main loop.
//!
//! Every field is a single machine-word atomic. Writers per field:
//!
//! | field                   | written by                                   |
//! |-------------------------|----------------------------------------------|
//! | `active_mode`           | main loop                                    |
//! | `mode_switch_requested` | button 1 (set), main loop (clear)            |
//! | `storage_present`       | card-detect handler                          |
//! | `storage_mounted`       | main loop (mount), card-detect (reset)       |
//! | `entry_count`           | main loop (mount), card-detect (reset)       |
//! | `scroll_position`       | buttons 2/3, card-detect, main loop (mount)  |
//! | `redraw_requested`      | anyone (set), main loop (clear)              |
//! | `presence_epoch`        | card-detect handler                          |
//!
//! Handlers never preempt each other, so a handler's load-then-store is not
//! torn by another handler. The main loop only touches `scroll_position`
//! while it holds the redraw lock, which makes buttons 2/3 back off.
//! Mount results are checked against `presence_epoch` after they are
//! stored, so a card-detect reset that lands mid-mount is never lost.
//!
//! There is no event queue: each flag keeps only its latest value, so two
//! presses between two polls are observed as one.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::ui::input_logic::{scroll_down, scroll_up};
use crate::ui::{Button, Mode};

/// Process-wide flags and counters. Construct once as a `static`.
pub struct SharedState {
    active_mode: AtomicU8,
    mode_switch_requested: AtomicBool,
    storage_present: AtomicBool,
    storage_mounted: AtomicBool,
    entry_count: AtomicU32,
    scroll_position: AtomicU32,
    redraw_requested: AtomicBool,
    presence_epoch: AtomicU32,
}

/// One consistent read of every field, taken once per loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub active_mode: Mode,
    pub mode_switch_requested: bool,
    pub storage_present: bool,
    pub storage_mounted: bool,
    pub entry_count: u32,
    pub scroll_position: u32,
    pub redraw_requested: bool,
    pub presence_epoch: u32,
}

impl SharedState {
    /// Boot state: sitting on the browser with a switch pending, so the
    /// first loop iteration lands on (and paints) the temperature view.
    pub const fn new() -> Self {
        Self {
            active_mode: AtomicU8::new(Mode::StorageBrowser as u8),
            mode_switch_requested: AtomicBool::new(true),
            storage_present: AtomicBool::new(false),
            storage_mounted: AtomicBool::new(false),
            entry_count: AtomicU32::new(0),
            scroll_position: AtomicU32::new(0),
            redraw_requested: AtomicBool::new(false),
            presence_epoch: AtomicU32::new(0),
        }
    }

    // Interrupt side

    /// Debounced button press. Returns whether the press changed anything.
    pub fn on_button(&self, button: Button) -> bool {
        match button {
            Button::ModeSwitch => {
                self.mode_switch_requested.store(true, Ordering::Release);
                true
            }
            Button::PageUp => self.scroll_with(scroll_up_step),
            Button::PageDown => self.scroll_with(scroll_down),
        }
    }

    fn scroll_with(&self, step: fn(u32, u32) -> u32) -> bool {
        let mode = Mode::from_u8(self.active_mode.load(Ordering::Acquire));
        let ready = mode == Mode::StorageBrowser
            && self.storage_present.load(Ordering::Acquire)
            && self.storage_mounted.load(Ordering::Acquire)
            && !self.redraw_requested.load(Ordering::Acquire);
        if !ready {
            return false;
        }

        let position = self.scroll_position.load(Ordering::Relaxed);
        let next = step(position, self.entry_count.load(Ordering::Acquire));
        if next == position {
            return false;
        }

        self.scroll_position.store(next, Ordering::Relaxed);
        self.redraw_requested.store(true, Ordering::Release);
        true
    }

    /// Debounced card-detect transition (either direction). Unconditionally
    /// drops the browse state and asks the main loop to remount.
    pub fn on_presence_change(&self, present: bool) -> bool {
        self.storage_present.store(present, Ordering::Relaxed);
        self.scroll_position.store(0, Ordering::Relaxed);
        self.entry_count.store(0, Ordering::Relaxed);
        self.storage_mounted.store(false, Ordering::Relaxed);
        let epoch = self.presence_epoch.load(Ordering::Relaxed);
        self.presence_epoch
            .store(epoch.wrapping_add(1), Ordering::Release);
        self.redraw_requested.store(true, Ordering::Release);
        true
    }

    // Main loop side

    pub fn snapshot(&self) -> Snapshot {
        let redraw_requested = self.redraw_requested.load(Ordering::Acquire);
        Snapshot {
            active_mode: Mode::from_u8(self.active_mode.load(Ordering::Acquire)),
            mode_switch_requested: self.mode_switch_requested.load(Ordering::Acquire),
            storage_present: self.storage_present.load(Ordering::Relaxed),
            storage_mounted: self.storage_mounted.load(Ordering::Relaxed),
            entry_count: self.entry_count.load(Ordering::Relaxed),
            scroll_position: self.scroll_position.load(Ordering::Relaxed),
            redraw_requested,
            presence_epoch: self.presence_epoch.load(Ordering::Relaxed),
        }
    }

    pub fn clear_mode_switch(&self) {
        self.mode_switch_requested.store(false, Ordering::Release);
    }

    pub fn set_mode(&self, mode: Mode) {
        self.active_mode.store(mode.as_u8(), Ordering::Release);
    }

    /// Publish a mount result and rewind to the info screen. Call only
    /// after [`request_redraw`](Self::request_redraw).
    ///
    /// `epoch` is the presence epoch the mount was made against. If the
    /// card-detect line moved since, the presence reset wins: the result is
    /// dropped, the reset is re-applied and the redraw request stays up.
    /// Returns whether the result was kept.
    pub fn publish_mount(&self, entry_count: Option<u32>, epoch: u32) -> bool {
        self.scroll_position.store(0, Ordering::Relaxed);
        self.entry_count
            .store(entry_count.unwrap_or(0), Ordering::Relaxed);
        self.storage_mounted
            .store(entry_count.is_some(), Ordering::Release);

        if self.presence_epoch() == epoch {
            return true;
        }
        self.scroll_position.store(0, Ordering::Relaxed);
        self.entry_count.store(0, Ordering::Relaxed);
        self.storage_mounted.store(false, Ordering::Release);
        self.redraw_requested.store(true, Ordering::Release);
        false
    }

    pub fn presence_epoch(&self) -> u32 {
        self.presence_epoch.load(Ordering::Acquire)
    }

    pub fn request_redraw(&self) {
        self.redraw_requested.store(true, Ordering::Release);
    }

    pub fn finish_redraw(&self) {
        self.redraw_requested.store(false, Ordering::Release);
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

fn scroll_up_step(position: u32, _entry_count: u32) -> u32 {
    scroll_up(position)
}
