//! Tick-based debounce filter for the button and card-detect lines.
//!
//! The input task feeds one raw sample per tick. A new level is accepted
//! only after it has been seen for [`DEBOUNCE_TICKS`] consecutive samples;
//! any sample matching the current stable level restarts the count.

use crate::config::DEBOUNCE_TICKS;

/// A settled transition of the debounced line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Line became active (button pressed / card inserted).
    Activated,
    /// Line became inactive (button released / card removed).
    Released,
}

#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    stable: bool,
    pending: u8,
}

impl Debouncer {
    /// Start with the level the line has at boot.
    pub const fn new(initial_active: bool) -> Self {
        Self {
            stable: initial_active,
            pending: 0,
        }
    }

    /// Feed one raw sample; returns the edge once the new level has settled.
    pub fn update(&mut self, raw_active: bool) -> Option<Edge> {
        if raw_active == self.stable {
            self.pending = 0;
            return None;
        }

        self.pending = self.pending.saturating_add(1);
        if self.pending < DEBOUNCE_TICKS {
            return None;
        }

        self.stable = raw_active;
        self.pending = 0;
        Some(if raw_active {
            Edge::Activated
        } else {
            Edge::Released
        })
    }

    /// Debounced level.
    pub const fn is_active(&self) -> bool {
        self.stable
    }

    /// No transition is being timed; sampling can stop until the next edge.
    pub const fn is_settled(&self) -> bool {
        self.pending == 0
    }
}
