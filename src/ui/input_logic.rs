/// Move the listing one entry towards the top; 0 is the card info screen.
pub fn scroll_up(position: u32) -> u32 {
    position.saturating_sub(1)
}

/// Move the listing one entry down, stopping with the last entry on top.
pub fn scroll_down(position: u32, entry_count: u32) -> u32 {
    if position < entry_count {
        position + 1
    } else {
        position
    }
}
