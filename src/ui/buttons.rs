//! GPIO input tasks: three buttons and the SD card-detect switch.
//!
//! All lines are active-low with the internal pull-up enabled. Each task
//! sleeps on a GPIOTE edge, then samples the line once per
//! `DEBOUNCE_TICK_MS` through a [`Debouncer`] until it settles. Only
//! settled transitions reach [`SharedState`].
//!
//! The tasks are spawned on the interrupt executor, so they preempt the
//! main loop but never each other.

use crate::config::DEBOUNCE_TICK_MS;
use crate::shared::SharedState;
use crate::ui::debounce::{Debouncer, Edge};
use crate::ui::Button;
use defmt::{debug, info};
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_time::{Duration, Timer};

/// Wait for the next settled transition of `input`.
async fn next_edge(input: &mut Input<'_>, debouncer: &mut Debouncer) -> Edge {
    loop {
        if debouncer.is_settled() && input.is_low() == debouncer.is_active() {
            input.wait_for_any_edge().await;
        }

        Timer::after(Duration::from_millis(DEBOUNCE_TICK_MS)).await;

        if let Some(edge) = debouncer.update(input.is_low()) {
            return edge;
        }
    }
}

/// One push-button. Acts on presses only.
#[embassy_executor::task(pool_size = 3)]
pub async fn button_task(pin: AnyPin, button: Button, shared: &'static SharedState) -> ! {
    let mut input = Input::new(pin, Pull::Up);
    let mut debouncer = Debouncer::new(input.is_low());

    loop {
        if next_edge(&mut input, &mut debouncer).await == Edge::Activated {
            let accepted = shared.on_button(button);
            info!("Button: {} (accepted: {})", button, accepted);
        } else {
            debug!("Button released: {}", button);
        }
    }
}

/// SD socket card-detect switch. Both edges count; the level at boot is
/// published before the first edge.
#[embassy_executor::task]
pub async fn card_detect_task(pin: AnyPin, shared: &'static SharedState) -> ! {
    let mut input = Input::new(pin, Pull::Up);
    let present = input.is_low();
    shared.on_presence_change(present);
    info!("SD card present at boot: {}", present);

    let mut debouncer = Debouncer::new(present);
    loop {
        let present = next_edge(&mut input, &mut debouncer).await == Edge::Activated;
        shared.on_presence_change(present);
        info!("SD card {}", if present { "inserted" } else { "removed" });
    }
}
