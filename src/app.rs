//! Main loop body.
//!
//! [`App::step`] runs one iteration of the loop: consume a mode switch,
//! remount the card if needed, repaint if asked to, otherwise take a sensor
//! sample. The caller owns the timing between iterations.

use crate::browser::{DirectorySource, StorageBrowser};
use crate::config::GRAPH_COLUMNS;
use crate::error::StorageError;
use crate::sensors::{Reading, SampleBuffer, SensorBank};
use crate::shared::SharedState;
use crate::ui::display::PageDisplay;
use crate::ui::mode::ModeController;
use crate::ui::{render, Mode};

/// What one iteration did, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Iteration {
    /// Active mode at the end of the iteration.
    pub mode: Mode,
    pub switched: bool,
    /// Outcome of a mount attempt made during this iteration.
    pub mounted: Option<Result<u32, StorageError>>,
    pub repainted: bool,
    pub sampled: Option<Reading>,
}

pub struct App<'s> {
    shared: &'s SharedState,
    modes: ModeController,
    browser: StorageBrowser,
    temperature: SampleBuffer<GRAPH_COLUMNS>,
    light: SampleBuffer<GRAPH_COLUMNS>,
    last_temperature: i16,
    last_light: u8,
    seen_epoch: u32,
    mount_pending: bool,
}

impl<'s> App<'s> {
    /// Pick up the mode currently published in `shared`.
    pub fn new(shared: &'s SharedState) -> Self {
        let snap = shared.snapshot();
        Self {
            shared,
            modes: ModeController::new(snap.active_mode),
            browser: StorageBrowser::new(),
            temperature: SampleBuffer::new(),
            light: SampleBuffer::new(),
            last_temperature: 0,
            last_light: 0,
            seen_epoch: snap.presence_epoch,
            mount_pending: true,
        }
    }

    pub fn mode(&self) -> Mode {
        self.modes.current()
    }

    pub fn samples(&self, mode: Mode) -> &[u8] {
        match mode {
            Mode::Light => self.light.as_slice(),
            _ => self.temperature.as_slice(),
        }
    }

    pub async fn step<D, S, B>(&mut self, display: &mut D, storage: &mut S, sensors: &mut B) -> Iteration
    where
        D: PageDisplay,
        S: DirectorySource,
        B: SensorBank,
    {
        let snap = self.shared.snapshot();
        let mut redraw = snap.redraw_requested;
        let mut scroll = snap.scroll_position;
        let mut iteration = Iteration {
            mode: self.modes.current(),
            switched: false,
            mounted: None,
            repainted: false,
            sampled: None,
        };

        if snap.mode_switch_requested {
            self.shared.clear_mode_switch();
            let mode = self.modes.advance();
            self.shared.set_mode(mode);
            self.shared.request_redraw();
            redraw = true;
            iteration.switched = true;

            if mode.is_sensor() {
                render::sensor_header(display, mode);
            } else {
                self.mount_pending = true;
            }
        }

        if snap.presence_epoch != self.seen_epoch {
            self.seen_epoch = snap.presence_epoch;
            self.mount_pending = true;
        }

        let mode = self.modes.current();
        iteration.mode = mode;

        if mode == Mode::StorageBrowser && self.mount_pending {
            self.mount_pending = false;
            // Holding the redraw flag keeps the scroll buttons off while
            // the position is rewound.
            self.shared.request_redraw();
            redraw = true;
            let result = self.browser.remount(storage, snap.storage_present);
            self.shared.publish_mount(result.ok(), snap.presence_epoch);
            scroll = 0;
            iteration.mounted = Some(result);
        }

        if redraw {
            match mode {
                Mode::Temperature => render::sensor_view(
                    display,
                    self.temperature.as_slice(),
                    Reading::Celsius(self.last_temperature),
                ),
                Mode::Light => render::sensor_view(
                    display,
                    self.light.as_slice(),
                    Reading::Percent(self.last_light),
                ),
                Mode::StorageBrowser => {
                    if self.browser.repaint(display, storage, scroll).is_err() {
                        self.shared.publish_mount(None, snap.presence_epoch);
                    }
                }
            }
            // A card-detect edge during this iteration keeps its redraw.
            if self.shared.presence_epoch() == snap.presence_epoch {
                self.shared.finish_redraw();
            }
            iteration.repainted = true;
        } else if mode.is_sensor() {
            let reading = match mode {
                Mode::Light => {
                    self.last_light = sensors.light_percent().await;
                    Reading::Percent(self.last_light)
                }
                _ => {
                    self.last_temperature = sensors.temperature_celsius().await;
                    Reading::Celsius(self.last_temperature)
                }
            };
            match mode {
                Mode::Light => self.light.push(reading.magnitude()),
                _ => self.temperature.push(reading.magnitude()),
            }
            self.shared.request_redraw();
            iteration.sampled = Some(reading);
        }

        iteration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{CardInfo, RawDirEntry};
    use crate::ui::display::FrameBuffer;
    use crate::ui::Button;
    use core::ops::ControlFlow;
    use embassy_futures::block_on;

    struct Card {
        names: &'static [&'static str],
        mounts: usize,
        fail_reads: bool,
    }

    impl DirectorySource for Card {
        fn mount(&mut self) -> Result<(), StorageError> {
            self.mounts += 1;
            Ok(())
        }

        fn card_info(&self) -> Option<CardInfo> {
            Some(CardInfo::from_capacity(2 << 30))
        }

        fn for_each_entry<F>(&mut self, mut visit: F) -> Result<(), StorageError>
        where
            F: FnMut(RawDirEntry<'_>) -> ControlFlow<()>,
        {
            if self.fail_reads {
                return Err(StorageError::ReadFailed);
            }
            for &name in self.names {
                let entry = RawDirEntry {
                    short_name: name,
                    long_name: "",
                };
                if visit(entry).is_break() {
                    break;
                }
            }
            Ok(())
        }
    }

    struct Fixed {
        celsius: i16,
        percent: u8,
    }

    impl SensorBank for Fixed {
        async fn temperature_celsius(&mut self) -> i16 {
            self.celsius
        }

        async fn light_percent(&mut self) -> u8 {
            self.percent
        }
    }

    struct Rig {
        fb: FrameBuffer,
        card: Card,
        sensors: Fixed,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                fb: FrameBuffer::new(),
                card: Card {
                    names: &["..", "A.TXT", "B.TXT"],
                    mounts: 0,
                    fail_reads: false,
                },
                sensors: Fixed {
                    celsius: 21,
                    percent: 40,
                },
            }
        }

        fn step(&mut self, app: &mut App<'_>) -> Iteration {
            block_on(app.step(&mut self.fb, &mut self.card, &mut self.sensors))
        }
    }

    #[test]
    fn first_iteration_paints_temperature_view() {
        let shared = SharedState::new();
        let mut app = App::new(&shared);
        let mut rig = Rig::new();

        let it = rig.step(&mut app);
        assert!(it.switched);
        assert!(it.repainted);
        assert_eq!(it.mode, Mode::Temperature);
        assert!(rig.fb.shows_text(0, 0, "Temperature sensor:"));
        assert_eq!(rig.card.mounts, 0);
        assert!(!shared.snapshot().redraw_requested);
    }

    #[test]
    fn idle_sensor_view_alternates_sample_and_repaint() {
        let shared = SharedState::new();
        let mut app = App::new(&shared);
        let mut rig = Rig::new();
        rig.step(&mut app);

        let it = rig.step(&mut app);
        assert_eq!(it.sampled, Some(Reading::Celsius(21)));
        assert!(!it.repainted);
        assert!(shared.snapshot().redraw_requested);
        assert_eq!(app.samples(Mode::Temperature).last(), Some(&14));

        let it = rig.step(&mut app);
        assert!(it.repainted);
        assert_eq!(it.sampled, None);
        assert!(rig.fb.shows_text(2, 100, "21C"));
    }

    #[test]
    fn entering_browser_mounts_and_shows_info() {
        let shared = SharedState::new();
        shared.on_presence_change(true);
        let mut app = App::new(&shared);
        let mut rig = Rig::new();

        rig.step(&mut app); // temperature
        shared.on_button(Button::ModeSwitch);
        rig.step(&mut app); // light
        let it = rig.step(&mut app);
        assert_eq!(it.mode, Mode::Light);
        assert_eq!(it.sampled, Some(Reading::Percent(40)));

        rig.step(&mut app);
        shared.on_button(Button::ModeSwitch);
        let it = rig.step(&mut app);
        assert_eq!(it.mode, Mode::StorageBrowser);
        assert_eq!(it.mounted, Some(Ok(2)));
        assert!(it.repainted);
        assert_eq!(rig.card.mounts, 1);
        assert!(rig.fb.shows_text(3, 0, "<B2-3 to browse>"));

        let snap = shared.snapshot();
        assert!(snap.storage_mounted);
        assert_eq!(snap.entry_count, 2);
    }

    #[test]
    fn scroll_press_repaints_listing_without_remount() {
        let shared = SharedState::new();
        shared.on_presence_change(true);
        shared.set_mode(Mode::Light);
        let mut app = App::new(&shared);
        let mut rig = Rig::new();

        let it = rig.step(&mut app);
        assert_eq!(it.mode, Mode::StorageBrowser);
        assert!(shared.on_button(Button::PageDown));

        let it = rig.step(&mut app);
        assert!(it.repainted);
        assert_eq!(it.mounted, None);
        assert!(rig.fb.shows_text(0, 0, "/A.TXT"));
        assert!(rig.fb.shows_text(1, 0, "/B.TXT"));

        // Browser idles without touching the card.
        let it = rig.step(&mut app);
        assert!(!it.repainted);
        assert_eq!(it.sampled, None);
        assert_eq!(rig.card.mounts, 1);
    }

    #[test]
    fn card_removal_while_browsing_resets_to_prompt() {
        let shared = SharedState::new();
        shared.on_presence_change(true);
        shared.set_mode(Mode::Light);
        let mut app = App::new(&shared);
        let mut rig = Rig::new();
        rig.step(&mut app);
        shared.on_button(Button::PageDown);
        rig.step(&mut app);

        shared.on_presence_change(false);
        let it = rig.step(&mut app);
        assert_eq!(it.mounted, Some(Err(StorageError::StorageAbsent)));
        assert!(rig.fb.shows_text(0, 0, "Please insert SD card"));
        let snap = shared.snapshot();
        assert_eq!(snap.scroll_position, 0);
        assert!(!snap.storage_mounted);
        assert!(!shared.on_button(Button::PageDown));
    }

    /// Card that is pulled out while its directory is being walked.
    struct EjectedMidWalk<'s> {
        shared: &'s SharedState,
        ejected: bool,
    }

    impl DirectorySource for EjectedMidWalk<'_> {
        fn mount(&mut self) -> Result<(), StorageError> {
            Ok(())
        }

        fn card_info(&self) -> Option<CardInfo> {
            None
        }

        fn for_each_entry<F>(&mut self, mut visit: F) -> Result<(), StorageError>
        where
            F: FnMut(RawDirEntry<'_>) -> ControlFlow<()>,
        {
            for name in ["A.TXT", "B.TXT", "C.TXT"] {
                if !self.ejected && name == "B.TXT" {
                    self.ejected = true;
                    self.shared.on_presence_change(false);
                }
                let entry = RawDirEntry {
                    short_name: name,
                    long_name: "",
                };
                if visit(entry).is_break() {
                    break;
                }
            }
            Ok(())
        }
    }

    #[test]
    fn removal_during_mount_is_not_overwritten() {
        let shared = SharedState::new();
        shared.on_presence_change(true);
        shared.set_mode(Mode::Light);
        let mut app = App::new(&shared);
        let mut fb = FrameBuffer::new();
        let mut card = EjectedMidWalk {
            shared: &shared,
            ejected: false,
        };
        let mut sensors = Fixed {
            celsius: 0,
            percent: 0,
        };

        let it = block_on(app.step(&mut fb, &mut card, &mut sensors));
        assert_eq!(it.mounted, Some(Ok(3)));

        let snap = shared.snapshot();
        assert!(!snap.storage_present);
        assert!(!snap.storage_mounted);
        assert_eq!(snap.entry_count, 0);
        assert!(snap.redraw_requested);
        assert!(!shared.on_button(Button::PageDown));

        // Next iteration notices the removal and shows the prompt.
        let it = block_on(app.step(&mut fb, &mut card, &mut sensors));
        assert_eq!(it.mounted, Some(Err(StorageError::StorageAbsent)));
        assert!(fb.shows_text(0, 0, "Please insert SD card"));
        assert!(!shared.snapshot().redraw_requested);
    }

    #[test]
    fn read_failure_while_browsing_unpublishes_mount() {
        let shared = SharedState::new();
        shared.on_presence_change(true);
        shared.set_mode(Mode::Light);
        let mut app = App::new(&shared);
        let mut rig = Rig::new();
        rig.step(&mut app);
        assert!(shared.snapshot().storage_mounted);

        assert!(shared.on_button(Button::PageDown));
        rig.card.fail_reads = true;
        let it = rig.step(&mut app);
        assert!(it.repainted);
        assert!(rig.fb.shows_text(3, 0, "<SD read error>"));

        let snap = shared.snapshot();
        assert!(!snap.storage_mounted);
        assert_eq!(snap.entry_count, 0);
        assert_eq!(snap.scroll_position, 0);
        assert!(!snap.redraw_requested);
        assert!(!shared.on_button(Button::PageDown));
    }

    #[test]
    fn presence_change_in_sensor_mode_defers_mount() {
        let shared = SharedState::new();
        let mut app = App::new(&shared);
        let mut rig = Rig::new();
        rig.step(&mut app);

        shared.on_presence_change(true);
        let it = rig.step(&mut app);
        assert_eq!(it.mounted, None);
        assert!(it.repainted);
        assert_eq!(rig.card.mounts, 0);
    }
}
