//! SD card access over SPI with `embedded-sdmmc`.
//!
//! Only the root directory of the first FAT volume is read. Every mount
//! starts from a fresh card initialisation, so a card swapped between two
//! mounts is picked up cleanly.

use core::fmt::Write;
use core::ops::ControlFlow;

use defmt::{info, warn, Debug2Format};
use embassy_time::{block_for, Duration};
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;
use embedded_sdmmc::{RawVolume, SdCard, TimeSource, Timestamp, VolumeIdx, VolumeManager};
use heapless::String;

use crate::browser::{CardInfo, DirectorySource, RawDirEntry};
use crate::config::{CARD_READY_MAX_POLLS, CARD_READY_POLL_MS, MAX_NAME_LEN};
use crate::error::StorageError;

/// The board has no RTC; nothing is ever written, so any timestamp does.
pub struct FixedClock;

impl TimeSource for FixedClock {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 0,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

type Volumes<SPI, DELAY> = VolumeManager<SdCard<SPI, DELAY>, FixedClock>;

pub struct SdStorage<SPI, DELAY>
where
    SPI: SpiDevice<u8>,
    DELAY: DelayNs,
{
    // Only `None` while a mount is rebuilding it.
    volumes: Option<Volumes<SPI, DELAY>>,
    volume: Option<RawVolume>,
    card: Option<CardInfo>,
}

impl<SPI, DELAY> SdStorage<SPI, DELAY>
where
    SPI: SpiDevice<u8>,
    DELAY: DelayNs,
{
    pub fn new(spi: SPI, delay: DELAY) -> Self {
        Self {
            volumes: Some(VolumeManager::new(SdCard::new(spi, delay), FixedClock)),
            volume: None,
            card: None,
        }
    }
}

/// Busy-poll the card until it reports its size.
fn wait_ready<SPI, DELAY>(card: &SdCard<SPI, DELAY>) -> Result<u64, StorageError>
where
    SPI: SpiDevice<u8>,
    DELAY: DelayNs,
{
    for _ in 0..CARD_READY_MAX_POLLS {
        if let Ok(bytes) = card.num_bytes() {
            return Ok(bytes);
        }
        block_for(Duration::from_millis(CARD_READY_POLL_MS));
    }
    Err(StorageError::CardNotReady)
}

impl<SPI, DELAY> DirectorySource for SdStorage<SPI, DELAY>
where
    SPI: SpiDevice<u8>,
    DELAY: DelayNs,
{
    fn mount(&mut self) -> Result<(), StorageError> {
        self.volume = None;
        self.card = None;

        // Dropping the manager also drops any handle left from the last card.
        let volumes = self.volumes.take().ok_or(StorageError::CardNotReady)?;
        let (card, clock) = volumes.free();
        card.mark_card_uninit();
        let ready = wait_ready(&card);
        let volumes = self.volumes.insert(VolumeManager::new(card, clock));

        let bytes = ready.inspect_err(|_| warn!("SD card did not become ready"))?;
        let info = CardInfo::from_capacity(bytes);
        info!("SD card: {} KB ({})", info.capacity_kb, info.kind);
        self.card = Some(info);

        let volume = volumes.open_raw_volume(VolumeIdx(0)).map_err(|e| {
            warn!("SD volume 0: {}", Debug2Format(&e));
            StorageError::NoFilesystemFound
        })?;
        self.volume = Some(volume);
        Ok(())
    }

    fn card_info(&self) -> Option<CardInfo> {
        self.card
    }

    fn for_each_entry<F>(&mut self, mut visit: F) -> Result<(), StorageError>
    where
        F: FnMut(RawDirEntry<'_>) -> ControlFlow<()>,
    {
        let (Some(volumes), Some(volume)) = (self.volumes.as_mut(), self.volume) else {
            return Err(StorageError::NoFilesystemFound);
        };

        let dir = volumes.open_root_dir(volume).map_err(|e| {
            warn!("SD root dir: {}", Debug2Format(&e));
            StorageError::ReadFailed
        })?;

        let mut done = false;
        let walked = volumes.iterate_dir(dir, |entry| {
            if done || entry.attributes.is_volume() || entry.attributes.is_lfn() {
                return;
            }
            let mut name: String<MAX_NAME_LEN> = String::new();
            if write!(name, "{}", entry.name).is_err() {
                return;
            }
            let raw = RawDirEntry {
                short_name: &name,
                long_name: "",
            };
            done = visit(raw).is_break();
        });
        let closed = volumes.close_dir(dir);

        walked.and(closed).map_err(|e| {
            warn!("SD directory walk: {}", Debug2Format(&e));
            StorageError::ReadFailed
        })
    }
}
