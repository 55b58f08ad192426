//! Error type for the storage side of the UI.
//!
//! We avoid `alloc` - all error variants carry no data, so the type is
//! `Copy` and can sit inside the browser state.
//! Implements `defmt::Format` for efficient on-target logging.

use core::fmt;

/// Why the storage browser has nothing to list.
///
/// None of these are fatal: each one is rendered as a status line and the
/// device keeps reacting to buttons and card-detect edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// The card-detect line reports no media.
    StorageAbsent,

    /// Media is present but never answered the readiness poll.
    CardNotReady,

    /// Media is readable but carries no recognised FAT volume.
    NoFilesystemFound,

    /// A block read failed while walking the directory.
    ReadFailed,
}

impl StorageError {
    /// Short status-line text, sized for the 21-column panel.
    pub const fn message(self) -> &'static str {
        match self {
            StorageError::StorageAbsent => "Please insert SD card",
            StorageError::CardNotReady => "<SD card not ready>",
            StorageError::NoFilesystemFound => "<No FAT FS found>",
            StorageError::ReadFailed => "<SD read error>",
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
