//! Flat root-directory browser.
//!
//! Nothing is cached between calls: counting and every page turn re-walk
//! the directory from the start. Both walks go through the same visible
//! entry filter so the count always matches what paging can reach.

use core::ops::ControlFlow;

use crate::config::{BROWSER_WINDOW_LINES, HIDDEN_MARKER};
use crate::error::StorageError;
use crate::ui::display::PageDisplay;
use crate::ui::render;

/// One raw directory record as the filesystem driver reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDirEntry<'a> {
    pub short_name: &'a str,
    /// Empty when the entry has no long name.
    pub long_name: &'a str,
}

impl<'a> RawDirEntry<'a> {
    /// Long name if present, short name otherwise. Empty marks the end of
    /// the directory.
    pub fn display_name(&self) -> &'a str {
        if self.long_name.is_empty() {
            self.short_name
        } else {
            self.long_name
        }
    }
}

/// SD card generation, as printed on the info screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CardKind {
    /// Up to 2 GiB.
    Standard,
    /// Up to 32 GiB.
    HighCapacity,
    /// Anything larger.
    ExtendedCapacity,
}

impl CardKind {
    pub const fn label(self) -> &'static str {
        match self {
            CardKind::Standard => "SD",
            CardKind::HighCapacity => "SDHC",
            CardKind::ExtendedCapacity => "SDXC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CardInfo {
    pub kind: CardKind,
    pub capacity_kb: u32,
}

impl CardInfo {
    pub fn from_capacity(bytes: u64) -> Self {
        const GIB: u64 = 1024 * 1024 * 1024;
        let kind = if bytes <= 2 * GIB {
            CardKind::Standard
        } else if bytes <= 32 * GIB {
            CardKind::HighCapacity
        } else {
            CardKind::ExtendedCapacity
        };
        Self {
            kind,
            capacity_kb: u32::try_from(bytes / 1024).unwrap_or(u32::MAX),
        }
    }
}

/// The storage collaborator: a mountable volume with one flat directory.
pub trait DirectorySource {
    /// (Re)mount the volume. Must be called before walking it.
    fn mount(&mut self) -> Result<(), StorageError>;

    /// Card details learnt during the last mount attempt, if the card
    /// answered at all.
    fn card_info(&self) -> Option<CardInfo>;

    /// Walk the root directory in on-disk order until `visit` breaks or
    /// the directory ends.
    fn for_each_entry<F>(&mut self, visit: F) -> Result<(), StorageError>
    where
        F: FnMut(RawDirEntry<'_>) -> ControlFlow<()>;
}

/// Names starting with the hidden marker (including `.` and `..`) are
/// neither counted nor listed.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with(HIDDEN_MARKER)
}

/// Walk only the browsable entries, stopping at the empty-name sentinel.
fn for_each_visible<S, F>(storage: &mut S, mut visit: F) -> Result<(), StorageError>
where
    S: DirectorySource,
    F: FnMut(&str) -> ControlFlow<()>,
{
    storage.for_each_entry(|entry| {
        let name = entry.display_name();
        if name.is_empty() {
            return ControlFlow::Break(());
        }
        if is_hidden(name) {
            return ControlFlow::Continue(());
        }
        visit(name)
    })
}

/// Mount the volume and count its visible entries.
pub fn mount_and_count<S: DirectorySource>(storage: &mut S) -> Result<u32, StorageError> {
    storage.mount()?;

    let mut count: u32 = 0;
    for_each_visible(storage, |_| {
        count = count.saturating_add(1);
        ControlFlow::Continue(())
    })?;
    Ok(count)
}

/// Emit up to `window_size` visible names for scroll position `scroll`.
///
/// Position 0 and 1 both start at the first visible entry; position `n`
/// skips `n - 1` of them. `emit` gets the line index within the window.
/// Returns the number of names emitted.
pub fn visible_window<S, F>(
    storage: &mut S,
    scroll: u32,
    window_size: usize,
    mut emit: F,
) -> Result<usize, StorageError>
where
    S: DirectorySource,
    F: FnMut(usize, &str),
{
    if window_size == 0 {
        return Ok(0);
    }

    let mut skip = scroll.saturating_sub(1);
    let mut emitted = 0;
    for_each_visible(storage, |name| {
        if skip > 0 {
            skip -= 1;
            return ControlFlow::Continue(());
        }
        emit(emitted, name);
        emitted += 1;
        if emitted == window_size {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })?;
    Ok(emitted)
}

/// Mount outcome plus the card details needed to draw the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageBrowser {
    status: Result<u32, StorageError>,
    card: Option<CardInfo>,
}

impl StorageBrowser {
    pub const fn new() -> Self {
        Self {
            status: Err(StorageError::StorageAbsent),
            card: None,
        }
    }

    /// Forget the previous mount and try again. Absent media is not touched.
    pub fn remount<S: DirectorySource>(
        &mut self,
        storage: &mut S,
        present: bool,
    ) -> Result<u32, StorageError> {
        self.card = None;
        self.status = if present {
            let result = mount_and_count(storage);
            self.card = storage.card_info();
            result
        } else {
            Err(StorageError::StorageAbsent)
        };
        self.status
    }

    /// Draw the info screen (scroll 0 or no usable volume) or the listing
    /// window for `scroll`.
    ///
    /// A failed directory walk marks the volume unusable, draws the info
    /// screen with the error and returns it so the caller can unpublish
    /// the mount.
    pub fn repaint<D, S>(
        &mut self,
        display: &mut D,
        storage: &mut S,
        scroll: u32,
    ) -> Result<(), StorageError>
    where
        D: PageDisplay,
        S: DirectorySource,
    {
        if scroll == 0 || self.status.is_err() {
            render::storage_info(display, self.card, self.status);
            return Ok(());
        }

        display.clear();
        let listed = visible_window(storage, scroll, BROWSER_WINDOW_LINES, |line, name| {
            render::file_line(display, line as u8, name);
        });
        if let Err(e) = listed {
            self.status = Err(e);
            render::storage_info(display, self.card, self.status);
            return Err(e);
        }
        Ok(())
    }
}

impl Default for StorageBrowser {
    fn default() -> Self {
        Self::new()
    }
}
