//! This module provides ways to persist a calendar between runs

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::config::{self, STORAGE_FILE_NAME};
use crate::error::{CalendarError, CalendarResult};
use crate::event::CalendarData;
use crate::interchange;

/// Something able to persist a whole calendar
pub trait Storage: Send {
    /// Returns the persisted calendar, or `None` if nothing has been persisted yet.
    ///
    /// Stored events are read as leniently as imported ones: missing or malformed fields get their defaults (`now` being the default begin time).
    fn load(&mut self, now: NaiveDateTime) -> CalendarResult<Option<CalendarData>>;
    /// Persist the calendar, replacing the previous one
    fn save(&mut self, data: &CalendarData) -> CalendarResult<()>;
}


/// A storage that keeps the calendar in a local JSON file
#[derive(Debug, Clone, PartialEq)]
pub struct FileStorage {
    backing_file: PathBuf,
}

impl FileStorage {
    /// Use the given file
    pub fn new(path: &Path) -> Self {
        Self { backing_file: PathBuf::from(path) }
    }

    /// Use the default file name (see [`STORAGE_FILE_NAME`]) inside a folder
    pub fn in_folder(folder: &Path) -> Self {
        Self::new(&folder.join(config::read(&STORAGE_FILE_NAME)))
    }

    /// Get the path to the backing file
    pub fn path(&self) -> &Path {
        &self.backing_file
    }
}

impl Storage for FileStorage {
    fn load(&mut self, now: NaiveDateTime) -> CalendarResult<Option<CalendarData>> {
        let path = &self.backing_file;
        if path.exists() == false {
            log::debug!("No calendar file at {:?} yet", path);
            return Ok(None);
        }

        let content = match std::fs::read_to_string(path) {
            Err(err) => {
                return Err(CalendarError::StorageUnavailable(format!("Unable to open file {:?}: {}", path, err)));
            },
            Ok(content) => content,
        };

        parse_stored(&content, now).map(Some)
    }

    fn save(&mut self, data: &CalendarData) -> CalendarResult<()> {
        let path = &self.backing_file;
        let file = match std::fs::File::create(path) {
            Err(err) => {
                return Err(CalendarError::StorageUnavailable(format!("Unable to save file {:?}: {}", path, err)));
            },
            Ok(f) => f,
        };

        if let Err(err) = serde_json::to_writer(file, data) {
            return Err(CalendarError::StorageUnavailable(format!("Unable to serialize: {}", err)));
        };
        log::debug!("Saved {} events to {:?}", data.events.len(), path);
        Ok(())
    }
}


/// A storage that keeps the calendar serialized in memory, the way a browser's local storage would.
///
/// It can also behave as a disabled storage, that fails on every access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStorage {
    slot: Option<String>,
    disabled: bool,
}

impl MemoryStorage {
    /// An empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// A storage that already contains a serialized calendar
    pub fn with_content(content: String) -> Self {
        Self { slot: Some(content), disabled: false }
    }

    /// A storage that fails on every access
    pub fn disabled() -> Self {
        Self { slot: None, disabled: true }
    }

    /// The serialized calendar, if any has been saved
    pub fn content(&self) -> Option<&str> {
        self.slot.as_deref()
    }
}

impl Storage for MemoryStorage {
    fn load(&mut self, now: NaiveDateTime) -> CalendarResult<Option<CalendarData>> {
        if self.disabled {
            return Err(CalendarError::StorageUnavailable("storage is disabled".to_string()));
        }

        match &self.slot {
            None => Ok(None),
            Some(content) => parse_stored(content, now).map(Some),
        }
    }

    fn save(&mut self, data: &CalendarData) -> CalendarResult<()> {
        if self.disabled {
            return Err(CalendarError::StorageUnavailable("storage is disabled".to_string()));
        }

        let content = serde_json::to_string(data)
            .map_err(|err| CalendarError::StorageUnavailable(format!("Unable to serialize: {}", err)))?;
        self.slot = Some(content);
        Ok(())
    }
}

/// Parse a stored calendar. A calendar that cannot be parsed at all makes the storage unavailable.
fn parse_stored(content: &str, now: NaiveDateTime) -> CalendarResult<CalendarData> {
    interchange::parse(content, now).map_err(|err| match err {
        CalendarError::InvalidImport(reason) => CalendarError::StorageUnavailable(format!("Invalid stored calendar: {}", reason)),
        other => other,
    })
}
