//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// Title given to events that are created or imported without one.
/// Feel free to override it when initing this library.
pub static DEFAULT_EVENT_TITLE: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("Untitled Event".to_string())));

/// Name of the file [`FileStorage`](crate::storage::FileStorage) persists the calendar into, when it is given a folder.
/// Feel free to override it when initing this library.
pub static STORAGE_FILE_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("calendarData.json".to_string())));

/// Suggested file name for exported calendars.
/// Feel free to override it when initing this library.
pub static EXPORT_FILE_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("calender.json".to_string())));

/// Demo events start and end within this many milliseconds around the generation time
pub const DEMO_SPREAD_MILLIS: i64 = 5_000_000_000;

/// Returns the current value of a configuration string
pub fn read(option: &Lazy<Arc<Mutex<String>>>) -> String {
    match option.lock() {
        Ok(value) => value.clone(),
        // A poisoned lock still holds a valid String
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
