//! Error types of this crate

use thiserror::Error;

use crate::event::EventId;

/// Errors that can be reported by the store, the importer or a storage backend
#[derive(Error, Debug)]
pub enum CalendarError {
    /// An event with this id is already in the store. The store has not been modified.
    #[error("An event with id {0} already exists")]
    DuplicateId(EventId),

    /// Events need a non-empty id. The store has not been modified.
    #[error("Event ids cannot be empty")]
    EmptyId,

    /// No event has this id. The store has not been modified.
    #[error("No event with id {0}")]
    NotFound(EventId),

    /// Imported data is not valid JSON, or does not have the expected shape
    #[error("Invalid import: {0}")]
    InvalidImport(String),

    /// The persistence backend cannot be read or written.
    /// This is not fatal: callers keep working with in-memory data.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for this crate
pub type CalendarResult<T> = Result<T, CalendarError>;
