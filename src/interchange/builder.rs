//! A module to build exported calendar files

use crate::error::{CalendarError, CalendarResult};
use crate::event::CalendarData;

/// Create a calendar file from a [`CalendarData`]
pub fn build_from(data: &CalendarData) -> CalendarResult<String> {
    serde_json::to_string(data)
        .map_err(|err| CalendarError::Serialization(err.to_string()))
}
