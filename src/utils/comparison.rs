//! Utilities to compare events
//!
//! These can be used to sort results, e.g. with `sort_by`

use std::cmp::Ordering;

use crate::event::CalendarEvent;

/// Compare events chronologically: by begin time, then by priority (most urgent first)
pub fn compare_events_by_start(left: &&CalendarEvent, right: &&CalendarEvent) -> Ordering {
    left.begin().cmp(&right.begin())
        .then_with(|| left.priority().cmp(&right.priority()))
}
