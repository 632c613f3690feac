//! Finding and ordering events
//!
//! Events are grouped by the local calendar date of their begin time. Their end time is never taken into account here.

use chrono::{Datelike, NaiveDate};

use crate::event::{CalendarEvent, EventId};
use crate::utils::comparison::compare_events_by_start;

/// Tells which events should be retrieved
///
/// * if `id` is set, it is the only criterion that is used
/// * otherwise, events are filtered by the leading part of (`year`, `month`, `day`) that is set. \
///   A `month` is ignored when there is no `year`, and a `day` is ignored when there is no (usable) `month`.
///
/// Months are 1-indexed (1 is January).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub id: Option<EventId>,
}

impl EventQuery {
    /// Every event
    pub fn all() -> Self {
        Self::default()
    }

    pub fn year(year: i32) -> Self {
        Self { year: Some(year), ..Self::default() }
    }

    pub fn month(year: i32, month: u32) -> Self {
        Self { year: Some(year), month: Some(month), ..Self::default() }
    }

    pub fn day(year: i32, month: u32, day: u32) -> Self {
        Self { year: Some(year), month: Some(month), day: Some(day), ..Self::default() }
    }

    /// Every event that begins on `date`
    pub fn date(date: NaiveDate) -> Self {
        Self::day(date.year(), date.month(), date.day())
    }

    pub fn id(id: EventId) -> Self {
        Self { id: Some(id), ..Self::default() }
    }

    /// Whether `event` is selected by this query
    pub fn matches(&self, event: &CalendarEvent) -> bool {
        if let Some(id) = &self.id {
            return event.id() == id;
        }

        let begin = event.begin();
        let year = match self.year {
            None => return true,
            Some(year) => year,
        };
        if begin.year() != year {
            return false;
        }

        let month = match self.month {
            None => return true,
            Some(month) => month,
        };
        if begin.month() != month {
            return false;
        }

        match self.day {
            None => true,
            Some(day) => begin.day() == day,
        }
    }

    fn log_ignored_filters(&self) {
        if self.id.is_some() {
            if self.year.is_some() || self.month.is_some() || self.day.is_some() {
                log::debug!("Query by id {:?}: date filters are ignored", self.id);
            }
            return;
        }
        if self.year.is_none() && (self.month.is_some() || self.day.is_some()) {
            log::debug!("Query without a year: month and day filters are ignored");
        } else if self.month.is_none() && self.day.is_some() {
            log::debug!("Query without a month: the day filter is ignored");
        }
    }
}

/// Returns the events selected by `query`, in their stored order
pub fn find_events<'a>(events: &'a [CalendarEvent], query: &EventQuery) -> Vec<&'a CalendarEvent> {
    query.log_ignored_filters();

    if let Some(id) = &query.id {
        return events.iter().find(|e| e.id() == id).into_iter().collect();
    }

    events.iter()
        .filter(|e| query.matches(e))
        .collect()
}

/// Sort events by begin time, then by priority (0 first).
///
/// The sort is stable: events with the same begin time and priority keep their relative order.
pub fn sort_events(mut events: Vec<&CalendarEvent>) -> Vec<&CalendarEvent> {
    events.sort_by(compare_events_by_start);
    events
}
