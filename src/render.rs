//! Computes what the month grid, the day view and the banner display
//!
//! Nothing here mutates events: every function borrows a snapshot of the store and can be called again at will.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::event::CalendarEvent;
use crate::overlap::{self, DayPosition};
use crate::query::{find_events, sort_events, EventQuery};
use crate::utils::ordinal_suffix;

/// A day of the month grid
#[derive(Clone, Debug, PartialEq)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    /// E.g. "1st", "22nd"
    pub label: String,
    /// Whether this is today
    pub is_current_day: bool,
    /// Events that begin on this day, sorted
    pub events: Vec<&'a CalendarEvent>,
}

impl<'a> DayCell<'a> {
    /// The day of the month, starting at 1
    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

/// The content of a month grid
#[derive(Clone, Debug, PartialEq)]
pub struct MonthView<'a> {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayCell<'a>>,
}

impl<'a> MonthView<'a> {
    /// Returns the cell of a given day of the month
    pub fn day(&self, day: u32) -> Option<&DayCell<'a>> {
        self.days.iter().find(|cell| cell.day() == day)
    }
}

/// The number of days of a month (`month` is 1-indexed), or `None` for an invalid month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(first_of_next.signed_duration_since(first).num_days() as u32)
}

/// Build the month grid of `year`/`month` (1-indexed).
///
/// Returns `None` if the month does not exist.
pub fn month_view(events: &[CalendarEvent], year: i32, month: u32, now: NaiveDateTime) -> Option<MonthView<'_>> {
    let n_days = days_in_month(year, month)?;
    let today = now.date();

    let mut days = Vec::with_capacity(n_days as usize);
    for day in 1..=n_days {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let day_events = sort_events(find_events(events, &EventQuery::day(year, month, day)));

        days.push(DayCell {
            date,
            label: format!("{}{}", day, ordinal_suffix(day)),
            is_current_day: date == today,
            events: day_events,
        });
    }

    log::debug!("Built the grid of {}-{:02} ({} days)", year, month, n_days);
    Some(MonthView { year, month, days })
}

/// An event of the day view, with its layout
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedEvent<'a> {
    pub event: &'a CalendarEvent,
    /// Starting at 1
    pub column: usize,
    /// The number of columns of the whole day view
    pub columns: usize,
    /// Horizontal offset, as a fraction of the width of the day view
    pub x: f64,
    pub position: DayPosition,
}

/// The content of the day view
#[derive(Clone, Debug, PartialEq)]
pub struct DayView<'a> {
    pub date: NaiveDate,
    /// At least 1, even when there are no events
    pub columns: usize,
    /// Sorted events, with their layout
    pub events: Vec<PositionedEvent<'a>>,
}

impl<'a> DayView<'a> {
    /// E.g. "Friday March 15 2024"
    pub fn heading(&self) -> String {
        self.date.format("%A %B %-d %Y").to_string()
    }

    /// E.g. "You have 3 events"
    pub fn summary(&self) -> String {
        match self.events.len() {
            0 => String::from("You have no events"),
            1 => String::from("You have 1 event"),
            n => format!("You have {} events", n),
        }
    }
}

/// Lay out the events that begin on `date`
pub fn day_view(events: &[CalendarEvent], date: NaiveDate) -> DayView<'_> {
    let sorted = sort_events(find_events(events, &EventQuery::date(date)));
    let columns = overlap::column_count(&sorted);
    let assigned = overlap::assign_columns(&sorted, columns);

    let events = sorted.iter()
        .copied()
        .zip(assigned)
        .map(|(event, column)| PositionedEvent {
            event,
            column,
            columns,
            x: (column - 1) as f64 / columns as f64,
            position: overlap::position_in_day(event),
        })
        .collect();

    DayView { date, columns, events }
}

/// Today's events, sorted
pub fn banner(events: &[CalendarEvent], now: NaiveDateTime) -> Vec<&CalendarEvent> {
    sort_events(find_events(events, &EventQuery::date(now.date())))
}
