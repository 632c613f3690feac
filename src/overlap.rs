//! Overlap detection, and the column layout of simultaneous events in a day view

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

use crate::event::CalendarEvent;

const MINUTES_PER_DAY: f64 = 1440.0;

/// Whether two events share at least one instant.
///
/// Intervals are open: an event that ends exactly when another one begins does not overlap it.
pub fn overlaps(a: &CalendarEvent, b: &CalendarEvent) -> bool {
    a.begin() < b.end() && a.end() > b.begin()
}

/// The number of columns needed to lay out `sorted` side by side.
///
/// For every event, count how many of the *following* events overlap it. The column count is one more than the highest of these counts, and never less than 1.
/// `sorted` is expected to be ordered by [`sort_events`](crate::query::sort_events).
pub fn column_count(sorted: &[&CalendarEvent]) -> usize {
    let mut highest = 0;
    for (i, event) in sorted.iter().enumerate() {
        let concurrent = sorted[i + 1..].iter()
            .filter(|later| overlaps(event, later))
            .count();
        if concurrent > highest {
            highest = concurrent;
        }
    }
    highest + 1
}

/// Assign a column (starting at 1) to each event of `sorted`.
///
/// This walks the events in order: the next event goes in the next column when it overlaps the current one (wrapping back to the first column after the last one),
/// and back in the first column otherwise.
/// This is a greedy heuristic, not an optimal packing: in some overlap patterns two overlapping events can end up in the same column.
pub fn assign_columns(sorted: &[&CalendarEvent], columns: usize) -> Vec<usize> {
    let columns = columns.max(1);
    let mut assigned = Vec::with_capacity(sorted.len());
    let mut current = 1;

    for (i, event) in sorted.iter().enumerate() {
        assigned.push(current);

        let overlaps_next = match sorted.get(i + 1) {
            Some(next) => overlaps(event, next),
            None => false,
        };
        if overlaps_next {
            current += 1;
            if current > columns {
                current = 1;
            }
        } else {
            current = 1;
        }
    }
    assigned
}

/// Where an event sits vertically in a day view, as fractions of the 1440 minutes of a day
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayPosition {
    /// Start of the event, from 0 (midnight) to 1
    pub y: f64,
    /// Displayed height. It is clamped so that the event does not go past the end of the day, and is 0 for events that end before they begin.
    pub height: f64,
    /// Duration of the event divided by a day, without any clamping (it may be negative, or go past the end of the day)
    pub raw_height: f64,
    /// Whether the event ends after the end of the day it begins on
    pub continues_next_day: bool,
}

/// Compute the vertical position of an event in the day it begins on
pub fn position_in_day(event: &CalendarEvent) -> DayPosition {
    let begin = event.begin();
    let minutes_since_midnight = begin.num_seconds_from_midnight() as f64 / 60.0;
    let duration_minutes = event.duration().num_seconds() as f64 / 60.0;

    let y = minutes_since_midnight / MINUTES_PER_DAY;
    let raw_height = duration_minutes / MINUTES_PER_DAY;
    let height = raw_height.max(0.0).min(1.0 - y);

    let midnight = NaiveDateTime::new(begin.date(), NaiveTime::from_hms_opt(0, 0, 0).unwrap(/* midnight is always valid */));
    let end_of_day = midnight + Duration::days(1);

    DayPosition {
        y,
        height,
        raw_height,
        continues_next_day: event.end() > end_of_day,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::event::{EventId, Priority};
    use crate::query::sort_events;

    fn at(h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    fn event(id: &str, begin: NaiveDateTime, end: NaiveDateTime) -> CalendarEvent {
        CalendarEvent::new_with_parameters(EventId::from(id), id.to_string(), String::new(), Priority::default(), 0.0, begin, end)
    }

    #[test]
    fn overlap_is_symmetric_and_open() {
        let a = event("a", at(9, 0), at(10, 0));
        let b = event("b", at(9, 30), at(9, 45));
        let c = event("c", at(10, 0), at(11, 0));

        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
        // Touching endpoints
        assert_eq!(overlaps(&a, &c), false);
        assert_eq!(overlaps(&c, &a), false);
    }

    #[test]
    fn overlap_with_itself() {
        let normal = event("normal", at(9, 0), at(10, 0));
        let empty = event("empty", at(9, 0), at(9, 0));
        let reversed = event("reversed", at(10, 0), at(9, 0));

        assert!(overlaps(&normal, &normal));
        assert_eq!(overlaps(&empty, &empty), false);
        assert_eq!(overlaps(&reversed, &reversed), false);
    }

    #[test]
    fn column_count_edge_cases() {
        assert_eq!(column_count(&[]), 1);

        let a = event("a", at(8, 0), at(9, 0));
        let b = event("b", at(9, 0), at(10, 0));
        let c = event("c", at(11, 0), at(12, 0));
        assert_eq!(column_count(&sort_events(vec![&a, &b, &c])), 1);
    }

    #[test]
    fn mutually_overlapping_events() {
        let events: Vec<CalendarEvent> = (0..4)
            .map(|i| event(&format!("e{}", i), at(9, i * 10), at(12, 0)))
            .collect();
        let sorted = sort_events(events.iter().collect());

        let columns = column_count(&sorted);
        assert_eq!(columns, 4);
        assert_eq!(assign_columns(&sorted, columns), vec![1, 2, 3, 4]);
    }

    #[test]
    fn greedy_walk_resets_and_wraps() {
        // a and b overlap, c is alone, d and e overlap
        let a = event("a", at(8, 0), at(9, 30));
        let b = event("b", at(9, 0), at(10, 0));
        let c = event("c", at(11, 0), at(12, 0));
        let d = event("d", at(13, 0), at(15, 0));
        let e = event("e", at(14, 0), at(16, 0));
        let sorted = sort_events(vec![&e, &d, &c, &b, &a]);

        let columns = column_count(&sorted);
        assert_eq!(columns, 2);
        assert_eq!(assign_columns(&sorted, columns), vec![1, 2, 1, 1, 2]);
    }

    #[test]
    fn greedy_walk_is_not_optimal() {
        // `long` overlaps everything, `first` and `second` do not overlap each other.
        // Only `long` has later overlapping events (2 of them), so 3 columns are computed,
        // while `second` goes back to the first column after `first`.
        let long = event("long", at(8, 0), at(18, 0));
        let first = event("first", at(9, 0), at(10, 0));
        let second = event("second", at(10, 0), at(11, 0));
        let sorted = sort_events(vec![&second, &first, &long]);

        let columns = column_count(&sorted);
        assert_eq!(columns, 3);
        assert_eq!(assign_columns(&sorted, columns), vec![1, 2, 1]);
    }

    #[test]
    fn positions() {
        let morning = position_in_day(&event("morning", at(6, 0), at(12, 0)));
        assert_eq!(morning.y, 0.25);
        assert_eq!(morning.height, 0.25);
        assert_eq!(morning.continues_next_day, false);

        let reversed = position_in_day(&event("reversed", at(12, 0), at(6, 0)));
        assert_eq!(reversed.y, 0.5);
        assert_eq!(reversed.height, 0.0);
        assert_eq!(reversed.raw_height, -0.25);

        let next_day = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap().and_hms_opt(6, 0, 0).unwrap();
        let overnight = position_in_day(&event("overnight", at(18, 0), next_day));
        assert_eq!(overnight.y, 0.75);
        assert_eq!(overnight.height, 0.25);
        assert_eq!(overnight.raw_height, 0.5);
        assert!(overnight.continues_next_day);

        let midnight = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let until_midnight = position_in_day(&event("until-midnight", at(18, 0), midnight));
        assert_eq!(until_midnight.height, 0.25);
        assert_eq!(until_midnight.continues_next_day, false);
    }
}
