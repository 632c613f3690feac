//! Some utility functions

pub mod comparison;

use crate::event::CalendarEvent;
use crate::render::{DayView, MonthView};

/// The English ordinal suffix of a day of the month ("st" for 1, "nd" for 22, "th" for 11...)
pub fn ordinal_suffix(day: u32) -> &'static str {
    if day > 3 && day < 21 {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// A debug utility that pretty-prints a month grid
pub fn print_month(view: &MonthView) {
    println!("---- {}-{:02} ----", view.year, view.month);
    for cell in &view.days {
        let today = if cell.is_current_day { "*" } else { " " };
        println!("{}{}", today, cell.label);
        for event in &cell.events {
            print_event(event);
        }
    }
}

/// A debug utility that pretty-prints a day view
pub fn print_day(view: &DayView) {
    println!("---- {} ({}) ----", view.heading(), view.summary());
    for positioned in &view.events {
        println!("    [{}/{}] {:>5.1}% +{:>5.1}%  {}",
            positioned.column, positioned.columns,
            positioned.position.y * 100.0, positioned.position.height * 100.0,
            positioned.event.title());
    }
}

pub fn print_event(event: &CalendarEvent) {
    println!("    {} → {} [p{}] {}\t{}",
        event.begin().format("%H:%M"),
        event.end().format("%H:%M"),
        event.priority().value(),
        event.title(),
        event.id());
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixes() {
        let labels: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 23, 30, 31].iter()
            .map(|d| format!("{}{}", d, ordinal_suffix(*d)))
            .collect();
        assert_eq!(labels, vec!["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "23rd", "30th", "31st"]);
    }
}
