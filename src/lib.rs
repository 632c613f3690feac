//! This crate provides the core of a month-grid calendar.
//!
//! Events live in an [`EventStore`](store::EventStore), which is the only way to change them. \
//! Views are derived from the store on demand: the [`query`] module finds and sorts events by date, the [`overlap`] module lays overlapping events out in columns, and the [`render`] module builds the month grid, the day view and today's banner.
//!
//! Whole calendars can be exported to and imported from JSON files (see the [`interchange`] module), persisted between runs (see the [`storage`] module), or seeded from a [`source`](source::CalendarSource).
//!
//! A [`Planner`](planner::Planner) wires all these together, and saves the calendar after every change.

pub mod error;
pub use error::CalendarError;
pub mod config;

mod event;
pub use event::{CalendarData, CalendarEvent, EventForm, EventId, FormDefaults, Priority};
pub mod store;
pub use store::EventStore;

pub mod query;
pub mod overlap;
pub mod render;

pub mod interchange;
pub mod storage;
pub mod source;

pub mod planner;
pub use planner::Planner;

pub mod utils;
