//! Calendar events

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use csscolorparser::Color;
use serde::{Deserialize, Serialize};

use crate::config::{self, DEFAULT_EVENT_TITLE};


/// The opaque, unique identifier of an event
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId {
    content: String,
}

impl EventId {
    /// Generate a random EventId.
    pub fn random() -> Self {
        let random = uuid::Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl From<String> for EventId {
    fn from(content: String) -> Self {
        Self { content }
    }
}

impl From<&str> for EventId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}



/// How urgent an event is, from 0 (most urgent) to 3.
///
/// Events that start at the same time are displayed by ascending priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const HIGHEST: Priority = Priority(0);
    pub const LOWEST: Priority = Priority(3);

    /// Returns `None` if `value` is not in `0..=3`
    pub fn new(value: u8) -> Option<Self> {
        if value <= Self::LOWEST.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Parse a priority coming from a form or a foreign file.
    /// Anything that is not an integer in `0..=3` falls back to the default priority.
    pub fn parse_lenient(text: &str) -> Self {
        match text.trim().parse::<u8>().ok().and_then(Self::new) {
            Some(p) => p,
            None => {
                log::warn!("Invalid priority {:?}, using the default priority", text);
                Self::default()
            }
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("priority {} is not in 0..=3", value))
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.0
    }
}



/// A titled, timed interval of the calendar
///
/// `begin` and `end` are wall-clock times of the host's local time zone.
/// `end` is expected to be after `begin`, but this is not enforced: such events are stored and laid out as they are.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    id: EventId,
    priority: Priority,
    title: String,
    description: String,
    /// Color-wheel angle, in `[0, 360)`
    hue: f64,
    #[serde(with = "crate::interchange::timestamp")]
    begin: NaiveDateTime,
    #[serde(with = "crate::interchange::timestamp")]
    end: NaiveDateTime,
}

impl CalendarEvent {
    /// Create a brand new event.
    /// This will pick a new (random) event ID.
    pub fn new(title: String, begin: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self::new_with_parameters(EventId::random(), title, String::new(), Priority::default(), 0.0, begin, end)
    }

    /// Create an event with every field given.
    ///
    /// An empty `title` is replaced by the configured [`DEFAULT_EVENT_TITLE`], and `hue` is wrapped into `[0, 360)`
    pub fn new_with_parameters(id: EventId, title: String, description: String,
                               priority: Priority, hue: f64,
                               begin: NaiveDateTime, end: NaiveDateTime,
    ) -> Self
    {
        let title = if title.trim().is_empty() {
            config::read(&DEFAULT_EVENT_TITLE)
        } else {
            title
        };

        Self {
            id,
            priority,
            title,
            description,
            hue: normalize_hue(hue),
            begin,
            end,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    pub fn with_hue(mut self, hue: f64) -> Self {
        self.hue = normalize_hue(hue);
        self
    }

    pub fn id(&self) -> &EventId       { &self.id          }
    pub fn title(&self) -> &str        { &self.title       }
    pub fn description(&self) -> &str  { &self.description }
    pub fn priority(&self) -> Priority { self.priority     }
    pub fn hue(&self) -> f64           { self.hue          }
    pub fn begin(&self) -> NaiveDateTime { self.begin }
    pub fn end(&self) -> NaiveDateTime   { self.end   }

    /// The raw duration of this event. It is negative if `end` comes before `begin`
    pub fn duration(&self) -> Duration {
        self.end - self.begin
    }

    /// Whether this event starts on the given day
    pub fn begins_on(&self, date: NaiveDate) -> bool {
        self.begin.date() == date
    }

    /// The display color of this event
    pub fn color(&self) -> Color {
        Color::from_hsla(self.hue, 0.8, 0.6, 1.0)
    }
}

fn normalize_hue(hue: f64) -> f64 {
    if hue.is_finite() {
        hue.rem_euclid(360.0)
    } else {
        0.0
    }
}



/// The whole content of a calendar, as it is persisted and exchanged
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarData {
    pub events: Vec<CalendarEvent>,
}

impl From<Vec<CalendarEvent>> for CalendarData {
    fn from(events: Vec<CalendarEvent>) -> Self {
        Self { events }
    }
}



/// Which defaults fill the blanks of an [`EventForm`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormDefaults {
    /// New events run from today 00:00 to tomorrow 00:00
    Create,
    /// Edited events run from today 12:00 to today 13:00
    Update,
}

/// The raw values of an event form, as typed by a user.
///
/// Every field is optional. Missing or unparseable values are replaced by defaults when the form is turned into an event.
#[derive(Clone, Debug, Default)]
pub struct EventForm {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Any CSS color. Only its hue is kept.
    pub color: Option<String>,
    pub priority: Option<String>,
    /// `YYYY-MM-DD`
    pub begin_date: Option<String>,
    /// `HH:MM`
    pub begin_time: Option<String>,
    /// `YYYY-MM-DD`
    pub end_date: Option<String>,
    /// `HH:MM`
    pub end_time: Option<String>,
}

impl EventForm {
    /// Build the event described by this form
    pub fn into_event(self, id: EventId, now: NaiveDateTime, defaults: FormDefaults) -> CalendarEvent {
        let today = now.date();
        let (begin_date, begin_time, end_date, end_time) = match defaults {
            FormDefaults::Create => (today, hm(0, 0), today + Duration::days(1), hm(0, 0)),
            FormDefaults::Update => (today, hm(12, 0), today, hm(13, 0)),
        };

        let begin = NaiveDateTime::new(
            parse_field(&self.begin_date, "begin date", parse_date).unwrap_or(begin_date),
            parse_field(&self.begin_time, "begin time", parse_time).unwrap_or(begin_time),
        );
        let end = NaiveDateTime::new(
            parse_field(&self.end_date, "end date", parse_date).unwrap_or(end_date),
            parse_field(&self.end_time, "end time", parse_time).unwrap_or(end_time),
        );

        let priority = match &self.priority {
            None => Priority::default(),
            Some(text) => Priority::parse_lenient(text),
        };
        let hue = parse_field(&self.color, "color", hue_of).unwrap_or(0.0);

        CalendarEvent::new_with_parameters(
            id,
            self.title.unwrap_or_default(),
            self.description.unwrap_or_default(),
            priority,
            hue,
            begin,
            end,
        )
    }
}

fn hm(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap(/* only called with valid constant times */)
}

/// Parse an optional form field. Empty fields are `None`, invalid ones are logged and `None` as well
fn parse_field<T, F>(field: &Option<String>, name: &str, parser: F) -> Option<T>
where
    F: Fn(&str) -> Option<T>,
{
    let text = match field {
        None => return None,
        Some(text) if text.trim().is_empty() => return None,
        Some(text) => text.trim(),
    };

    let parsed = parser(text);
    if parsed.is_none() {
        log::warn!("Invalid {} {:?} in form, using the default value", name, text);
    }
    parsed
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .ok()
}

fn hue_of(text: &str) -> Option<f64> {
    let color = csscolorparser::parse(text).ok()?;
    let (hue, _saturation, _lightness, _alpha) = color.to_hsla();
    if hue.is_finite() {
        Some(hue.round())
    } else {
        // Greys have no hue
        Some(0.0)
    }
}
