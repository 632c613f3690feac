//! Sources a calendar can be seeded from: a generated demo calendar, or a calendar file

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::DEMO_SPREAD_MILLIS;
use crate::error::{CalendarError, CalendarResult};
use crate::event::{CalendarData, CalendarEvent, EventId, Priority};
use crate::interchange;

/// Something that provides a whole calendar, possibly after some I/O
#[async_trait]
pub trait CalendarSource {
    /// Returns the calendar of this source.
    /// This may be a long process (e.g. reading a file), and it can fail.
    async fn fetch(&self) -> CalendarResult<CalendarData>;
}


/// A generator of random events, useful to try the calendar out
#[derive(Clone, Debug)]
pub struct DemoCalendar {
    amount: usize,
    around: NaiveDateTime,
}

impl DemoCalendar {
    /// Generate `amount` events, that begin and end (independently) within about two months around `around`
    pub fn new(amount: usize, around: NaiveDateTime) -> Self {
        Self { amount, around }
    }

    /// Generate the events right away
    pub fn generate(&self) -> CalendarData {
        let mut rng = rand::thread_rng();
        let events = (0..self.amount)
            .map(|_| random_event(&mut rng, self.around))
            .collect();
        CalendarData { events }
    }
}

#[async_trait]
impl CalendarSource for DemoCalendar {
    async fn fetch(&self) -> CalendarResult<CalendarData> {
        log::info!("Generating a demo calendar of {} events", self.amount);
        Ok(self.generate())
    }
}

const DEMO_WORDS: [&str; 40] = [
    "banana", "elephant", "sunshine", "mountain", "ocean", "butterfly", "courage", "whisper",
    "laughter", "harmony", "vibrant", "rainbow", "serenity", "adventure", "wonder", "blossom",
    "sparkle", "dream", "mystery", "enchanted", "luminous", "joyful", "splendid", "glimmer",
    "radiant", "delight", "inspire", "magic", "treasure", "freedom", "celestial", "azure",
    "twilight", "zephyr", "nova", "zenith", "velvet", "lullaby", "crystal", "reverie",
];

/// An event dated within [`DEMO_SPREAD_MILLIS`] around `around`.
/// Begin and end are drawn independently, so some events end before they begin.
fn random_event<R: Rng>(rng: &mut R, around: NaiveDateTime) -> CalendarEvent {
    let n_words = rng.gen_range(10..20);
    let words: Vec<&str> = (0..n_words)
        .filter_map(|_| DEMO_WORDS.choose(&mut *rng).copied())
        .collect();
    let description = words.join(" ");
    let title = words.iter().take(2).copied().collect::<Vec<_>>().join(" ");

    let hue = rng.gen_range(0..360) as f64;
    let priority = Priority::new(rng.gen_range(0..=Priority::LOWEST.value())).unwrap_or_default();
    let begin = around + Duration::milliseconds(rng.gen_range(-DEMO_SPREAD_MILLIS..DEMO_SPREAD_MILLIS));
    let end = around + Duration::milliseconds(rng.gen_range(-DEMO_SPREAD_MILLIS..DEMO_SPREAD_MILLIS));

    CalendarEvent::new_with_parameters(EventId::random(), title, description, priority, hue, begin, end)
}


/// A calendar file, in the format of the [`interchange`] module
#[derive(Clone, Debug)]
pub struct JsonFile {
    path: PathBuf,
    now: NaiveDateTime,
}

impl JsonFile {
    /// `now` is used as a default begin time for events that have none
    pub fn new(path: &Path, now: NaiveDateTime) -> Self {
        Self { path: PathBuf::from(path), now }
    }
}

#[async_trait]
impl CalendarSource for JsonFile {
    async fn fetch(&self) -> CalendarResult<CalendarData> {
        log::info!("Reading calendar file {:?}", self.path);
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) => return Err(CalendarError::InvalidImport(format!("Unable to read {:?}: {}", self.path, err))),
        };
        interchange::parse(&content, self.now)
    }
}
