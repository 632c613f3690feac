//! This module ties the event store to its persistence, and exposes what a calendar widget needs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::error::CalendarResult;
use crate::event::{CalendarData, CalendarEvent, EventForm, EventId, FormDefaults};
use crate::interchange;
use crate::render::{self, DayView, MonthView};
use crate::source::CalendarSource;
use crate::storage::Storage;
use crate::store::EventStore;

/// The outcome of [`Planner::create`]
#[derive(Clone, Debug, PartialEq)]
pub struct Created {
    /// The id of the new event
    pub id: EventId,
    /// Events that overlap the new one. This is only a warning: the event has been created anyway.
    pub overlapping: Vec<EventId>,
}

/// A calendar whose events are persisted to a [`Storage`] after every change.
///
/// If the storage fails, the planner keeps working in memory only (see [`Planner::is_memory_only`]).
pub struct Planner<S: Storage + 'static> {
    store: EventStore,
    storage: Arc<Mutex<S>>,
    memory_only: Arc<AtomicBool>,
}

impl<S: Storage + 'static> Planner<S> {
    /// Load the calendar from `storage`.
    ///
    /// When nothing has been stored yet, the calendar is seeded from `fallback` (and stored right away). \
    /// When `storage` cannot be read, or holds an unusable calendar (e.g. with duplicate ids), the calendar is seeded from `fallback` as well, and the planner will not write to `storage`.
    pub async fn start<C: CalendarSource>(mut storage: S, fallback: &C) -> CalendarResult<Self> {
        let memory_only = Arc::new(AtomicBool::new(false));
        let now = Local::now().naive_local();

        let loaded = storage.load(now)
            .and_then(|found| found.map(EventStore::from_data).transpose());
        let (store, seeded) = match loaded {
            Ok(Some(store)) => {
                log::info!("Loaded {} events from storage", store.len());
                (store, false)
            },
            Ok(None) => {
                log::info!("Nothing in storage yet, using the fallback calendar");
                (EventStore::from_data(fallback.fetch().await?)?, true)
            },
            Err(err) => {
                log::warn!("Unable to load the stored calendar ({}). Changes will only be kept in memory", err);
                memory_only.store(true, Ordering::SeqCst);
                (EventStore::from_data(fallback.fetch().await?)?, false)
            },
        };

        let mut planner = Self {
            store,
            storage: Arc::new(Mutex::new(storage)),
            memory_only,
        };

        let storage = Arc::clone(&planner.storage);
        let memory_only = Arc::clone(&planner.memory_only);
        planner.store.on_change(move |data| save_to(&storage, &memory_only, data));

        if seeded {
            save_to(&planner.storage, &planner.memory_only, planner.store.data());
        }

        Ok(planner)
    }

    /// Returns the event store
    pub fn store(&self) -> &EventStore { &self.store }
    /// Returns the event store, e.g. to add events in bulk or to register other change listeners
    pub fn store_mut(&mut self) -> &mut EventStore { &mut self.store }
    /// Returns the storage
    pub fn storage(&self) -> &Mutex<S> { &self.storage }

    /// Whether changes are not persisted anymore, because the storage failed
    pub fn is_memory_only(&self) -> bool {
        self.memory_only.load(Ordering::SeqCst)
    }

    /// Create a new event from a submitted form.
    pub fn create(&mut self, form: EventForm, now: NaiveDateTime) -> CalendarResult<Created> {
        let event = form.into_event(EventId::random(), now, FormDefaults::Create);
        let overlapping: Vec<EventId> = self.store.overlapping(&event).iter()
            .map(|e| e.id().clone())
            .collect();
        if overlapping.is_empty() == false {
            log::warn!("Event {} overlaps with {} other event(s)", event.title(), overlapping.len());
        }

        let id = event.id().clone();
        self.store.add(event)?;
        Ok(Created { id, overlapping })
    }

    /// Replace an event by the content of a submitted form. The event keeps its id.
    pub fn update(&mut self, id: &EventId, form: EventForm, now: NaiveDateTime) -> CalendarResult<()> {
        let event = form.into_event(id.clone(), now, FormDefaults::Update);
        self.store.replace(id, event)
    }

    /// Delete an event
    pub fn delete(&mut self, id: &EventId) -> CalendarResult<CalendarEvent> {
        self.store.remove(id)
    }

    /// Replace the whole calendar by the content of a calendar file.
    /// The calendar is left unchanged if the file is invalid.
    pub fn import(&mut self, content: &str, now: NaiveDateTime) -> CalendarResult<()> {
        let data = interchange::parse(content, now)?;
        self.replace_all(data)
    }

    /// Replace the whole calendar by the content of a source.
    /// The calendar is left unchanged if the source fails.
    pub async fn import_from<C: CalendarSource>(&mut self, source: &C) -> CalendarResult<()> {
        let data = source.fetch().await?;
        self.replace_all(data)
    }

    fn replace_all(&mut self, data: CalendarData) -> CalendarResult<()> {
        log::info!("Importing {} events", data.events.len());
        self.store.replace_all(data)
    }

    /// Serialize the whole calendar to a calendar file
    pub fn export(&self) -> CalendarResult<String> {
        interchange::build_from(self.store.data())
    }

    /// The month grid of `year`/`month` (1-indexed), or `None` for an invalid month
    pub fn month_view(&self, year: i32, month: u32, now: NaiveDateTime) -> Option<MonthView<'_>> {
        render::month_view(self.store.all(), year, month, now)
    }

    /// The day view of `date`
    pub fn day_view(&self, date: NaiveDate) -> DayView<'_> {
        render::day_view(self.store.all(), date)
    }

    /// Today's events
    pub fn banner(&self, now: NaiveDateTime) -> Vec<&CalendarEvent> {
        render::banner(self.store.all(), now)
    }
}

/// Persist `data`, unless the storage has already failed.
/// A failure switches to memory-only mode.
fn save_to<S: Storage>(storage: &Mutex<S>, memory_only: &AtomicBool, data: &CalendarData) {
    if memory_only.load(Ordering::SeqCst) {
        log::debug!("Not saving {} events: storage is unavailable", data.events.len());
        return;
    }

    let mut storage = match storage.lock() {
        Ok(storage) => storage,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Err(err) = storage.save(data) {
        log::warn!("{}. Further changes will only be kept in memory", err);
        memory_only.store(true, Ordering::SeqCst);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    use crate::error::CalendarError;
    use crate::storage::MemoryStorage;

    fn at(d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    /// A source that always returns the same events
    struct Fixed(CalendarData);

    #[async_trait]
    impl CalendarSource for Fixed {
        async fn fetch(&self) -> CalendarResult<CalendarData> {
            Ok(self.0.clone())
        }
    }

    fn fallback() -> Fixed {
        Fixed(CalendarData::from(vec![
            CalendarEvent::new(String::from("seeded"), at(15, 9, 0), at(15, 10, 0)),
        ]))
    }

    fn form(title: &str, date: &str, begin: &str, end: &str) -> EventForm {
        EventForm {
            title: Some(title.to_string()),
            begin_date: Some(date.to_string()),
            begin_time: Some(begin.to_string()),
            end_date: Some(date.to_string()),
            end_time: Some(end.to_string()),
            ..EventForm::default()
        }
    }

    fn stored(planner: &Planner<MemoryStorage>) -> CalendarData {
        let content = planner.storage().lock().unwrap().content().unwrap().to_string();
        serde_json::from_str(&content).unwrap()
    }

    #[tokio::test]
    async fn empty_storage_is_seeded() {
        let planner = Planner::start(MemoryStorage::new(), &fallback()).await.unwrap();
        assert_eq!(planner.store().len(), 1);
        assert_eq!(stored(&planner).events.len(), 1);
        assert!(planner.is_memory_only() == false);
    }

    #[tokio::test]
    async fn stored_calendar_wins_over_fallback() {
        let content = r#"{"events":[]}"#.to_string();
        let planner = Planner::start(MemoryStorage::with_content(content), &fallback()).await.unwrap();
        assert!(planner.store().is_empty());
    }

    #[tokio::test]
    async fn every_change_is_saved() {
        let mut planner = Planner::start(MemoryStorage::new(), &fallback()).await.unwrap();
        let now = at(15, 8, 0);

        let created = planner.create(form("Meeting", "2024-03-15", "09:30", "10:30"), now).unwrap();
        assert_eq!(created.overlapping.len(), 1);
        assert_eq!(stored(&planner).events.len(), 2);

        planner.update(&created.id, form("Moved", "2024-03-16", "09:30", "10:30"), now).unwrap();
        let saved = stored(&planner);
        let moved = saved.events.iter().find(|e| e.id() == &created.id).unwrap();
        assert_eq!(moved.title(), "Moved");
        assert_eq!(moved.begin(), at(16, 9, 30));

        planner.delete(&created.id).unwrap();
        assert_eq!(stored(&planner).events.len(), 1);
    }

    #[tokio::test]
    async fn failed_changes_are_not_saved() {
        let mut planner = Planner::start(MemoryStorage::new(), &fallback()).await.unwrap();
        let before = stored(&planner);

        let err = planner.delete(&EventId::from("unknown")).unwrap_err();
        assert!(matches!(err, CalendarError::NotFound(_)));
        let err = planner.update(&EventId::from("unknown"), EventForm::default(), at(15, 8, 0)).unwrap_err();
        assert!(matches!(err, CalendarError::NotFound(_)));
        assert!(planner.import(r#"{"events":"not-an-array"}"#, at(15, 8, 0)).is_err());

        assert_eq!(stored(&planner), before);
    }

    #[tokio::test]
    async fn disabled_storage() {
        let mut planner = Planner::start(MemoryStorage::disabled(), &fallback()).await.unwrap();
        assert!(planner.is_memory_only());
        assert_eq!(planner.store().len(), 1);

        planner.create(form("Still works", "2024-03-20", "09:00", "10:00"), at(15, 8, 0)).unwrap();
        assert_eq!(planner.store().len(), 2);
        assert_eq!(planner.storage().lock().unwrap().content(), None);
    }

    #[tokio::test]
    async fn export_then_import() {
        let mut planner = Planner::start(MemoryStorage::new(), &fallback()).await.unwrap();
        planner.create(form("Lunch", "2024-03-15", "12:00", "13:00"), at(15, 8, 0)).unwrap();
        let exported = planner.export().unwrap();

        let mut other = Planner::start(MemoryStorage::new(), &Fixed(CalendarData::default())).await.unwrap();
        other.import(&exported, at(15, 8, 0)).unwrap();
        assert_eq!(other.store().data(), planner.store().data());
        assert_eq!(stored(&other), *planner.store().data());
    }

    #[tokio::test]
    async fn views() {
        let mut planner = Planner::start(MemoryStorage::new(), &fallback()).await.unwrap();
        planner.create(form("Overlapping", "2024-03-15", "09:30", "11:00"), at(15, 8, 0)).unwrap();

        let month = planner.month_view(2024, 3, at(15, 8, 0)).unwrap();
        assert_eq!(month.day(15).unwrap().events.len(), 2);
        assert!(month.day(15).unwrap().is_current_day);
        assert!(planner.month_view(2024, 13, at(15, 8, 0)).is_none());

        let day = planner.day_view(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(day.columns, 2);

        assert_eq!(planner.banner(at(15, 8, 0)).len(), 2);
        assert!(planner.banner(at(16, 8, 0)).is_empty());
    }

    /// A storage that hands out a calendar without checking it
    struct Preloaded(CalendarData);

    impl Storage for Preloaded {
        fn load(&mut self, _now: NaiveDateTime) -> CalendarResult<Option<CalendarData>> {
            Ok(Some(self.0.clone()))
        }
        fn save(&mut self, data: &CalendarData) -> CalendarResult<()> {
            self.0 = data.clone();
            Ok(())
        }
    }

    const DUPLICATED_IDS: &str = r#"{"events": [
        {"id": "x", "title": "a", "begin": "2024-03-15T09:00:00", "end": "2024-03-15T10:00:00"},
        {"id": "x", "title": "b", "begin": "2024-03-16T09:00:00", "end": "2024-03-16T10:00:00"}
    ]}"#;

    #[tokio::test]
    async fn stored_duplicate_ids_fall_back() {
        let planner = Planner::start(MemoryStorage::with_content(DUPLICATED_IDS.to_string()), &fallback()).await.unwrap();
        assert!(planner.is_memory_only());
        assert_eq!(planner.store().all()[0].title(), "seeded");
        // The stored calendar is left as it was
        assert_eq!(planner.storage().lock().unwrap().content(), Some(DUPLICATED_IDS));

        let duplicated = CalendarData::from(vec![
            CalendarEvent::new_with_parameters(EventId::from("x"), String::from("a"), String::new(), Default::default(), 0.0, at(15, 9, 0), at(15, 10, 0)),
            CalendarEvent::new_with_parameters(EventId::from("x"), String::from("b"), String::new(), Default::default(), 0.0, at(16, 9, 0), at(16, 10, 0)),
        ]);
        let mut planner = Planner::start(Preloaded(duplicated.clone()), &fallback()).await.unwrap();
        assert!(planner.is_memory_only());
        assert_eq!(planner.store().len(), 1);

        planner.create(form("Not saved", "2024-03-20", "09:00", "10:00"), at(15, 8, 0)).unwrap();
        assert_eq!(planner.storage().lock().unwrap().0, duplicated);
    }

    #[tokio::test]
    async fn stored_event_without_description() {
        let content = r#"{"events": [{"id": "x", "priority": 0, "title": "a", "hue": 1, "begin": "2024-03-15T09:00:00", "end": "2024-03-15T10:00:00"}]}"#;
        let planner = Planner::start(MemoryStorage::with_content(content.to_string()), &fallback()).await.unwrap();

        assert!(planner.is_memory_only() == false);
        assert_eq!(planner.store().len(), 1);
        let event = planner.store().get(&EventId::from("x")).unwrap();
        assert_eq!(event.title(), "a");
        assert_eq!(event.description(), "");
    }
}
