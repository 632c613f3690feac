//! The event store, the single source of truth of a calendar

use std::collections::HashSet;
use std::fmt::{Debug, Formatter};

use crate::error::{CalendarError, CalendarResult};
use crate::event::{CalendarData, CalendarEvent, EventId};
use crate::overlap::overlaps;

/// A callback that is notified after every successful change of an [`EventStore`]
pub type ChangeListener = Box<dyn FnMut(&CalendarData) + Send>;

/// The authoritative collection of events.
///
/// Events are kept in a flat list. Grouping by year, month or day is always derived from their begin time (see [`crate::query`]).
/// The only way to mutate the events is through the methods of this struct, and each successful mutation notifies the registered listeners exactly once.
#[derive(Default)]
pub struct EventStore {
    data: CalendarData,
    listeners: Vec<ChangeListener>,
}

impl Debug for EventStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStore")
            .field("data", &self.data)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from existing data.
    /// Fails if two events share an id, or if an id is empty.
    pub fn from_data(data: CalendarData) -> CalendarResult<Self> {
        check_unique_ids(&data)?;
        Ok(Self { data, listeners: Vec::new() })
    }

    /// Register a listener, called after every successful mutation
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&CalendarData) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// The current events. Their order is not meaningful.
    pub fn all(&self) -> &[CalendarEvent] {
        &self.data.events
    }

    pub fn data(&self) -> &CalendarData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.events.is_empty()
    }

    /// Returns a particular event
    pub fn get(&self, id: &EventId) -> Option<&CalendarEvent> {
        self.data.events.iter().find(|e| e.id() == id)
    }

    fn position(&self, id: &EventId) -> Option<usize> {
        self.data.events.iter().position(|e| e.id() == id)
    }

    /// Add an event into this store
    pub fn add(&mut self, event: CalendarEvent) -> CalendarResult<()> {
        if event.id().is_empty() {
            return Err(CalendarError::EmptyId);
        }
        if self.position(event.id()).is_some() {
            return Err(CalendarError::DuplicateId(event.id().clone()));
        }

        log::debug!("Adding event {} ({})", event.id(), event.title());
        self.data.events.push(event);
        self.notify();
        Ok(())
    }

    /// Remove an event from this store, and return it
    pub fn remove(&mut self, id: &EventId) -> CalendarResult<CalendarEvent> {
        let index = match self.position(id) {
            None => return Err(CalendarError::NotFound(id.clone())),
            Some(index) => index,
        };

        let removed = self.data.events.remove(index);
        log::debug!("Removed event {} ({})", removed.id(), removed.title());
        self.notify();
        Ok(removed)
    }

    /// Replace the event `id` by `new_event`, as a single change.
    ///
    /// `new_event` may keep the same id, or have a new one. In the latter case, its id must not be used by another event.
    pub fn replace(&mut self, id: &EventId, new_event: CalendarEvent) -> CalendarResult<()> {
        let index = match self.position(id) {
            None => return Err(CalendarError::NotFound(id.clone())),
            Some(index) => index,
        };

        if new_event.id().is_empty() {
            return Err(CalendarError::EmptyId);
        }
        if new_event.id() != id && self.position(new_event.id()).is_some() {
            return Err(CalendarError::DuplicateId(new_event.id().clone()));
        }

        log::debug!("Replacing event {} by {} ({})", id, new_event.id(), new_event.title());
        self.data.events[index] = new_event;
        self.notify();
        Ok(())
    }

    /// Replace the whole content of this store, as a single change (e.g. when a calendar is imported).
    /// The store is left unchanged if two events of `data` share an id, or if an id is empty.
    pub fn replace_all(&mut self, data: CalendarData) -> CalendarResult<()> {
        check_unique_ids(&data)?;

        log::debug!("Replacing all events ({} → {})", self.data.events.len(), data.events.len());
        self.data = data;
        self.notify();
        Ok(())
    }

    /// The stored events that overlap `candidate` (ignoring an event with the same id)
    pub fn overlapping(&self, candidate: &CalendarEvent) -> Vec<&CalendarEvent> {
        self.data.events.iter()
            .filter(|e| e.id() != candidate.id())
            .filter(|e| overlaps(e, candidate))
            .collect()
    }

    fn notify(&mut self) {
        let data = &self.data;
        for listener in self.listeners.iter_mut() {
            listener(data);
        }
    }
}

fn check_unique_ids(data: &CalendarData) -> CalendarResult<()> {
    let mut seen = HashSet::new();
    for event in &data.events {
        if event.id().is_empty() {
            return Err(CalendarError::EmptyId);
        }
        if seen.insert(event.id()) == false {
            return Err(CalendarError::DuplicateId(event.id().clone()));
        }
    }
    Ok(())
}
