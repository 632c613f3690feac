//! A module to parse imported calendar files

use std::collections::HashSet;
use std::convert::TryFrom;

use chrono::{Duration, NaiveDateTime};
use serde_json::{Map, Value};

use crate::error::{CalendarError, CalendarResult};
use crate::event::{CalendarData, CalendarEvent, EventId, Priority};
use crate::interchange::timestamp;


/// Parse a calendar file into the internal representation [`CalendarData`]
///
/// The content must be JSON with an `events` array of objects, and event ids must be unique. Otherwise, this returns a [`CalendarError::InvalidImport`].
/// Inside each event, missing or malformed fields are replaced by defaults (and a warning is logged). `now` is the default begin time.
pub fn parse(content: &str, now: NaiveDateTime) -> CalendarResult<CalendarData> {
    let root: Value = match serde_json::from_str(content) {
        Ok(root) => root,
        Err(err) => return Err(CalendarError::InvalidImport(format!("not valid JSON: {}", err))),
    };

    let entries = match root.get("events") {
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(CalendarError::InvalidImport("`events` is not an array".to_string())),
        None => return Err(CalendarError::InvalidImport("missing `events` array".to_string())),
    };

    let mut events = Vec::with_capacity(entries.len());
    let mut seen_ids = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        let fields = match entry {
            Value::Object(fields) => fields,
            _ => return Err(CalendarError::InvalidImport(format!("event #{} is not an object", index))),
        };

        let event = parse_event(fields, index, now);
        if seen_ids.insert(event.id().clone()) == false {
            return Err(CalendarError::InvalidImport(format!("event id {} is used more than once", event.id())));
        }
        events.push(event);
    }

    log::debug!("Parsed {} events", events.len());
    Ok(CalendarData { events })
}

fn parse_event(fields: &Map<String, Value>, index: usize, now: NaiveDateTime) -> CalendarEvent {
    let id = match fields.get("id") {
        Some(Value::String(id)) if id.is_empty() == false => EventId::from(id.as_str()),
        other => {
            let id = EventId::random();
            if is_present(other) {
                log::warn!("Event #{} has an invalid id, it is now {}", index, id);
            }
            id
        }
    };

    let priority = match fields.get("priority") {
        Some(Value::Number(n)) => {
            let value = n.as_u64().and_then(|v| u8::try_from(v).ok()).and_then(Priority::new);
            match value {
                Some(p) => p,
                None => {
                    log::warn!("Event {} has an invalid priority ({}), using the default priority", id, n);
                    Priority::default()
                }
            }
        },
        Some(Value::String(s)) => Priority::parse_lenient(s),
        other => {
            if is_present(other) {
                log::warn!("Event {} has an invalid priority, using the default priority", id);
            }
            Priority::default()
        }
    };

    let title = string_field(fields, "title", &id);
    let description = string_field(fields, "description", &id);

    let hue = match fields.get("hue") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let hue = match hue {
        Some(hue) => hue,
        None => {
            if is_present(fields.get("hue")) {
                log::warn!("Event {} has an invalid hue, using 0", id);
            }
            0.0
        }
    };

    let begin = match timestamp_field(fields, "begin") {
        Some(begin) => begin,
        None => {
            log::warn!("Event {} has no valid begin time, using {}", id, now);
            now
        }
    };
    let end = match timestamp_field(fields, "end") {
        Some(end) => end,
        None => {
            let end = begin + Duration::hours(1);
            log::warn!("Event {} has no valid end time, using {}", id, end);
            end
        }
    };

    CalendarEvent::new_with_parameters(id, title, description, priority, hue, begin, end)
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(_) => true,
    }
}

fn string_field(fields: &Map<String, Value>, name: &str, id: &EventId) -> String {
    match fields.get(name) {
        Some(Value::String(s)) => s.clone(),
        other => {
            if is_present(other) {
                log::warn!("Event {} has a non-text {}, ignoring it", id, name);
            }
            String::new()
        }
    }
}

fn timestamp_field(fields: &Map<String, Value>, name: &str) -> Option<NaiveDateTime> {
    match fields.get(name) {
        Some(Value::String(s)) => timestamp::parse(s),
        _ => None,
    }
}
