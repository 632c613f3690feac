//! This module handles conversion between JSON calendar files and internal representations
//!
//! The file format is the one used to export and import whole calendars:
//! ```json
//! { "events": [ { "id": "…", "priority": 0, "title": "…", "description": "…",
//!                 "hue": 210, "begin": "2024-03-15T09:00:00", "end": "2024-03-15T10:00:00" } ] }
//! ```

mod parser;
pub use parser::parse;
mod builder;
pub use builder::build_from;

pub(crate) mod timestamp;
