//! JSON shapes exchanged with the Google APIs.
//!
//! Only the fields Kalamari reads or writes are modelled; everything else in
//! Google's responses is ignored.

use serde::{Deserialize, Serialize};

use kalamari_core::calendar::DestinationContainer;

/// `start` / `end` of a timed event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    /// RFC 3339 timestamp.
    pub date_time: String,
}

/// Body of `POST /calendars/{calendarId}/events`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventInsert<'a> {
    pub summary: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// Body of `POST /lists/{tasklist}/tasks`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskInsert<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
    /// Always midnight UTC; the Tasks API discards the time portion.
    pub due: String,
}

/// The part of an inserted event or task we keep.
#[derive(Debug, Deserialize)]
pub struct CreatedResource {
    #[serde(default)]
    pub id: Option<String>,
}

/// Envelope of the list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// An entry of `GET /users/me/calendarList`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListEntry {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub summary_override: Option<String>,
}

impl From<CalendarListEntry> for DestinationContainer {
    fn from(entry: CalendarListEntry) -> Self {
        let summary = entry
            .summary_override
            .or(entry.summary)
            .unwrap_or_else(|| entry.id.clone());
        DestinationContainer {
            id: entry.id,
            summary,
        }
    }
}

/// An entry of `GET /users/@me/lists`.
#[derive(Debug, Deserialize)]
pub struct TaskListEntry {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl From<TaskListEntry> for DestinationContainer {
    fn from(entry: TaskListEntry) -> Self {
        let summary = entry.title.unwrap_or_else(|| entry.id.clone());
        DestinationContainer {
            id: entry.id,
            summary,
        }
    }
}
