//! Google Calendar v3 / Google Tasks v1 client.
//!
//! [`api::GoogleCalendarApi`] implements
//! [`kalamari_core::calendar::CalendarService`]; [`wire`] holds the JSON
//! request and response shapes.

pub mod api;
pub mod wire;

pub use api::{GoogleCalendarApi, DEFAULT_CALENDAR_API_URL, DEFAULT_TASKS_API_URL};
