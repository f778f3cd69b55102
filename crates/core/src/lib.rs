//! Domain layer for Kalamari: error taxonomy, shared types, template
//! validation, the schedule expander and the calendar service boundary.

pub mod calendar;
pub mod error;
pub mod schedule;
pub mod template;
pub mod types;
