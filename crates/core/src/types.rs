use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Templates and event groups are keyed by UUIDs.
pub type EntityId = uuid::Uuid;

/// Opaque user identifier (the session subject).
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// What kind of external item a template instantiation creates.
///
/// `Event` items occupy a time span in a calendar; `Task` items carry only a
/// due date in a task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Event,
    Task,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Event => "event",
            ItemKind::Task => "task",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ItemKind {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "event" => Ok(ItemKind::Event),
            "task" => Ok(ItemKind::Task),
            other => Err(CoreError::Validation(format!(
                "Unknown item kind '{other}'. Must be one of: event, task"
            ))),
        }
    }
}

/// Timestamp for a record mutation that must sort strictly after `previous`.
///
/// Stores keep microsecond precision, so two writes inside the same
/// microsecond are bumped by one microsecond.
pub fn advance_timestamp(previous: Timestamp, now: Timestamp) -> Timestamp {
    let floor = previous + chrono::Duration::microseconds(1);
    if now >= floor {
        now
    } else {
        floor
    }
}
