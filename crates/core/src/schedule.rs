//! Template-to-schedule expansion.
//!
//! [`expand`] turns an ordered list of [`TemplatePart`]s and a single anchor
//! instant into an ordered list of [`ItemSpec`]s ready to be submitted to
//! the calendar service. The i-th spec always belongs to the i-th part.
//!
//! Span items (calendar events) get `start = anchor + offset` and
//! `end = start + duration`. Point items (tasks) get a due value which is
//! `anchor + offset` truncated to midnight UTC of that day, because the task
//! API only stores a date.

use chrono::{DateTime, NaiveDateTime, NaiveTime, SecondsFormat, TimeDelta, Utc};

use crate::error::CoreError;
use crate::template::TemplatePart;
use crate::types::{ItemKind, Timestamp};

/// Naive anchor formats accepted in addition to RFC 3339. Interpreted as UTC.
const NAIVE_ANCHOR_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// When an item happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemTiming {
    /// Occupies `[start, end)`.
    Span { start: Timestamp, end: Timestamp },
    /// Due on a calendar day; always midnight UTC.
    Point { due: Timestamp },
}

/// A concrete, dated item derived from one template part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub title: String,
    pub description: Option<String>,
    pub timing: ItemTiming,
}

impl ItemSpec {
    pub fn kind(&self) -> ItemKind {
        match self.timing {
            ItemTiming::Span { .. } => ItemKind::Event,
            ItemTiming::Point { .. } => ItemKind::Task,
        }
    }
}

/// Expand `parts` against `anchor` into one [`ItemSpec`] per part, in order.
///
/// Fails with [`CoreError::Validation`] if a span part has a non-positive
/// duration or an offset pushes a time out of the representable range.
/// Performs no I/O and reads no clock.
pub fn expand(
    anchor: Timestamp,
    parts: &[TemplatePart],
    kind: ItemKind,
) -> Result<Vec<ItemSpec>, CoreError> {
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| expand_part(anchor, part, kind, i + 1))
        .collect()
}

fn expand_part(
    anchor: Timestamp,
    part: &TemplatePart,
    kind: ItemKind,
    position: usize,
) -> Result<ItemSpec, CoreError> {
    let start = shift(anchor, part.offset_minutes).ok_or_else(|| {
        CoreError::Validation(format!(
            "Part {position}: offset of {} minutes is out of range",
            part.offset_minutes
        ))
    })?;

    let timing = match kind {
        ItemKind::Event => {
            if part.duration_minutes <= 0 {
                return Err(CoreError::Validation(format!(
                    "Part {position}: duration must be positive, got {}",
                    part.duration_minutes
                )));
            }
            let end = shift(start, part.duration_minutes).ok_or_else(|| {
                CoreError::Validation(format!(
                    "Part {position}: duration of {} minutes is out of range",
                    part.duration_minutes
                ))
            })?;
            ItemTiming::Span { start, end }
        }
        ItemKind::Task => ItemTiming::Point {
            due: midnight_utc(start),
        },
    };

    Ok(ItemSpec {
        title: part.title.clone(),
        description: part.description.clone(),
        timing,
    })
}

/// `instant + minutes`, or `None` on overflow.
pub fn shift(instant: Timestamp, minutes: i64) -> Option<Timestamp> {
    TimeDelta::try_minutes(minutes).and_then(|delta| instant.checked_add_signed(delta))
}

/// Midnight UTC of the UTC calendar day containing `instant`.
pub fn midnight_utc(instant: Timestamp) -> Timestamp {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Serialize an instant as RFC 3339 UTC with millisecond precision,
/// e.g. `2024-07-09T10:00:00.000Z`.
pub fn format_instant(instant: Timestamp) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serialize a due value in the date-only form the task API expects:
/// `YYYY-MM-DDT00:00:00.000Z`.
pub fn format_due(due: Timestamp) -> String {
    format_instant(midnight_utc(due))
}

/// Parse an anchor supplied by a client.
///
/// Accepts RFC 3339 with any offset (normalized to UTC) or a naive
/// `YYYY-MM-DDTHH:MM[:SS[.fff]]` value, which is taken as UTC.
pub fn parse_anchor(raw: &str) -> Result<Timestamp, CoreError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NAIVE_ANCHOR_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid anchorDate '{raw}'. Expected an RFC 3339 timestamp"
            ))
        })
}
