//! Event group model and DTOs.

use kalamari_core::types::{EntityId, ItemKind, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `event_groups` table. Immutable once written.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGroup {
    pub id: EntityId,
    pub user_id: UserId,
    pub template_id: EntityId,
    /// Template name at the time of the run; survives template deletion.
    pub template_name: String,
    pub anchor_date: Timestamp,
    pub calendar_id: String,
    #[sqlx(try_from = "String")]
    pub item_kind: ItemKind,
    /// Ids of the items that were created, in submission order.
    pub event_ids: Vec<String>,
    pub created_at: Timestamp,
}

/// Everything needed to insert an event group.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEventGroup {
    pub user_id: UserId,
    pub template_id: EntityId,
    pub template_name: String,
    pub anchor_date: Timestamp,
    pub calendar_id: String,
    pub item_kind: ItemKind,
    pub event_ids: Vec<String>,
}
