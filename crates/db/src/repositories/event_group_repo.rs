//! Repository for the `event_groups` table. Insert and read only.

use kalamari_core::types::EntityId;
use sqlx::PgPool;

use crate::models::event_group::{EventGroup, NewEventGroup};

const COLUMNS: &str = "id, user_id, template_id, template_name, anchor_date, calendar_id, \
     item_kind, event_ids, created_at";

pub struct EventGroupRepo;

impl EventGroupRepo {
    /// Insert a new event group, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewEventGroup) -> Result<EventGroup, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_groups \
                (user_id, template_id, template_name, anchor_date, calendar_id, item_kind, event_ids) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventGroup>(&query)
            .bind(&input.user_id)
            .bind(input.template_id)
            .bind(&input.template_name)
            .bind(input.anchor_date)
            .bind(&input.calendar_id)
            .bind(input.item_kind.as_str())
            .bind(&input.event_ids)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: EntityId,
    ) -> Result<Option<EventGroup>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM event_groups WHERE id = $1");
        sqlx::query_as::<_, EventGroup>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's event groups, most recent first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<EventGroup>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_groups \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, EventGroup>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
