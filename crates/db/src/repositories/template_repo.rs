//! Repository for the `templates` table.

use kalamari_core::types::EntityId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::template::{Template, TemplateFields};

const COLUMNS: &str = "id, user_id, name, description, color, default_calendar_id, \
     parts, created_at, updated_at";

/// Provides CRUD operations for templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Insert a new template, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: &str,
        fields: &TemplateFields,
    ) -> Result<Template, sqlx::Error> {
        let query = format!(
            "INSERT INTO templates \
                (user_id, name, description, color, default_calendar_id, parts) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(user_id)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(&fields.color)
            .bind(&fields.default_calendar_id)
            .bind(Json(&fields.parts))
            .fetch_one(pool)
            .await
    }

    /// Find a template by ID.
    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's templates, most recently created first.
    pub async fn list_by_user(pool: &PgPool, user_id: &str) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM templates \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Replace every mutable field of a template.
    ///
    /// `updated_at` always moves forward, even for two writes inside the
    /// same microsecond.
    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        fields: &TemplateFields,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET \
                name = $2, \
                description = $3, \
                color = $4, \
                default_calendar_id = $5, \
                parts = $6, \
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond') \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(&fields.color)
            .bind(&fields.default_calendar_id)
            .bind(Json(&fields.parts))
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a template by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
