//! Store traits consumed by the API layer and their PostgreSQL backing.
//!
//! The API holds `Arc<dyn TemplateStore>` / `Arc<dyn EventGroupStore>` so
//! the backend is chosen at startup and tests can run without a database.

use async_trait::async_trait;
use kalamari_core::types::EntityId;

use crate::models::event_group::{EventGroup, NewEventGroup};
use crate::models::template::{Template, TemplateFields};
use crate::repositories::{EventGroupRepo, TemplateRepo};
use crate::DbPool;

/// Errors from a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Template persistence, keyed by id.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn create(&self, user_id: &str, fields: &TemplateFields)
        -> Result<Template, StoreError>;

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Template>, StoreError>;

    /// Replace the mutable fields. `None` if the template does not exist.
    async fn update(
        &self,
        id: EntityId,
        fields: &TemplateFields,
    ) -> Result<Option<Template>, StoreError>;

    /// `true` if a template was removed.
    async fn delete(&self, id: EntityId) -> Result<bool, StoreError>;

    /// Templates owned by `user_id`, newest first.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Template>, StoreError>;

    /// Verify the backend is reachable.
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Event group persistence. Groups are never updated or deleted.
#[async_trait]
pub trait EventGroupStore: Send + Sync {
    async fn create(&self, input: &NewEventGroup) -> Result<EventGroup, StoreError>;

    async fn find_by_id(&self, id: EntityId) -> Result<Option<EventGroup>, StoreError>;

    /// Groups owned by `user_id`, newest first.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<EventGroup>, StoreError>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// [`TemplateStore`] backed by the `templates` table.
#[derive(Clone)]
pub struct PgTemplateStore {
    pool: DbPool,
}

impl PgTemplateStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateStore for PgTemplateStore {
    async fn create(
        &self,
        user_id: &str,
        fields: &TemplateFields,
    ) -> Result<Template, StoreError> {
        Ok(TemplateRepo::create(&self.pool, user_id, fields).await?)
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Template>, StoreError> {
        Ok(TemplateRepo::find_by_id(&self.pool, id).await?)
    }

    async fn update(
        &self,
        id: EntityId,
        fields: &TemplateFields,
    ) -> Result<Option<Template>, StoreError> {
        Ok(TemplateRepo::update(&self.pool, id, fields).await?)
    }

    async fn delete(&self, id: EntityId) -> Result<bool, StoreError> {
        Ok(TemplateRepo::delete(&self.pool, id).await?)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Template>, StoreError> {
        Ok(TemplateRepo::list_by_user(&self.pool, user_id).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

/// [`EventGroupStore`] backed by the `event_groups` table.
#[derive(Clone)]
pub struct PgEventGroupStore {
    pool: DbPool,
}

impl PgEventGroupStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventGroupStore for PgEventGroupStore {
    async fn create(&self, input: &NewEventGroup) -> Result<EventGroup, StoreError> {
        Ok(EventGroupRepo::create(&self.pool, input).await?)
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<EventGroup>, StoreError> {
        Ok(EventGroupRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<EventGroup>, StoreError> {
        Ok(EventGroupRepo::list_by_user(&self.pool, user_id).await?)
    }
}
