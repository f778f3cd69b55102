//! In-process store implementations.
//!
//! Used by the integration tests and by `STORE_BACKEND=memory` for local
//! runs without PostgreSQL. Data lives only as long as the process.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use kalamari_core::types::{advance_timestamp, EntityId};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::event_group::{EventGroup, NewEventGroup};
use crate::models::template::{Template, TemplateFields};
use crate::store::{EventGroupStore, StoreError, TemplateStore};

/// A stored value plus its insertion sequence, used as the tie-break when
/// two records share a `created_at`.
struct Entry<T> {
    seq: u64,
    value: T,
}

struct Table<T> {
    next_seq: u64,
    rows: HashMap<EntityId, Entry<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            rows: HashMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert(&mut self, id: EntityId, value: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.rows.insert(id, Entry { seq, value });
    }

    /// Rows matching `filter`, newest first by (`created_at`, insertion order).
    fn scan_desc<K: Ord>(&self, filter: impl Fn(&T) -> bool, created_at: impl Fn(&T) -> K) -> Vec<T> {
        let mut hits: Vec<&Entry<T>> = self.rows.values().filter(|e| filter(&e.value)).collect();
        hits.sort_by(|a, b| {
            created_at(&b.value)
                .cmp(&created_at(&a.value))
                .then(b.seq.cmp(&a.seq))
        });
        hits.into_iter().map(|e| e.value.clone()).collect()
    }
}

/// [`TemplateStore`] over a `HashMap`.
#[derive(Default)]
pub struct MemoryTemplateStore {
    table: RwLock<Table<Template>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn create(
        &self,
        user_id: &str,
        fields: &TemplateFields,
    ) -> Result<Template, StoreError> {
        let now = Utc::now();
        let template = Template {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: fields.name.clone(),
            description: fields.description.clone(),
            color: fields.color.clone(),
            default_calendar_id: fields.default_calendar_id.clone(),
            parts: fields.parts.clone(),
            created_at: now,
            updated_at: now,
        };
        self.table.write().await.insert(template.id, template.clone());
        Ok(template)
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Template>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).map(|e| e.value.clone()))
    }

    async fn update(
        &self,
        id: EntityId,
        fields: &TemplateFields,
    ) -> Result<Option<Template>, StoreError> {
        let mut table = self.table.write().await;
        let Some(entry) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        let t = &mut entry.value;
        t.name = fields.name.clone();
        t.description = fields.description.clone();
        t.color = fields.color.clone();
        t.default_calendar_id = fields.default_calendar_id.clone();
        t.parts = fields.parts.clone();
        t.updated_at = advance_timestamp(t.updated_at, Utc::now());
        Ok(Some(t.clone()))
    }

    async fn delete(&self, id: EntityId) -> Result<bool, StoreError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Template>, StoreError> {
        let table = self.table.read().await;
        Ok(table.scan_desc(|t| t.user_id == user_id, |t| t.created_at))
    }
}

/// [`EventGroupStore`] over a `HashMap`.
#[derive(Default)]
pub struct MemoryEventGroupStore {
    table: RwLock<Table<EventGroup>>,
}

impl MemoryEventGroupStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventGroupStore for MemoryEventGroupStore {
    async fn create(&self, input: &NewEventGroup) -> Result<EventGroup, StoreError> {
        let group = EventGroup {
            id: Uuid::new_v4(),
            user_id: input.user_id.clone(),
            template_id: input.template_id,
            template_name: input.template_name.clone(),
            anchor_date: input.anchor_date,
            calendar_id: input.calendar_id.clone(),
            item_kind: input.item_kind,
            event_ids: input.event_ids.clone(),
            created_at: Utc::now(),
        };
        self.table.write().await.insert(group.id, group.clone());
        Ok(group)
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<EventGroup>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).map(|e| e.value.clone()))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<EventGroup>, StoreError> {
        let table = self.table.read().await;
        Ok(table.scan_desc(|g| g.user_id == user_id, |g| g.created_at))
    }
}
