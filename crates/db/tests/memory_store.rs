//! Behaviour of the in-memory stores: ordering, full-replace updates and
//! immutability of event groups.

use chrono::{TimeZone, Utc};
use kalamari_core::template::TemplatePart;
use kalamari_core::types::ItemKind;
use kalamari_db::memory::{MemoryEventGroupStore, MemoryTemplateStore};
use kalamari_db::models::event_group::NewEventGroup;
use kalamari_db::models::template::TemplateFields;
use kalamari_db::store::{EventGroupStore, TemplateStore};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fields(name: &str) -> TemplateFields {
    TemplateFields {
        name: name.to_string(),
        description: Some("desc".to_string()),
        color: "#f59e0b".to_string(),
        default_calendar_id: None,
        parts: vec![
            TemplatePart {
                id: "p1".to_string(),
                title: "Book".to_string(),
                offset_minutes: -1440,
                duration_minutes: 30,
                description: None,
            },
            TemplatePart {
                id: "p2".to_string(),
                title: "Haircut".to_string(),
                offset_minutes: 0,
                duration_minutes: 60,
                description: None,
            },
        ],
    }
}

fn new_group(user: &str, event_ids: &[&str]) -> NewEventGroup {
    NewEventGroup {
        user_id: user.to_string(),
        template_id: Uuid::new_v4(),
        template_name: "Haircut".to_string(),
        anchor_date: Utc.with_ymd_and_hms(2024, 7, 10, 10, 0, 0).unwrap(),
        calendar_id: "primary".to_string(),
        item_kind: ItemKind::Event,
        event_ids: event_ids.iter().map(|s| s.to_string()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_find_returns_same_fields() {
    let store = MemoryTemplateStore::new();
    let created = store.create("ann@example.com", &fields("Haircut")).await.unwrap();

    let found = store.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found, created);
    assert_eq!(found.user_id, "ann@example.com");
    assert_eq!(found.parts, fields("Haircut").parts);
    assert_eq!(found.created_at, found.updated_at);
}

#[tokio::test]
async fn update_replaces_fields_and_advances_updated_at() {
    let store = MemoryTemplateStore::new();
    let created = store.create("ann@example.com", &fields("Haircut")).await.unwrap();

    let mut replacement = fields("Trim");
    replacement.description = None;
    replacement.parts.truncate(1);

    let updated = store.update(created.id, &replacement).await.unwrap().unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.user_id, created.user_id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.name, "Trim");
    assert_eq!(updated.description, None);
    assert_eq!(updated.parts.len(), 1);
    assert!(updated.updated_at > created.updated_at);

    let again = store.update(created.id, &replacement).await.unwrap().unwrap();
    assert!(again.updated_at > updated.updated_at);
}

#[tokio::test]
async fn update_missing_returns_none() {
    let store = MemoryTemplateStore::new();
    let result = store.update(Uuid::new_v4(), &fields("x")).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn delete_removes_once() {
    let store = MemoryTemplateStore::new();
    let created = store.create("ann@example.com", &fields("Haircut")).await.unwrap();

    assert!(store.delete(created.id).await.unwrap());
    assert!(!store.delete(created.id).await.unwrap());
    assert!(store.find_by_id(created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn list_by_user_filters_and_orders_newest_first() {
    let store = MemoryTemplateStore::new();
    let first = store.create("ann@example.com", &fields("First")).await.unwrap();
    store.create("bob@example.com", &fields("Bob's")).await.unwrap();
    let second = store.create("ann@example.com", &fields("Second")).await.unwrap();

    let listed = store.list_by_user("ann@example.com").await.unwrap();
    let ids: Vec<_> = listed.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

// ---------------------------------------------------------------------------
// Event groups
// ---------------------------------------------------------------------------

#[tokio::test]
async fn event_group_round_trip_preserves_id_order() {
    let store = MemoryEventGroupStore::new();
    let created = store
        .create(&new_group("ann@example.com", &["e1", "e3"]))
        .await
        .unwrap();

    let found = store.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.event_ids, vec!["e1", "e3"]);
    assert_eq!(found.template_name, "Haircut");
    assert_eq!(found.item_kind, ItemKind::Event);
}

#[tokio::test]
async fn event_groups_list_newest_first_per_user() {
    let store = MemoryEventGroupStore::new();
    let a = store.create(&new_group("ann@example.com", &[])).await.unwrap();
    let b = store.create(&new_group("ann@example.com", &["x"])).await.unwrap();
    store.create(&new_group("bob@example.com", &["y"])).await.unwrap();

    let listed = store.list_by_user("ann@example.com").await.unwrap();
    let ids: Vec<_> = listed.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
}
