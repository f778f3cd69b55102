//! Handlers for event groups: instantiating a template and browsing the
//! groups it produced.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use kalamari_core::error::CoreError;
use kalamari_core::schedule::parse_anchor;
use kalamari_core::types::{EntityId, ItemKind};

use crate::engine::dispatcher::{DispatchRequest, EventGroupDispatcher};
use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::handlers::parse_entity_id;
use crate::middleware::calendar_access::CalendarSession;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /event-groups`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateEventGroup {
    pub template_id: EntityId,
    /// RFC 3339, or `YYYY-MM-DDTHH:MM[:SS]` taken as UTC.
    pub anchor_date: String,
    /// Calendar id for events, task-list id for tasks.
    pub calendar_id: String,
    #[serde(default)]
    pub item_kind: Option<ItemKind>,
}

// ---------------------------------------------------------------------------
// GET /event-groups
// ---------------------------------------------------------------------------

/// List the caller's event groups, newest first.
pub async fn list_event_groups(
    session: CalendarSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let items = state.event_groups.list_by_user(&session.user_id).await?;
    tracing::debug!(count = items.len(), "Listed event groups");
    Ok(Json(items))
}

// ---------------------------------------------------------------------------
// POST /event-groups
// ---------------------------------------------------------------------------

/// Create calendar items from a template and record them as a group.
///
/// Returns 201 even when some items could not be created; `eventIds` then
/// holds fewer ids than the template has parts.
///
/// The batch runs on its own task: once submission starts it completes and
/// the group is recorded even if this request is dropped.
pub async fn create_event_group(
    session: CalendarSession,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateEventGroup>,
) -> AppResult<impl IntoResponse> {
    let anchor = parse_anchor(&input.anchor_date)?;

    let request = DispatchRequest {
        template_id: input.template_id,
        anchor,
        destination_id: input.calendar_id,
        kind: input.item_kind.unwrap_or_default(),
        user_id: session.user_id,
        access_token: session.access_token,
    };

    let dispatcher = EventGroupDispatcher::from_state(&state);
    let group = tokio::spawn(async move { dispatcher.dispatch(request).await })
        .await
        .map_err(|e| CoreError::Internal(format!("Dispatch task failed: {e}")))??;
    tracing::info!(
        id = %group.id,
        template_id = %group.template_id,
        items = group.event_ids.len(),
        "Event group created"
    );
    Ok((StatusCode::CREATED, Json(group)))
}

// ---------------------------------------------------------------------------
// GET /event-groups/{id}
// ---------------------------------------------------------------------------

/// Get a single event group by ID.
pub async fn get_event_group(
    session: CalendarSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_entity_id("EventGroup", &id)?;
    let group = state
        .event_groups
        .find_by_id(id)
        .await?
        .ok_or_else(|| CoreError::not_found("EventGroup", id))?;

    if group.user_id != session.user_id {
        return Err(CoreError::Forbidden("Event group belongs to another user".into()).into());
    }
    Ok(Json(group))
}
