//! Destination listing: the calendars and task lists a template can be
//! instantiated into.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use kalamari_core::error::CoreError;
use kalamari_core::types::ItemKind;

use crate::error::AppResult;
use crate::middleware::calendar_access::CalendarSession;
use crate::state::AppState;

async fn list_destinations(
    session: &CalendarSession,
    state: &AppState,
    kind: ItemKind,
) -> AppResult<impl IntoResponse> {
    let items = state
        .calendar
        .list_containers(&session.access_token, kind)
        .await
        .map_err(CoreError::from)?;
    tracing::debug!(%kind, count = items.len(), "Listed destinations");
    Ok(Json(items))
}

/// GET /calendars
pub async fn list_calendars(
    session: CalendarSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    list_destinations(&session, &state, ItemKind::Event).await
}

/// GET /task-lists
pub async fn list_task_lists(
    session: CalendarSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    list_destinations(&session, &state, ItemKind::Task).await
}
