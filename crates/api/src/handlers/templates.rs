//! Handlers for multi-part event templates.
//!
//! Every template is private to the user who created it. Reading or
//! changing someone else's template is a 403; ids that do not exist are a
//! 404.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use kalamari_core::error::CoreError;
use kalamari_db::models::template::{Template, TemplateInput};

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::handlers::parse_entity_id;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a template and verify the caller owns it.
async fn ensure_owned_template(state: &AppState, raw_id: &str, auth: &AuthUser) -> AppResult<Template> {
    let id = parse_entity_id("Template", raw_id)?;
    let template = state
        .templates
        .find_by_id(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Template", id))?;

    if template.user_id != auth.user_id {
        return Err(CoreError::Forbidden("Template belongs to another user".into()).into());
    }
    Ok(template)
}

// ---------------------------------------------------------------------------
// GET /templates
// ---------------------------------------------------------------------------

/// List the caller's templates, newest first.
pub async fn list_templates(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let items = state.templates.list_by_user(&auth.user_id).await?;
    tracing::debug!(count = items.len(), "Listed templates");
    Ok(Json(items))
}

// ---------------------------------------------------------------------------
// POST /templates
// ---------------------------------------------------------------------------

/// Create a template owned by the caller.
pub async fn create_template(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<TemplateInput>,
) -> AppResult<impl IntoResponse> {
    let fields = input.into_fields()?;

    let created = state.templates.create(&auth.user_id, &fields).await?;
    tracing::info!(id = %created.id, name = %created.name, parts = created.parts.len(), "Template created");
    Ok((StatusCode::CREATED, Json(created)))
}

// ---------------------------------------------------------------------------
// GET /templates/{id}
// ---------------------------------------------------------------------------

/// Get a single template by ID.
pub async fn get_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let template = ensure_owned_template(&state, &id, &auth).await?;
    Ok(Json(template))
}

// ---------------------------------------------------------------------------
// PUT /templates/{id}
// ---------------------------------------------------------------------------

/// Replace every mutable field of a template.
pub async fn update_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<TemplateInput>,
) -> AppResult<impl IntoResponse> {
    let existing = ensure_owned_template(&state, &id, &auth).await?;
    let fields = input.into_fields()?;

    let updated = state
        .templates
        .update(existing.id, &fields)
        .await?
        .ok_or_else(|| CoreError::not_found("Template", existing.id))?;
    tracing::info!(id = %updated.id, name = %updated.name, "Template updated");
    Ok(Json(updated))
}

// ---------------------------------------------------------------------------
// DELETE /templates/{id}
// ---------------------------------------------------------------------------

/// Delete a template. Event groups created from it are kept.
pub async fn delete_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let existing = ensure_owned_template(&state, &id, &auth).await?;

    if !state.templates.delete(existing.id).await? {
        return Err(CoreError::not_found("Template", existing.id).into());
    }
    tracing::info!(id = %existing.id, "Template deleted");
    Ok(StatusCode::NO_CONTENT)
}
