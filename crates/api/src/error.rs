use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kalamari_core::error::CoreError;
use kalamari_core::types::EntityId;
use kalamari_db::store::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{"error": ..., "code": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `kalamari_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence error from a store backend.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The calendar service revoked access part-way through a batch.
    ///
    /// Rendered as 401 with the ids created before the failure and, when a
    /// group was recorded for them, its id.
    #[error("Calendar authorization failed after {} item(s) were created", .event_ids.len())]
    BatchAborted {
        event_ids: Vec<String>,
        event_group_id: Option<EntityId>,
    },

    /// Items were created but the event group could not be stored.
    ///
    /// Rendered as a sanitized 500 that still carries the created ids.
    #[error("Event group for {} created item(s) could not be recorded: {source}", .event_ids.len())]
    GroupNotRecorded {
        event_ids: Vec<String>,
        source: StoreError,
    },
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => classify_core_error(core),

            // --- Store errors ---
            AppError::Store(StoreError::Database(err)) => classify_sqlx_error(err),

            // --- Partial batch ---
            AppError::BatchAborted {
                event_ids,
                event_group_id,
            } => {
                let mut body = json!({
                    "error": "Calendar authorization expired or was revoked. Sign in again to continue.",
                    "code": "UNAUTHORIZED",
                    "eventIds": event_ids,
                });
                if let Some(group_id) = event_group_id {
                    body["eventGroupId"] = json!(group_id);
                }
                return (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response();
            }

            AppError::GroupNotRecorded { event_ids, .. } => {
                let body = json!({
                    "error": "Items were created but the event group could not be recorded",
                    "code": "INTERNAL_ERROR",
                    "eventIds": event_ids,
                });
                return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response();
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::ExternalService(msg) => {
            tracing::warn!(error = %msg, "External service error");
            (
                StatusCode::BAD_GATEWAY,
                "EXTERNAL_SERVICE_ERROR",
                msg.clone(),
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
