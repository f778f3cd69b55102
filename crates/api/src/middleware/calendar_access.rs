//! Extractor for routes that call the external calendar service.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kalamari_core::error::CoreError;
use kalamari_core::types::UserId;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// A signed-in user whose session carries a provider access token.
/// Rejects with 401 Unauthorized otherwise.
///
/// ```ignore
/// async fn list(session: CalendarSession) -> AppResult<Json<()>> {
///     // session.access_token is guaranteed non-empty here
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CalendarSession {
    pub user_id: UserId,
    pub access_token: String,
}

impl FromRequestParts<AppState> for CalendarSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let access_token = user.access_token.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Session has no calendar access. Sign in again to grant it".into(),
            ))
        })?;
        Ok(CalendarSession {
            user_id: user.user_id,
            access_token,
        })
    }
}
