//! JSON body extractor with the service's error contract.

use axum::extract::{FromRequest, Request};
use axum::Json;
use kalamari_core::error::CoreError;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Like [`axum::Json`], but a malformed, mistyped or unknown-field body is a
/// 400 `VALIDATION_ERROR` instead of axum's plain-text 4xx.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidatedJson(value)),
            Err(rejection) => Err(AppError::Core(CoreError::Validation(
                rejection.body_text(),
            ))),
        }
    }
}
