//! Body and query extractors that reject with the standard error body.
//!
//! Axum's own `Json` and `Query` answer a bad request with a plain-text
//! 400/415/422. These wrappers turn every such rejection into a
//! `VALIDATION_ERROR` so clients only ever parse one error shape.

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use fieldcrm_core::error::CoreError;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// A JSON request body of type `T`.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(status = %rejection.status(), "Rejected request body");
            AppError::Core(CoreError::Validation(rejection.body_text()))
        })?;
        Ok(Self(value))
    }
}

/// Query string parameters of type `T`.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Core(CoreError::Validation(rejection.body_text())))?;
        Ok(Self(value))
    }
}
