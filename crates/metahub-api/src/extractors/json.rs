//! JSON body extractor that runs `validator` rules.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use metahub_core::error::AppError;

use crate::error::ApiError;

/// A JSON body that deserialized and passed its validation rules.
///
/// Malformed bodies and rule violations are both reported as
/// `VALIDATION_ERROR`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::from(AppError::validation(rejection.body_text())))?;

        if let Err(errors) = value.validate() {
            let details = serde_json::to_value(&errors).unwrap_or(serde_json::Value::Null);
            return Err(ApiError::from(AppError::validation("Request validation failed"))
                .with_details(details));
        }

        Ok(Self(value))
    }
}
