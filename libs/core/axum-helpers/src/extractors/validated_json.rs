//! JSON extractor that runs `validator` rules before the handler sees the body.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// Malformed JSON is rejected the way `axum::Json` rejects it (wrapped in the
/// standard error body). A body that parses but fails `Validate` yields
/// `400 VALIDATION_ERROR` with the per-field errors in `details`.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct Credentials {
///     #[validate(length(min = 3, max = 50))]
///     name: String,
/// }
///
/// async fn find(ValidatedJson(input): ValidatedJson<Credentials>) -> String {
///     input.name
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}
