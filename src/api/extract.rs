//! Request extractors.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::Payload;

/// JSON body that has been parsed and validated.
///
/// Any failure (unreadable body, malformed JSON, wrong field types, failed
/// field checks) is rejected with a 400 carrying only `T::INVALID_MESSAGE`.
/// The content type is not checked.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Payload,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            debug!(error = %e, "Failed to read request body");
            ApiError::bad_request(T::INVALID_MESSAGE)
        })?;

        let value: T = serde_json::from_slice(&bytes).map_err(|e| {
            debug!(error = %e, "Failed to parse request body");
            ApiError::bad_request(T::INVALID_MESSAGE)
        })?;

        let mut errors = ValidationErrorBuilder::new();
        value.validate(&mut errors);
        errors.finish(T::INVALID_MESSAGE)?;

        Ok(Self(value))
    }
}
