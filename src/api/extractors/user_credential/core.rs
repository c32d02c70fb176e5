use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::UserCredential;

/// Extractor for the gate's credential.
/// Requires the authorization gate to have run for this route; without it the
/// request is rejected with 401.
impl<S> FromRequestParts<S> for UserCredential
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserCredential>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
