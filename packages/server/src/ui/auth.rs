//! Authenticated-identity seam for the REST layer.
//!
//! Session and credential handling live outside this service. The external
//! authentication layer verifies the caller and forwards the resulting
//! user id in the `x-user-id` header; this extractor is the only place the
//! REST handlers learn who is calling. Requests without a valid header are
//! rejected with `401 Unauthorized`, mirroring the original API's
//! unauthenticated responses.

use axum::{extract::FromRequestParts, http::StatusCode, http::request::Parts};

use crate::domain::UserId;

/// Header carrying the verified user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// The verified identity of the caller, extracted per request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserId);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let user_id =
            UserId::new(header_value.to_string()).map_err(|_| StatusCode::UNAUTHORIZED)?;

        Ok(AuthenticatedUser(user_id))
    }
}
