//! Bearer-token session extractors

use crate::state::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap, StatusCode};
use lectern_core::auth::AuthUser;

/// Pull the bearer token out of an Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Required authentication: rejects with 401 when the token is missing or
/// invalid
pub struct AuthSession(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or((StatusCode::UNAUTHORIZED, "Missing bearer token".to_string()))?;
        let user = state
            .auth
            .verify(token)
            .await
            .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;
        Ok(Self(user))
    }
}

/// Optional authentication: anonymous requests (and requests with a dead
/// token) pass through as `None`, matching the reader's fall-back-to-empty
/// behavior for signed-out users
pub struct MaybeUser(pub Option<AuthUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match bearer_token(&parts.headers) {
            Some(token) => state.auth.verify(token).await.ok(),
            None => None,
        };
        Ok(Self(user))
    }
}
