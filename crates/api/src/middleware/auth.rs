//! Authentication extractors.
//!
//! Provides extractors for requiring a verified bearer token (and optionally
//! the admin role) in route handlers. The `Authorization` header carries the
//! raw signed token; a conventional `Bearer ` prefix is also accepted.
//!
//! Request auth status flows `Unauthenticated -> Authenticated{user_id, role}
//! -> Authorized | Forbidden`: token verification happens first, so a missing
//! or invalid token is always 401 even on admin-gated routes, and a valid
//! token with the wrong role is 403.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use secrecy::ExposeSecret;

use crate::error::ApiError;
use crate::services::auth::{TokenIdentity, verify_token};
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(principal): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, user {}!", principal.user_id)
/// }
/// ```
pub struct RequireUser(pub TokenIdentity);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = verify_request(parts, state)?;
        Ok(Self(identity))
    }
}

/// Extractor that requires a valid bearer token with the admin role.
///
/// Rejects with 401 when the token is missing or invalid, and 403 when the
/// token is valid but the principal is not an admin.
pub struct RequireAdmin(pub TokenIdentity);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = verify_request(parts, state)?;

        if !identity.role.is_admin() {
            return Err(ApiError::Forbidden);
        }

        Ok(Self(identity))
    }
}

/// Pull the token out of the `Authorization` header and verify it.
fn verify_request(parts: &Parts, state: &AppState) -> Result<TokenIdentity, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

    let value = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid token".to_string()))?;

    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        return Err(ApiError::Unauthorized("No token provided".to_string()));
    }

    verify_token(token, state.config().jwt_secret.expose_secret())
        .map_err(|e| ApiError::Auth(e.into()))
}
