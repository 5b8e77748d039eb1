//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use tamarind_core::{Email, Role};

use crate::error::{ApiError, Result};
use crate::middleware::RequireUser;
use crate::models::User;
use crate::services::auth::{AuthService, AuthSession};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response for successful registration or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub role: Role,
    pub name: String,
    pub email: Email,
}

/// Response for `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: User,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            success: true,
            token: session.token,
            role: session.role,
            name: session.name,
            email: session.email,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new user.
///
/// # Errors
///
/// Returns 400 for missing/invalid fields, 409 when the email is taken.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let name = required(body.name.as_deref(), "name")?;
    let email = required(body.email.as_deref(), "email")?;
    let password = required(body.password.as_deref(), "password")?;

    let service = auth_service(&state);
    let session = service.register(name, email, password).await?;

    tracing::info!(email = %session.email, role = %session.role, "user registered");

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Login with email and password.
///
/// # Errors
///
/// Returns 401 with a single generic message for unknown email and wrong
/// password alike.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let email = required(body.email.as_deref(), "email")?;
    let password = required(body.password.as_deref(), "password")?;

    let service = auth_service(&state);
    let session = service.login(email, password).await?;

    Ok(Json(session.into()))
}

/// Get the authenticated user's profile.
///
/// # Errors
///
/// Returns 401 without a valid token.
pub async fn me(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>> {
    let service = auth_service(&state);
    let user = service.get_user(principal.user_id).await?;

    Ok(Json(MeResponse {
        success: true,
        user,
    }))
}

fn auth_service(state: &AppState) -> AuthService<'_> {
    AuthService::new(
        state.pool(),
        &state.config().jwt_secret,
        &state.config().admin_emails,
    )
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::Validation(format!("{field} is required"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field_present() {
        assert_eq!(required(Some("alice"), "name").unwrap(), "alice");
    }

    #[test]
    fn test_required_field_missing_or_empty() {
        assert!(required(None, "name").is_err());
        assert!(required(Some(""), "name").is_err());
    }

    #[test]
    fn test_auth_response_shape() {
        let response = AuthResponse {
            success: true,
            token: "tok".into(),
            role: Role::Admin,
            name: "Riyas".into(),
            email: Email::parse("riyas@gmail.com").unwrap(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["token"], "tok");
        assert_eq!(json["role"], "admin");
        assert_eq!(json["name"], "Riyas");
        assert_eq!(json["email"], "riyas@gmail.com");
    }
}
