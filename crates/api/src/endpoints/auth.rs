//! Authentication endpoints.

#![allow(missing_docs)]

use axum::{
    Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use validator::Validate;
use yellowshield_common::AppResult;
use yellowshield_core::{AuthenticatedUser, ChangePasswordInput, RegisterInput, UserRole};
use yellowshield_db::entities::user;

use crate::{
    extractors::{AppJson, AuthSession},
    middleware::AppState,
    rate_limit::{RateLimiterState, rate_limit_auth_middleware, rate_limit_signup_middleware},
    response::{Created, MessageResponse},
};

/// Account as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub department: String,
    pub role: UserRole,
    pub created_at: DateTime<FixedOffset>,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            full_name: u.full_name,
            department: u.department,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

/// `{user, token}` body returned by register, login and password change.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub token: String,
}

impl From<AuthenticatedUser> for SessionResponse {
    fn from(auth: AuthenticatedUser) -> Self {
        Self {
            user: auth.user.into(),
            token: auth.token,
        }
    }
}

/// Register request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 128))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub full_name: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Change password request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Create an account.
async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> AppResult<Created<SessionResponse>> {
    req.validate()?;

    let input = RegisterInput {
        username: req.username,
        email: req.email,
        password: req.password,
        full_name: req.full_name,
        department: req.department,
        role: req.role,
    };

    let session = state.auth_service.register(input).await?;
    Ok(Created(session.into()))
}

/// Log in with email and password.
async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<Json<SessionResponse>> {
    let session = state.auth_service.login(&req.email, &req.password).await?;
    Ok(Json(session.into()))
}

/// Current account, for restoring a stored session.
async fn me(AuthSession(session): AuthSession) -> Json<UserResponse> {
    Json(session.user.into())
}

/// End the session by rotating the token.
async fn logout(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
) -> AppResult<MessageResponse> {
    state.auth_service.logout(&session.user.id).await?;
    Ok(MessageResponse::new("Logged out successfully"))
}

/// Change password. The response carries the new token.
async fn change_password(
    AuthSession(session): AuthSession,
    State(state): State<AppState>,
    AppJson(req): AppJson<ChangePasswordRequest>,
) -> AppResult<Json<SessionResponse>> {
    let input = ChangePasswordInput {
        current_password: req.current_password,
        new_password: req.new_password,
    };

    let updated = state
        .auth_service
        .change_password(&session.user.id, input)
        .await?;
    Ok(Json(updated.into()))
}

pub fn router(limiter: RateLimiterState) -> Router<AppState> {
    Router::new()
        .route(
            "/register",
            post(register).layer(from_fn_with_state(
                limiter.clone(),
                rate_limit_signup_middleware,
            )),
        )
        .route(
            "/login",
            post(login).layer(from_fn_with_state(
                limiter.clone(),
                rate_limit_auth_middleware,
            )),
        )
        .route(
            "/change-password",
            post(change_password).layer(from_fn_with_state(limiter, rate_limit_auth_middleware)),
        )
        .route("/me", get(me))
        .route("/logout", post(logout))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_user_response_omits_secrets() {
        let model = user::Model {
            id: "u1".to_string(),
            username: "tara".to_string(),
            email: "tara@campus.edu".to_string(),
            password: "$argon2id$hash".to_string(),
            token: Some("secret".to_string()),
            full_name: "Tara".to_string(),
            department: "History".to_string(),
            role: UserRole::Admin,
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let json = serde_json::to_value(UserResponse::from(model)).unwrap();
        assert_eq!(json["fullName"], "Tara");
        assert_eq!(json["role"], "admin");
        assert!(json.get("password").is_none());
        assert!(json.get("token").is_none());
    }

    #[test]
    fn test_register_request_validation() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username":"tara","email":"bad","password":"password123"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());

        let req: RegisterRequest = serde_json::from_str(
            r#"{"username":"tara","email":"tara@campus.edu","password":"password123","fullName":"Tara"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.full_name.as_deref(), Some("Tara"));
    }
}
