//! Request extractors.

#![allow(missing_docs)]

use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request, rejection::JsonRejection},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use yellowshield_common::AppError;
use yellowshield_db::entities::user;

use crate::middleware::AppState;

/// An authenticated user and the bearer token they presented.
///
/// Inserted into request extensions by
/// [`auth_middleware`](crate::middleware::auth_middleware).
#[derive(Debug, Clone)]
pub struct Session {
    pub user: user::Model,
    pub token: String,
}

impl Session {
    /// Whether this session may act on `user_id`'s records.
    #[must_use]
    pub fn can_access_user(&self, user_id: &str) -> bool {
        self.user.is_admin() || self.user.id == user_id
    }
}

/// Authenticated session extractor.
#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(AuthSession)
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional session extractor.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Session>().cloned()))
    }
}

/// Gate for reviewer routes.
///
/// With `enforce_admin` on, rejects anonymous requests with 401 and
/// non-admin sessions with 403. With it off, every request passes.
#[derive(Debug, Clone)]
pub struct AdminGuard(pub Option<Session>);

impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().cloned();

        if !state.enforce_admin {
            return Ok(Self(session));
        }

        match session {
            None => Err(AppError::Unauthorized),
            Some(session) if !session.user.is_admin() => {
                Err(AppError::Forbidden("Admin access required".to_string()))
            }
            Some(session) => Ok(Self(Some(session))),
        }
    }
}

/// JSON body extractor whose rejections use the API error envelope.
///
/// Deserializer detail is logged, never returned to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!(error = %rejection.body_text(), "Rejected JSON body");
                Err(AppError::BadRequest(json_rejection_message(&rejection).to_string()))
            }
        }
    }
}

const fn json_rejection_message(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::JsonDataError(_) => "Invalid field in request body",
        JsonRejection::JsonSyntaxError(_) => "Malformed JSON body",
        JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
        _ => "Invalid request body",
    }
}

/// Like [`AppJson`], but an empty body deserializes as `T::default()`.
///
/// Used where every field is optional and a bare request is meaningful
/// enough to reach the service's own validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOrDefault<T>(pub T);

impl<T, S> FromRequest<S> for JsonOrDefault<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            debug!(error = %e, "Failed to read request body");
            AppError::BadRequest("Invalid request body".to_string())
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        serde_json::from_slice(&bytes).map(Self).map_err(|e| {
            debug!(error = %e, "Rejected JSON body");
            AppError::BadRequest("Malformed JSON body".to_string())
        })
    }
}
