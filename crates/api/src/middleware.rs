//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use yellowshield_core::{AuthService, ComplaintService};

use crate::extractors::Session;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub complaint_service: ComplaintService,
    pub auth_service: AuthService,
    /// Require admin sessions on review routes and owning sessions on
    /// history routes.
    pub enforce_admin: bool,
}

/// Session middleware.
///
/// Resolves `Authorization: Bearer <token>` and attaches a [`Session`] to the
/// request. Requests with a missing or unknown token pass through without
/// one; extractors decide whether that is acceptable.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string);

    if let Some(token) = token {
        match state.auth_service.authenticate_by_token(&token).await {
            Ok(user) => {
                req.extensions_mut().insert(Session { user, token });
            }
            Err(e) if e.is_server_error() => {
                tracing::error!(error = %e, "Session lookup failed");
            }
            Err(_) => {
                tracing::debug!("Ignoring unknown bearer token");
            }
        }
    }

    next.run(req).await
}
