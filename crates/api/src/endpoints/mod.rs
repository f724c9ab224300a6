//! API endpoints.

mod auth;
mod complaints;

pub use auth::{SessionResponse, UserResponse};
pub use complaints::{ClearHistoryResponse, ComplaintResponse, StatusResponse};

use axum::Router;

use crate::middleware::AppState;
use crate::rate_limit::RateLimiterState;

/// Create the API router.
pub fn router(limiter: RateLimiterState) -> Router<AppState> {
    Router::new()
        .nest("/complaints", complaints::router(limiter.clone()))
        .nest("/auth", auth::router(limiter))
}
