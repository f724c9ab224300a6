//! HTTP API layer for YellowShield.
//!
//! - **Endpoints**: complaint lifecycle and account routes under `/api`
//! - **Extractors**: session, optional session and admin guard
//! - **Middleware**: bearer-token sessions and rate limiting
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod rate_limit;
pub mod response;

use axum::{Router, middleware::from_fn_with_state, routing::get};

pub use endpoints::router;
pub use middleware::AppState;
pub use rate_limit::{ApiRateLimiter, RateLimitConfig, RateLimiterState};

/// Liveness banner served at `/`.
pub const BANNER: &str = "YellowShield API is running";

/// Full application: banner, `/api` routes and the session layer.
///
/// Transport layers (tracing, CORS) are left to the caller.
pub fn app(state: AppState, limiter: RateLimiterState) -> Router {
    Router::new()
        .route("/", get(|| async { BANNER }))
        .nest("/api", router(limiter))
        .layer(from_fn_with_state(state.clone(), middleware::auth_middleware))
        .with_state(state)
}
