//! Rate limiting for abuse-prone endpoints.
//!
//! Fixed-window counters keyed by session user or client IP. The public
//! status lookup is limited to slow down ticket-suffix guessing; the auth
//! endpoints to slow down credential stuffing.

#![allow(missing_docs)]

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::RwLock;

use crate::extractors::Session;

/// Rate limit configuration for an endpoint group.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Window length in seconds.
    pub window_secs: u64,
}

impl RateLimitConfig {
    /// Create a new rate limit config.
    #[must_use]
    pub const fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
        }
    }
}

/// Limits per endpoint group.
pub mod limits {
    use super::RateLimitConfig;

    /// Public ticket status lookup.
    pub const STATUS_LOOKUP: RateLimitConfig = RateLimitConfig::new(30, 60);

    /// Login and password change.
    pub const AUTH: RateLimitConfig = RateLimitConfig::new(10, 300);

    /// Account registration.
    pub const SIGNUP: RateLimitConfig = RateLimitConfig::new(20, 3600);

    /// Longest window in use; drives cleanup.
    pub const MAX_WINDOW_SECS: u64 = 3600;
}

#[derive(Debug, Clone)]
struct Window {
    count: u32,
    started: Instant,
}

/// In-memory fixed-window rate limiter.
#[derive(Clone, Default)]
pub struct ApiRateLimiter {
    windows: Arc<RwLock<HashMap<String, Window>>>,
}

impl ApiRateLimiter {
    /// Create a new rate limiter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request for `key` and report whether it is allowed.
    pub async fn check(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult {
        let mut windows = self.windows.write().await;
        let now = Instant::now();
        let length = Duration::from_secs(config.window_secs);

        let window = windows.entry(key.to_string()).or_insert_with(|| Window {
            count: 0,
            started: now,
        });

        if now.duration_since(window.started) >= length {
            window.count = 0;
            window.started = now;
        }

        let reset = length
            .saturating_sub(now.duration_since(window.started))
            .as_secs();

        if window.count >= config.max_requests {
            return RateLimitResult::Limited {
                retry_after: reset.max(1),
                limit: config.max_requests,
            };
        }

        window.count += 1;

        RateLimitResult::Allowed {
            remaining: config.max_requests.saturating_sub(window.count),
            limit: config.max_requests,
            reset,
        }
    }

    /// Drop windows older than twice `max_window_secs`.
    pub async fn cleanup(&self, max_window_secs: u64) {
        let mut windows = self.windows.write().await;
        let now = Instant::now();
        let horizon = Duration::from_secs(max_window_secs.saturating_mul(2));

        windows.retain(|_, w| now.duration_since(w.started) < horizon);
    }

    /// Number of tracked keys.
    pub async fn key_count(&self) -> usize {
        self.windows.read().await.len()
    }
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    Allowed {
        /// Requests left in the window.
        remaining: u32,
        limit: u32,
        /// Seconds until the window resets.
        reset: u64,
    },
    Limited {
        /// Seconds until the window resets.
        retry_after: u64,
        limit: u32,
    },
}

/// Limiters shared by the rate limiting middleware.
#[derive(Clone, Default)]
pub struct RateLimiterState {
    /// Keyed by session user.
    pub user_limiter: ApiRateLimiter,
    /// Keyed by client IP, for anonymous requests.
    pub ip_limiter: ApiRateLimiter,
    /// Key anonymous requests on `X-Forwarded-For` / `X-Real-IP` instead
    /// of the socket peer. Only safe behind a proxy that overwrites them.
    pub trust_proxy: bool,
}

impl RateLimiterState {
    /// Create a new rate limiter state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether proxy headers identify the client.
    #[must_use]
    pub const fn with_trust_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    /// Drop stale windows from both limiters.
    pub async fn cleanup(&self) {
        self.user_limiter.cleanup(limits::MAX_WINDOW_SECS).await;
        self.ip_limiter.cleanup(limits::MAX_WINDOW_SECS).await;
    }
}

/// 429 response.
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        tracing::debug!(retry_after = self.retry_after, "Rate limit exceeded");

        let body = axum::Json(serde_json::json!({
            "error": {
                "code": "RATE_LIMITED",
                "message": "Too many requests",
                "retryAfter": self.retry_after
            }
        }));

        (
            StatusCode::TOO_MANY_REQUESTS,
            [(RETRY_AFTER, self.retry_after.to_string())],
            body,
        )
            .into_response()
    }
}

/// Client IP for anonymous rate limiting.
///
/// The socket peer, unless `trust_proxy` is set, in which case proxy
/// headers win and the peer is the fallback.
fn extract_client_ip(req: &Request<Body>, trust_proxy: bool) -> Option<IpAddr> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    if !trust_proxy {
        return peer;
    }

    let forwarded = || -> Option<IpAddr> {
        req.headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|ip| ip.trim().parse().ok())
    };

    let real_ip = || -> Option<IpAddr> {
        req.headers()
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|ip| ip.trim().parse().ok())
    };

    forwarded().or_else(real_ip).or(peer)
}

/// Rate limiting for the public status lookup.
pub async fn rate_limit_lookup_middleware(
    State(limiter): State<RateLimiterState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, RateLimitError> {
    rate_limit_with_config(limiter, req, next, &limits::STATUS_LOOKUP).await
}

/// Rate limiting for login and password change.
pub async fn rate_limit_auth_middleware(
    State(limiter): State<RateLimiterState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, RateLimitError> {
    rate_limit_with_config(limiter, req, next, &limits::AUTH).await
}

/// Rate limiting for registration.
pub async fn rate_limit_signup_middleware(
    State(limiter): State<RateLimiterState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, RateLimitError> {
    rate_limit_with_config(limiter, req, next, &limits::SIGNUP).await
}

async fn rate_limit_with_config(
    limiter: RateLimiterState,
    req: Request<Body>,
    next: Next,
    config: &RateLimitConfig,
) -> Result<Response, RateLimitError> {
    let user_key = req
        .extensions()
        .get::<Session>()
        .map(|session| format!("user:{}", session.user.id));

    let result = match user_key {
        Some(key) => limiter.user_limiter.check(&key, config).await,
        None => {
            let key = extract_client_ip(&req, limiter.trust_proxy)
                .map_or_else(|| "unknown".to_string(), |ip| format!("ip:{ip}"));
            limiter.ip_limiter.check(&key, config).await
        }
    };

    match result {
        RateLimitResult::Allowed {
            remaining,
            limit,
            reset,
        } => {
            let mut response = next.run(req).await;

            let headers = response.headers_mut();
            headers.insert("X-RateLimit-Limit", limit.into());
            headers.insert("X-RateLimit-Remaining", remaining.into());
            headers.insert("X-RateLimit-Reset", reset.into());

            Ok(response)
        }
        RateLimitResult::Limited { retry_after, .. } => Err(RateLimitError { retry_after }),
    }
}
