//! YellowShield server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yellowshield_api::{AppState, RateLimiterState, app};
use yellowshield_common::Config;
use yellowshield_core::{AuthService, ComplaintService};
use yellowshield_db::repositories::{ComplaintRepository, UserRepository};

/// How often stale rate limit windows are dropped.
const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Waits for SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, shutting down");
        },
        () = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("failed to read .env");
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yellowshield=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting YellowShield server");

    let config = Config::load().context("failed to load configuration")?;

    let db = yellowshield_db::init(&config).await?;
    info!("Connected to database");

    yellowshield_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);
    let complaint_repo = ComplaintRepository::new(Arc::clone(&db));
    let user_repo = UserRepository::new(Arc::clone(&db));

    let complaint_service = ComplaintService::new(complaint_repo, &config);
    let auth_service = AuthService::new(user_repo);

    match &config.admin {
        Some(seed) => {
            auth_service.ensure_admin(seed).await?;
        }
        None => info!("No admin account configured, skipping seeding"),
    }

    if !config.auth.enforce_admin {
        warn!("Admin enforcement is disabled; dashboard routes are open to anyone");
    }

    if config.server.trust_proxy {
        info!("Rate limiting keys on X-Forwarded-For / X-Real-IP");
    }

    let rate_limiter = RateLimiterState::new().with_trust_proxy(config.server.trust_proxy);
    let cleanup_limiter = rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            cleanup_limiter.cleanup().await;
        }
    });

    let state = AppState {
        complaint_service,
        auth_service,
        enforce_admin: config.auth.enforce_admin,
    };

    let app = app(state, rate_limiter)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shutdown complete");
    Ok(())
}
