//! Blife Healthy Storefront - Marketplace web app.
//!
//! This binary serves the marketplace on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework with plain forms (post/redirect/get)
//! - Askama templates for server-side rendering
//! - A role-gated view resolver deciding every page
//! - Marketplace data in a key-value store (in memory, or files under
//!   `BLIFE_DATA_DIR`)
//! - Mock sign-in: an email and a role, no password

#![cfg_attr(not(test), forbid(unsafe_code))]

use blife_storefront::config::StorefrontConfig;
use blife_storefront::state::AppState;
use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "blife_storefront=info,tower_http=debug";

/// Set up Sentry (when a DSN is configured) and the tracing subscriber.
///
/// Sentry has to be initialized first so the tracing layer finds a client.
/// The returned guard flushes pending events when dropped.
fn init_telemetry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let guard = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: config.sentry_environment.clone().map(Into::into),
                sample_rate: config.sentry_sample_rate,
                traces_sample_rate: config.sentry_traces_sample_rate,
                attach_stacktrace: true,
                ..Default::default()
            },
        ))
    });

    // Warnings and errors become Sentry events, chatter becomes breadcrumbs
    let sentry_layer = sentry_tracing::layer().event_filter(|metadata| match *metadata.level() {
        Level::ERROR | Level::WARN => EventFilter::Event,
        Level::INFO | Level::DEBUG => EventFilter::Breadcrumb,
        Level::TRACE => EventFilter::Ignore,
    });

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_layer)
        .init();

    if guard.is_some() {
        tracing::info!("Sentry initialized");
    }
    guard
}

#[tokio::main]
async fn main() {
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");
    let _sentry_guard = init_telemetry(&config);

    let addr = config.socket_addr();
    match &config.data_dir {
        Some(dir) => tracing::info!(data_dir = %dir.display(), "Using file storage"),
        None => tracing::info!("Using in-memory storage; data resets on restart"),
    }

    let state = AppState::from_config(config).expect("Failed to open data directory");
    let app = blife_storefront::app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!("storefront listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Resolve on Ctrl+C, or on SIGTERM where the platform has it.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.expect("Failed to install Ctrl+C handler"),
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");

    tracing::info!("Shutdown signal received, draining connections");
}
