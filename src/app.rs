/*
 * Responsibility
 * - Load Config → build collaborators → assemble the Router
 * - Apply middleware (request id / tracing / body limit / cookies)
 * - Start with axum::serve()
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::services::{
    Forwarder,
    oauth::OAuthClientFactory,
    session::ValkeySessionStore,
};
use crate::state::{AppState, Upstreams};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,deck_proxy=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get lost.
        tracing::error!(?info, "panic");

        // Development: crash the whole process so it gets noticed.
        // Production: default behavior, the server keeps running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting proxy in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, config.request_body_limit);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build process-level collaborators and inject them into the shared state.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let sessions =
        ValkeySessionStore::connect(&config.valkey_url, config.session_key_prefix.clone())
            .await
            .context("failed to connect to session store")?;

    let http = http_client(config.upstream_timeout)?;

    let clients = OAuthClientFactory::new(http, config.issuer.clone(), config.privileged.clone());
    let forwarder = Forwarder::new(Arc::new(clients), config.request_body_limit);

    Ok(AppState::new(
        Arc::new(sessions),
        config.session_cookie_name.clone(),
        Arc::new(forwarder),
        Upstreams {
            api_url: config.api_url.clone(),
            uaa_url: config.uaa_url.clone(),
        },
    ))
}

/// One HTTP client for upstream calls and token endpoint calls; `timeout`
/// bounds both.
///
/// Redirects are not followed: an upstream 3xx goes back to the caller as-is,
/// and token requests never leave the configured token URL.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .context("failed to build http client")
}

pub fn build_router(state: AppState, body_limit: usize) -> Router {
    let router = api::routes(&state).with_state(state);
    middleware::http::apply(router, body_limit)
}
