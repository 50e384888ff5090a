//! HTTP server for the devmentor gateway (axum).
//!
//! Five JSON routes under `/api/*`, permissive CORS, a body-size limit, and a
//! catch-all that serves the prebuilt single-page app.
//!
//! **Public API**: [`build_router`], [`run_serve`], [`run_serve_on_listener`].

mod app;
mod handlers;

pub use app::{build_router, AppState};

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

/// Serves `router` on an existing listener. Split out so tests can bind
/// `127.0.0.1:0` and pass the listener in.
pub async fn run_serve_on_listener(
    listener: TcpListener,
    router: axum::Router,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = listener.local_addr()?;
    info!("devmentor listening on http://{}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}

/// Binds `0.0.0.0:<port>` from settings and serves the full app: API routes
/// plus the SPA directory from `settings.static_dir`.
pub async fn run_serve(
    settings: &config::Settings,
    gateway: Arc<devmentor::Gateway>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(("0.0.0.0", settings.port)).await?;
    let router = build_router(AppState { gateway }, Some(&settings.static_dir));
    run_serve_on_listener(listener, router).await
}
