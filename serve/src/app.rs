//! Axum app: state, router, middleware, and the SPA fallback.
//!
//! Five POST routes under `/api/*`, one per capability. Any unmatched route
//! falls through to the single-page app's entry document so the API and the
//! static site share one origin.

use std::path::Path;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::handlers;

/// Max JSON body size. Code snippets can be large; matches the original
/// deployment's 10mb limit.
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Shared state: the gateway built once at startup and injected into every
/// handler. No ambient lookup, no other shared mutable state.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<devmentor::Gateway>,
}

/// Builds the router. When `static_dir` is set, unmatched routes serve the
/// SPA (files when they exist, `index.html` otherwise); without it, they get
/// a JSON 404.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/api/explain", post(handlers::explain))
        .route("/api/debug", post(handlers::debug))
        .route("/api/summarize", post(handlers::summarize))
        .route("/api/quiz", post(handlers::quiz))
        .route("/api/roadmap", post(handlers::roadmap))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => {
            let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
            api.fallback_service(spa)
        }
        None => api.fallback(handlers::not_found),
    };

    router
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}
