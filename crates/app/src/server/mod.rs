//! HTTP shell around the synthesis core

pub mod routes;
pub mod types;

use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::assembly::{AssemblyMode, Mixer};
use crate::config::AppConfig;
use crate::orchestrator::{Orchestrator, ProviderSet};

/// Shared, read-only state behind every handler.
pub struct AppState {
    pub config: AppConfig,
    pub orchestrator: Orchestrator,
    pub providers: Arc<ProviderSet>,
    pub mixer: Arc<Mixer>,
    pub mode: AssemblyMode,
    pub start_time: Instant,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/synthesize", post(routes::synthesize))
        .route("/synthesize_text", post(routes::synthesize_text))
        .route("/synthesize_combined", post(routes::synthesize_combined))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        // The service fronts a browser app; mirror its permissive CORS.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
