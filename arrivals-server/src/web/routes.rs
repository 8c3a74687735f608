//! HTTP route handlers.
//!
//! Handlers only read the cache; they never call the upstream feed.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use tower_http::trace::TraceLayer;

use crate::refresh::Freshness;

use super::dto::{BoardResponse, HealthResponse, render_text};
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(arrivals_text))
        .route("/arrivals.txt", get(arrivals_text))
        .route("/arrivals_json", get(arrivals_json))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Arrivals board as JSON.
async fn arrivals_json(State(state): State<AppState>) -> Json<BoardResponse> {
    let snapshot = state.cache.read().await;
    Json(BoardResponse::from_snapshot(&snapshot))
}

/// Arrivals board as plain text.
async fn arrivals_text(State(state): State<AppState>) -> String {
    let snapshot = state.cache.read().await;
    render_text(&snapshot)
}

/// Health check. Responds 503 once data has gone stale.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.health.status().await;
    let freshness = status.freshness(Utc::now(), state.stale_after);

    let code = match freshness {
        Freshness::Stale => StatusCode::SERVICE_UNAVAILABLE,
        Freshness::Starting | Freshness::Fresh => StatusCode::OK,
    };

    (code, Json(HealthResponse::new(&status, freshness)))
}
