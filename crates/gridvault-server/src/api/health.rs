use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Body of the plain-text liveness route
pub const LIVENESS_TEXT: &str = "✅ API is running!";

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(liveness))
        .route("/health", get(health_check))
}
