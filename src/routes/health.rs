use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};

use crate::{core::CITY_CATALOG, state::AppState};

/// Root path - redirect to the health endpoint
pub async fn root() -> Redirect {
    Redirect::to("/health")
}

/// Health check with registry and catalog stats
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.registry.read().await;

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "rooms": registry.stats(),
            "catalog_cities": CITY_CATALOG.len(),
        })),
    )
}
