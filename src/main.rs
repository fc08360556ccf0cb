use axum::{routing::get, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use goroda::{
    core::{CITY_CATALOG, CLEANUP_INTERVAL_SECONDS, DEFAULT_PORT},
    routes::{health, websocket},
    state::AppState,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "goroda=info,tower_http=warn".into()),
        )
        .init();

    tracing::info!("Goroda game server starting...");

    // Force the catalog to load before accepting connections
    tracing::info!("Catalog ready: {} cities", CITY_CATALOG.len());

    let state = AppState::new();

    // Sweep abandoned rooms in the background
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(CLEANUP_INTERVAL_SECONDS));
        loop {
            interval.tick().await;
            let removed = cleanup_state.registry.write().await.cleanup_stale_rooms();
            if removed > 0 {
                tracing::info!("Cleaned up {} stale rooms", removed);
            }
        }
    });

    // Mobile clients connect from unknown origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/ws", get(websocket::websocket_handler))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = format!("0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await.expect("Server error");
}
