pub mod route_routes;
pub mod stop_routes;
pub mod user_routes;
pub mod vehicle_routes;

use axum::{routing::get, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors_layer;
use crate::state::AppState;

/// Router completo de la API
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api/routes", route_routes::create_route_router())
        .nest("/api/stops", stop_routes::create_stop_router())
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/api/users", user_routes::create_user_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check simple
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
