//! Router de la API
//!
//! Monta todas las rutas bajo `/api` con CORS y trazas HTTP.

pub mod auth_routes;
pub mod infraction_routes;
pub mod report_routes;
pub mod reservation_routes;
pub mod user_routes;
pub mod vehicle_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes::auth_routes(&state))
        .nest("/fleet", reservation_routes::create_fleet_router(&state))
        .nest("/reservations", reservation_routes::create_reservation_router(&state))
        .nest("/vehicles", vehicle_routes::create_vehicle_router(&state))
        .nest("/users", user_routes::create_user_router(&state))
        .nest("/infractions", infraction_routes::create_infraction_router(&state))
        .nest("/usage", report_routes::create_usage_router(&state))
        .nest("/dashboard", report_routes::create_dashboard_router(&state));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config)),
        )
        .with_state(state)
}

/// Endpoint de salud
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "fleet_manager",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
