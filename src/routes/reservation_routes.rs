use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};

use crate::controllers::reservation_controller::{
    admin_pick_up, admin_return, list_fleet, list_open, pick_up, reserve, return_vehicle,
};
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::state::AppState;

/// Flota vista por los conductores: reservar, retirar, devolver
pub fn create_fleet_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_fleet))
        .route("/:vehicle_id/reserve", post(reserve))
        .route("/:vehicle_id/pickup", post(pick_up))
        .route("/:vehicle_id/return", post(return_vehicle))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
}

/// Consola de reservas (sólo admin)
pub fn create_reservation_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_open))
        .route("/:usage_id/pickup", post(admin_pick_up))
        .route("/:usage_id/return", post(admin_return))
        .route_layer(from_fn(admin_only_middleware))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
}
