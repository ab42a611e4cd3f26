use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};

use crate::controllers::report_controller::{dashboard, my_usage, usage_history};
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::state::AppState;

/// Historial de uso: completo para admin, propio para el resto
pub fn create_usage_router(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", get(usage_history))
        .route_layer(from_fn(admin_only_middleware));

    Router::new()
        .route("/me", get(my_usage))
        .merge(admin)
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
}

pub fn create_dashboard_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route_layer(from_fn(admin_only_middleware))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
}
