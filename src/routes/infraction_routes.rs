use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, put},
    Router,
};

use crate::controllers::infraction_controller::{create, list, list_mine, update};
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::state::AppState;

pub fn create_infraction_router(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", get(list).post(create))
        .route("/:id", put(update))
        .route_layer(from_fn(admin_only_middleware));

    Router::new()
        .route("/me", get(list_mine))
        .merge(admin)
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
}
