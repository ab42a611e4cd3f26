use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::controllers::auth_controller::{login, me, register};
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

/// Configura las rutas de autenticación
pub fn auth_routes(state: &AppState) -> Router<AppState> {
    let session = Router::new()
        .route("/me", get(me))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(session)
}
