use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::user_controller::UserController;
use crate::dto::user_dto::{CreateUserRequest, SetActiveRequest, SetRoleRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::{admin_only_middleware, auth_middleware, AuthenticatedUser};
use crate::models::user::User;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Administración de usuarios (sólo admin)
pub fn create_user_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id/active", patch(set_active))
        .route("/:id/role", patch(set_role))
        .route_layer(from_fn(admin_only_middleware))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    let users = UserController::new(&state).list().await?;
    Ok(Json(ApiResponse::success(users)))
}

async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let response = UserController::new(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn set_active(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let response = UserController::new(&state)
        .set_active(actor.user_id, id, request.active)
        .await?;
    Ok(Json(response))
}

async fn set_role(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetRoleRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let response = UserController::new(&state)
        .set_role(actor.user_id, id, request.role)
        .await?;
    Ok(Json(response))
}
