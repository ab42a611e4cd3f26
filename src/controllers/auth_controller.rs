use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
};

use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::User;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

/// Endpoint de registro
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let user = state.auth.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(user, "Registro completado")),
    ))
}

/// Endpoint de login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let response = state.auth.login(payload).await?;
    Ok(Json(ApiResponse::success_with_message(response, "Login successful")))
}

/// Usuario actual
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state
        .users
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| not_found_error("User", &user.user_id.to_string()))?;
    Ok(Json(ApiResponse::success(user)))
}
