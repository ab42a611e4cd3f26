use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::dto::infraction_dto::InfractionRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::infraction::Infraction;
use crate::state::AppState;
use crate::utils::errors::AppError;

type InfractionList = Result<Json<ApiResponse<Vec<Infraction>>>, AppError>;

pub async fn list(State(state): State<AppState>) -> InfractionList {
    Ok(Json(ApiResponse::success(state.infractions.list().await?)))
}

/// Multas atribuidas al conductor de la sesión
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> InfractionList {
    Ok(Json(ApiResponse::success(
        state.infractions.list_for_driver(user.user_id).await?,
    )))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<InfractionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Infraction>>), AppError> {
    let infraction = state.infractions.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(infraction, "Multa registrada")),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InfractionRequest>,
) -> Result<Json<ApiResponse<Infraction>>, AppError> {
    let infraction = state.infractions.update(id, payload).await?;
    Ok(Json(ApiResponse::success_with_message(infraction, "Multa actualizada")))
}
