//! Historial de uso y panel de administración

use axum::extract::{Extension, Json, State};

use crate::dto::dashboard_dto::DashboardStats;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::usage::UsageRecord;
use crate::repositories::VehicleOrder;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub async fn usage_history(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<UsageRecord>>>, AppError> {
    Ok(Json(ApiResponse::success(state.usages.list_all().await?)))
}

pub async fn my_usage(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<UsageRecord>>>, AppError> {
    Ok(Json(ApiResponse::success(state.usages.list_by_user(user.user_id).await?)))
}

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let vehicles = state.vehicles.list(VehicleOrder::ByName).await?;
    let total_infractions = state.infractions.count().await?;
    Ok(Json(ApiResponse::success(DashboardStats::from_fleet(&vehicles, total_infractions))))
}
