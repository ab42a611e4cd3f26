//! Endpoints del ciclo de reservas
//!
//! Las respuestas devuelven el registro modificado; el cliente vuelve a
//! pedir `/api/fleet` para refrescar la vista.

use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::dto::usage_dto::StampRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::usage::{Stamp, UsageRecord};
use crate::services::reservation_service::VehicleWithOccupant;
use crate::state::AppState;
use crate::utils::errors::AppError;

type UsageResponse = Result<Json<ApiResponse<UsageRecord>>, AppError>;

/// Flota con el ocupante de cada vehículo
pub async fn list_fleet(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<VehicleWithOccupant>>>, AppError> {
    let fleet = state.reservations.list_vehicles_with_occupant().await?;
    Ok(Json(ApiResponse::success(fleet)))
}

pub async fn reserve(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<UsageRecord>>), AppError> {
    let usage = state.reservations.reserve(&user.session(), vehicle_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(usage, "Vehículo reservado")),
    ))
}

pub async fn pick_up(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(vehicle_id): Path<Uuid>,
) -> UsageResponse {
    let usage = state.reservations.pick_up(&user.session(), vehicle_id).await?;
    Ok(Json(ApiResponse::success_with_message(usage, "Retirada registrada")))
}

pub async fn return_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(vehicle_id): Path<Uuid>,
) -> UsageResponse {
    let usage = state.reservations.return_vehicle(&user.session(), vehicle_id).await?;
    Ok(Json(ApiResponse::success_with_message(usage, "Devolución registrada")))
}

/// Consola de reservas: registros abiertos
pub async fn list_open(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<UsageRecord>>>, AppError> {
    let open = state.reservations.list_open_records(&user.session()).await?;
    Ok(Json(ApiResponse::success(open)))
}

pub async fn admin_pick_up(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(usage_id): Path<Uuid>,
    body: Option<Json<StampRequest>>,
) -> UsageResponse {
    let stamp = stamp_from(&state, body)?;
    let usage = state.reservations.admin_pick_up(&user.session(), usage_id, stamp).await?;
    Ok(Json(ApiResponse::success_with_message(usage, "Retirada registrada")))
}

pub async fn admin_return(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(usage_id): Path<Uuid>,
    body: Option<Json<StampRequest>>,
) -> UsageResponse {
    let stamp = stamp_from(&state, body)?;
    let usage = state.reservations.admin_return(&user.session(), usage_id, stamp).await?;
    Ok(Json(ApiResponse::success_with_message(usage, "Devolución registrada")))
}

fn stamp_from(
    state: &AppState,
    body: Option<Json<StampRequest>>,
) -> Result<Option<Stamp>, AppError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    request.to_stamp(state.clock.as_ref())
}
