use axum::{
    extract::{Path, State},
    Json,
};
use scheduling_service::{Appointment, Hold};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::PortalServer;

/// Request body for placing a hold on a slot.
#[derive(Debug, Deserialize)]
pub struct PlaceHoldRequest {
    pub slot_id: Uuid,
    pub referral_id: Uuid,
    pub duration_minutes: i64,
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub released: usize,
}

#[derive(Debug, Serialize)]
pub struct ReleaseResponse {
    pub released: bool,
}

/// Place a time-boxed hold on an available slot.
pub async fn place_hold(
    State(server): State<PortalServer>,
    Json(request): Json<PlaceHoldRequest>,
) -> Result<Json<ApiResponse<Hold>>, ApiError> {
    let hold = server
        .holds
        .place(request.slot_id, request.referral_id, request.duration_minutes)
        .await?;
    Ok(Json(api_success(hold)))
}

/// Fetch a hold. An expired hold is released and reported as gone.
pub async fn get_hold(
    State(server): State<PortalServer>,
    Path(hold_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Hold>>, ApiError> {
    let hold = server.holds.inspect(hold_id).await?;
    Ok(Json(api_success(hold)))
}

/// Confirm a hold into a booked appointment.
pub async fn confirm_hold(
    State(server): State<PortalServer>,
    Path(hold_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    let appointment = server.scheduler.confirm_hold(hold_id).await?;
    Ok(Json(api_success(appointment)))
}

/// Give up a hold, returning its slot to available.
pub async fn release_hold(
    State(server): State<PortalServer>,
    Path(hold_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReleaseResponse>>, ApiError> {
    let released = server.holds.release(hold_id).await?;
    Ok(Json(api_success(ReleaseResponse { released })))
}

/// Proactively release all expired holds.
pub async fn sweep_holds(
    State(server): State<PortalServer>,
) -> Result<Json<ApiResponse<SweepResponse>>, ApiError> {
    let released = server.holds.sweep_expired().await?;
    Ok(Json(api_success(SweepResponse { released })))
}
