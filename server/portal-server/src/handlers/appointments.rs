use axum::{
    extract::{Path, Query, State},
    Json,
};
use scheduling_service::{Appointment, AppointmentQuery};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::PortalServer;
use crate::types::PaginationParams;

/// Request body for booking an appointment directly against a slot.
#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub referral_id: Uuid,
    pub slot_id: Uuid,
}

/// Request body for cancelling an appointment.
#[derive(Debug, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: String,
}

/// Request body for moving an appointment to a new slot.
#[derive(Debug, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub new_slot_id: Uuid,
}

/// Book an appointment for a referral on a specific slot.
pub async fn create_appointment(
    State(server): State<PortalServer>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    let appointment = server
        .scheduler
        .create(request.referral_id, request.slot_id)
        .await?;
    Ok(Json(api_success(appointment)))
}

/// Fetch an appointment by id.
pub async fn get_appointment(
    State(server): State<PortalServer>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    let appointment = server.scheduler.require(appointment_id).await?;
    Ok(Json(api_success(appointment)))
}

/// List appointments filtered by patient and date range.
pub async fn list_appointments(
    State(server): State<PortalServer>,
    Query(filter): Query<AppointmentQuery>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<Appointment>>>, ApiError> {
    let appointments = server.scheduler.find_appointments(&filter).await?;
    Ok(Json(pagination.paginate(appointments)))
}

/// Cancel an appointment. Refused inside the 24-hour change window.
pub async fn cancel_appointment(
    State(server): State<PortalServer>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    if request.reason.trim().is_empty() {
        return Err(ApiError::validation("cancellation reason must not be empty"));
    }
    let appointment = server
        .scheduler
        .cancel(appointment_id, request.reason)
        .await?;
    Ok(Json(api_success(appointment)))
}

/// Move an appointment to a new slot, subject to the 24-hour guard.
pub async fn reschedule_appointment(
    State(server): State<PortalServer>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<RescheduleAppointmentRequest>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    let appointment = server
        .scheduler
        .reschedule(appointment_id, request.new_slot_id)
        .await?;
    Ok(Json(api_success(appointment)))
}

/// Mark a confirmed appointment as underway.
pub async fn start_appointment(
    State(server): State<PortalServer>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    let appointment = server.scheduler.start(appointment_id).await?;
    Ok(Json(api_success(appointment)))
}

/// Complete an in-progress appointment.
pub async fn complete_appointment(
    State(server): State<PortalServer>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    let appointment = server.scheduler.complete(appointment_id).await?;
    Ok(Json(api_success(appointment)))
}

/// Record that the patient did not show up for a confirmed appointment.
pub async fn mark_no_show(
    State(server): State<PortalServer>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    let appointment = server.scheduler.mark_no_show(appointment_id).await?;
    Ok(Json(api_success(appointment)))
}
