use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use scheduling_service::{Modality, Slot, SlotQuery, SlotStatus};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::PortalServer;
use crate::types::PaginationParams;

/// Request body for importing a slot from a center's schedule.
#[derive(Debug, Deserialize)]
pub struct ImportSlotRequest {
    pub center_id: Uuid,
    pub modality: Modality,
    pub body_part: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price: Decimal,
}

/// List slots filtered by center, modality, status, and date range.
/// Expired holds are swept before listing so stale reservations never hide
/// slots that should be available.
pub async fn list_slots(
    State(server): State<PortalServer>,
    Query(filter): Query<SlotQuery>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<Slot>>>, ApiError> {
    let slots = server.scheduler.find_slots(&filter).await?;
    Ok(Json(pagination.paginate(slots)))
}

/// Fetch a single slot by id.
pub async fn get_slot(
    State(server): State<PortalServer>,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Slot>>, ApiError> {
    let slot = server.slots.require(slot_id).await?;
    Ok(Json(api_success(slot)))
}

/// Import a new available slot.
pub async fn import_slot(
    State(server): State<PortalServer>,
    Json(request): Json<ImportSlotRequest>,
) -> Result<Json<ApiResponse<Slot>>, ApiError> {
    if request.end_time <= request.start_time {
        return Err(ApiError::validation("slot end_time must be after start_time"));
    }
    if request.price < Decimal::ZERO {
        return Err(ApiError::validation("slot price must not be negative"));
    }

    let slot = Slot {
        id: Uuid::new_v4(),
        center_id: request.center_id,
        modality: request.modality,
        body_part: request.body_part,
        start_time: request.start_time,
        end_time: request.end_time,
        price: request.price,
        status: SlotStatus::Available,
    };
    let slot = server.slots.import(slot).await?;
    Ok(Json(api_success(slot)))
}
