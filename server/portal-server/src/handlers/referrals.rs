use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use scheduling_service::{Modality, Referral, ReferralStatus, SafetyScreening};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::PortalServer;

/// Request body for referral intake.
#[derive(Debug, Deserialize)]
pub struct CreateReferralRequest {
    pub patient_id: Uuid,
    pub referrer_id: Uuid,
    pub modality: Modality,
    pub body_part: String,
    #[serde(default)]
    pub safety_screening: SafetyScreening,
}

/// Register a new referral in pending status.
pub async fn create_referral(
    State(server): State<PortalServer>,
    Json(request): Json<CreateReferralRequest>,
) -> Result<Json<ApiResponse<Referral>>, ApiError> {
    if request.body_part.trim().is_empty() {
        return Err(ApiError::validation("referral body_part must not be empty"));
    }

    let now = Utc::now();
    let referral = Referral {
        id: Uuid::new_v4(),
        patient_id: request.patient_id,
        referrer_id: request.referrer_id,
        modality: request.modality,
        body_part: request.body_part,
        status: ReferralStatus::Pending,
        safety_screening: request.safety_screening,
        created_at: now,
        updated_at: now,
    };
    let referral = server.referrals.intake(referral).await?;
    Ok(Json(api_success(referral)))
}

/// Fetch a referral by id.
pub async fn get_referral(
    State(server): State<PortalServer>,
    Path(referral_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Referral>>, ApiError> {
    let referral = server.referrals.require(referral_id).await?;
    Ok(Json(api_success(referral)))
}

/// Approve a pending referral (safety screening must be completed).
pub async fn approve_referral(
    State(server): State<PortalServer>,
    Path(referral_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Referral>>, ApiError> {
    let referral = server.referrals.approve(referral_id).await?;
    Ok(Json(api_success(referral)))
}

/// Cancel a referral. Terminal: the referral can no longer yield bookings.
pub async fn cancel_referral(
    State(server): State<PortalServer>,
    Path(referral_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Referral>>, ApiError> {
    let referral = server.referrals.cancel(referral_id).await?;
    Ok(Json(api_success(referral)))
}
