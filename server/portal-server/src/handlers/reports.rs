use axum::{
    extract::{Path, State},
    Json,
};
use scheduling_service::Report;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::PortalServer;

/// Request body for opening a report draft.
#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    pub appointment_id: Uuid,
}

/// Request body for editing or amending a report.
#[derive(Debug, Deserialize)]
pub struct ReportBodyRequest {
    #[serde(default)]
    pub impression: String,
    #[serde(default)]
    pub findings: String,
}

/// Open a draft report for an appointment.
pub async fn create_report(
    State(server): State<PortalServer>,
    Json(request): Json<CreateReportRequest>,
) -> Result<Json<ApiResponse<Report>>, ApiError> {
    let report = server.reports.create_draft(request.appointment_id).await?;
    Ok(Json(api_success(report)))
}

/// Fetch a report by id.
pub async fn get_report(
    State(server): State<PortalServer>,
    Path(report_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Report>>, ApiError> {
    let report = server.reports.require(report_id).await?;
    Ok(Json(api_success(report)))
}

/// Update the body of an unfinalized report.
pub async fn update_report(
    State(server): State<PortalServer>,
    Path(report_id): Path<Uuid>,
    Json(request): Json<ReportBodyRequest>,
) -> Result<Json<ApiResponse<Report>>, ApiError> {
    let report = server
        .reports
        .update(report_id, request.impression, request.findings)
        .await?;
    Ok(Json(api_success(report)))
}

/// Finalize a report; requires non-empty impression and findings.
pub async fn finalize_report(
    State(server): State<PortalServer>,
    Path(report_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Report>>, ApiError> {
    let report = server.reports.finalize(report_id).await?;
    Ok(Json(api_success(report)))
}

/// Attach an addendum to a finalized report.
pub async fn amend_report(
    State(server): State<PortalServer>,
    Path(report_id): Path<Uuid>,
    Json(request): Json<ReportBodyRequest>,
) -> Result<Json<ApiResponse<Report>>, ApiError> {
    let report = server
        .reports
        .amend(report_id, &request.impression, &request.findings)
        .await?;
    Ok(Json(api_success(report)))
}

/// Cancel an unfinalized report.
pub async fn cancel_report(
    State(server): State<PortalServer>,
    Path(report_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Report>>, ApiError> {
    let report = server.reports.cancel(report_id).await?;
    Ok(Json(api_success(report)))
}
