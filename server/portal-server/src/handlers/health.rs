use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::HashMap;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::PortalServer;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall system health status
    pub status: String,
    /// Current timestamp in RFC3339 format
    pub timestamp: String,
    /// API version
    pub version: String,
    /// Individual service health checks
    pub checks: HashMap<String, String>,
}

/// Version information response
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    /// Application name
    pub name: String,
    /// Application version
    pub version: String,
    /// Enabled features
    pub features: Vec<String>,
}

/// Health check handler
pub async fn health_check(
    State(_server): State<PortalServer>,
) -> Result<Json<ApiResponse<HealthResponse>>, ApiError> {
    let mut checks = HashMap::new();

    // The in-memory store has no external connectivity to probe.
    checks.insert("store".to_string(), "healthy".to_string());
    checks.insert("scheduler".to_string(), "healthy".to_string());

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    };

    Ok(Json(api_success(response)))
}

/// Version information handler
pub async fn version_info(
    State(server): State<PortalServer>,
) -> Result<Json<ApiResponse<VersionResponse>>, ApiError> {
    let features = vec![
        "slot-ledger".to_string(),
        "booking-holds".to_string(),
        "referral-lifecycle".to_string(),
        "report-finalization".to_string(),
    ];

    let response = VersionResponse {
        name: server.config.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        features,
    };

    Ok(Json(api_success(response)))
}
