use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use scheduling_service::SchedulingError;
use serde::{Deserialize, Serialize};
use store_layer::StoreError;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// Standard API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Error type/code
    pub error_type: String,
    /// Human-readable error message
    pub message: String,
    /// Timestamp when error occurred
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Standard API success response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

/// Response metadata for pagination, etc.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub page: i32,
    pub page_size: i32,
    pub total_pages: i32,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource_type}")]
    NotFound { resource_type: String },

    #[error("Resource conflict: {message}")]
    Conflict { message: String },

    #[error("Resource gone: {message}")]
    Gone { message: String },

    #[error("Unprocessable entity: {message}")]
    UnprocessableEntity { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Create a simple validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource_type: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Gone { .. } => StatusCode::GONE,
            ApiError::UnprocessableEntity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Conflict { .. } => "conflict",
            ApiError::Gone { .. } => "gone",
            ApiError::UnprocessableEntity { .. } => "unprocessable_entity",
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::Internal { .. } => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        // Log the error with correlation ID
        error!(
            error_id = %error_id,
            error_type = %self.error_type(),
            status_code = %status_code.as_u16(),
            error = %self,
            "API error occurred"
        );

        let error_response = ApiErrorResponse {
            error_id,
            error_type: self.error_type().to_string(),
            message: self.to_string(),
            timestamp: chrono::Utc::now(),
        };

        (status_code, Json(error_response)).into_response()
    }
}

/// Map business failures from the scheduling core onto HTTP semantics.
impl From<SchedulingError> for ApiError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::SlotUnavailable { .. }
            | SchedulingError::ConflictingAppointment { .. } => ApiError::Conflict {
                message: err.to_string(),
            },
            SchedulingError::HoldExpired { .. } => ApiError::Gone {
                message: err.to_string(),
            },
            SchedulingError::ReferralNotEligible { .. }
            | SchedulingError::ChangeWindowClosed { .. }
            | SchedulingError::InvalidAppointmentTransition { .. }
            | SchedulingError::InvalidReferralTransition { .. }
            | SchedulingError::InvalidReportTransition { .. } => ApiError::UnprocessableEntity {
                message: err.to_string(),
            },
            SchedulingError::Validation(message) => ApiError::Validation { message },
            SchedulingError::Store(store_err) => store_err.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, .. } => ApiError::NotFound {
                resource_type: entity.to_string(),
            },
            StoreError::DuplicateId { .. } => ApiError::Conflict {
                message: err.to_string(),
            },
            StoreError::Storage(message) => ApiError::Internal { message },
            StoreError::InternalError(inner) => ApiError::Internal {
                message: inner.to_string(),
            },
        }
    }
}

/// Convert anyhow errors to API errors
impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        ApiError::Internal {
            message: error.to_string(),
        }
    }
}

/// Helper function to create successful API responses
pub fn api_success<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
        metadata: None,
    }
}

/// Helper function to create successful API responses with metadata
pub fn api_success_with_meta<T>(data: T, metadata: ResponseMetadata) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
        metadata: Some(metadata),
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
