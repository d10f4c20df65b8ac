//! Error types for the Catalog API service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use lyceum_auth_core::AuthError;
use lyceum_billing_core::BillingError;
use lyceum_catalog_core::CatalogError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Course not found")]
    CourseNotFound,

    #[error("Lesson not found")]
    LessonNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation failed on {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error")]
    Database(#[from] lyceum_db::DbError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CourseNotFound | Self::LessonNotFound | Self::UserNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::ExternalService(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CourseNotFound => "COURSE_NOT_FOUND",
            Self::LessonNotFound => "LESSON_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) | Self::Database(_) => "INTERNAL_ERROR",
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Validation { field, message } => {
                let mut fields = serde_json::Map::new();
                fields.insert((*field).to_string(), serde_json::json!([message]));
                Some(serde_json::Value::Object(fields))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log internal errors
        if matches!(self, Self::Internal(_) | Self::Database(_)) {
            tracing::error!(error = ?self, "Internal API error");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CourseNotFound => Self::CourseNotFound,
            CatalogError::LessonNotFound => Self::LessonNotFound,
            CatalogError::Forbidden(msg) => Self::Forbidden(msg.to_string()),
            CatalogError::Validation { field, message } => Self::Validation { field, message },
            CatalogError::Database(e) => Self::Database(e),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::CourseNotFound => Self::CourseNotFound,
            BillingError::LessonNotFound => Self::LessonNotFound,
            BillingError::InvalidPaymentTarget => Self::Validation {
                field: "paid_course",
                message: "exactly one of paid course or paid lesson must be set".to_string(),
            },
            BillingError::InvalidAmount => Self::Validation {
                field: "amount",
                message: "amount must be positive".to_string(),
            },
            BillingError::ProviderError(msg) => Self::ExternalService(msg),
            BillingError::Database(e) => Self::Database(e),
            BillingError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                Self::Unauthorized("invalid credentials".to_string())
            }
            AuthError::TokenExpired => Self::Unauthorized("token expired".to_string()),
            AuthError::InvalidToken | AuthError::WrongTokenUse => {
                Self::Unauthorized("invalid token".to_string())
            }
            AuthError::Hash(msg) => Self::Internal(msg),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
