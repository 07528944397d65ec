use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("driver is not available")]
    DriverUnavailable,

    #[error("vehicle mismatch: {0}")]
    VehicleTypeMismatch(String),

    #[error("rejection reason cannot be empty")]
    EmptyReason,

    #[error("request already finalized as {0}")]
    AlreadyFinalized(String),

    #[error("delivery already delivered")]
    AlreadyDelivered,

    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable kind, so calling layers can branch without
    /// parsing the message.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::InvalidCoordinate(_) => "invalid_coordinate",
            AppError::DriverUnavailable => "driver_unavailable",
            AppError::VehicleTypeMismatch(_) => "vehicle_type_mismatch",
            AppError::EmptyReason => "empty_reason",
            AppError::AlreadyFinalized(_) => "already_finalized",
            AppError::AlreadyDelivered => "already_delivered",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::Forbidden(_) => "forbidden",
            AppError::Conflict(_) => "conflict",
            AppError::Internal(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_)
            | AppError::InvalidCoordinate(_)
            | AppError::EmptyReason => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::DriverUnavailable
            | AppError::VehicleTypeMismatch(_)
            | AppError::AlreadyFinalized(_)
            | AppError::AlreadyDelivered
            | AppError::InvalidTransition { .. }
            | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}
