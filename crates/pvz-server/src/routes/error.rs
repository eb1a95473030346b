//! Domain error to HTTP response mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use pvz::DomainError;

use crate::models::ErrorResponse;

const INTERNAL_MESSAGE: &str = "internal server error";

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError(pub DomainError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::AlreadyExists { .. }
            | DomainError::AlreadyOpen { .. }
            | DomainError::AlreadyClosed { .. } => StatusCode::CONFLICT,
            DomainError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            DomainError::AccessDenied { .. } => StatusCode::FORBIDDEN,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorResponse {
        let message = if self.0.is_client_safe() {
            self.0.to_string()
        } else {
            INTERNAL_MESSAGE.to_string()
        };

        ErrorResponse {
            code: self.0.code().to_string(),
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if !self.0.is_client_safe() {
            tracing::error!("Request failed: {}", self.0);
        }
        (self.status(), Json(self.body())).into_response()
    }
}
