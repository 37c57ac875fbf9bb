// HTTP API error types
use axum::response::{IntoResponse, Response};

use crate::response::ApiResponse;
use crate::status::BusinessCode;

/// API error with a business outcome code and a client-safe message.
///
/// Gate failures and collaborator failures both flow through this type; it
/// renders as a uniform error envelope (`data: null`) at the transport status
/// registered for its code.
#[derive(Debug)]
pub enum ApiError {
    // Hard 401: missing/malformed/expired credential
    Unauthenticated(String),

    // Soft business outcomes
    Forbidden(String),
    BadRequest(String),
    ValidationFailed(String),
    NotFound(String),
    Conflict(String),
    BusinessError(String),

    // Hard transport outcomes
    Timeout,
    InternalServerError(String),
    ServiceUnavailable(String),
}

impl ApiError {
    /// Business code carried in the envelope.
    pub fn business_code(&self) -> BusinessCode {
        match self {
            ApiError::Unauthenticated(_) => BusinessCode::Unauthorized,
            ApiError::Forbidden(_) => BusinessCode::Forbidden,
            ApiError::BadRequest(_) => BusinessCode::ParamInvalid,
            ApiError::ValidationFailed(_) => BusinessCode::ValidationFailed,
            ApiError::NotFound(_) => BusinessCode::NotFound,
            ApiError::Conflict(_) => BusinessCode::AlreadyExists,
            ApiError::BusinessError(_) => BusinessCode::Error,
            ApiError::Timeout => BusinessCode::Timeout,
            ApiError::InternalServerError(_) => BusinessCode::InternalError,
            ApiError::ServiceUnavailable(_) => BusinessCode::ServiceBusy,
        }
    }

    /// Client-safe message. Internal detail stays in the server log.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthenticated(msg)
            | ApiError::Forbidden(msg)
            | ApiError::BadRequest(msg)
            | ApiError::ValidationFailed(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::BusinessError(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
            ApiError::InternalServerError(_) => "Internal server error",
            ApiError::Timeout => "Request timed out",
        }
    }
}

// Static constructor helpers
impl ApiError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        ApiError::ValidationFailed(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn business(message: impl Into<String>) -> Self {
        ApiError::BusinessError(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InternalServerError(detail) => {
                write!(f, "internal server error: {}", detail)
            }
            other => write!(f, "{}", other.message()),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::InternalServerError(detail) = &self {
            tracing::error!("internal error: {}", detail);
        }
        let envelope: ApiResponse<()> = match self.business_code() {
            BusinessCode::Unauthorized => ApiResponse::unauthorized(self.message()),
            BusinessCode::Forbidden => ApiResponse::operation_forbidden(self.message()),
            BusinessCode::ParamInvalid => ApiResponse::parameter_invalid(self.message()),
            BusinessCode::ValidationFailed => ApiResponse::validation_failed(self.message()),
            BusinessCode::NotFound => ApiResponse::resource_not_found(self.message()),
            BusinessCode::AlreadyExists => ApiResponse::resource_exists(self.message()),
            BusinessCode::Error => ApiResponse::business_error(self.message()),
            BusinessCode::Timeout => ApiResponse::request_timeout(),
            BusinessCode::ServiceBusy => ApiResponse::service_unavailable(self.message()),
            BusinessCode::InternalError | BusinessCode::Success => {
                ApiResponse::internal_error(self.message())
            }
        };
        envelope.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn internal_error_message_never_leaks_detail() {
        let err = ApiError::internal("db connection refused: 10.0.0.3:5432");
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn error_kinds_map_onto_the_registry() {
        assert_eq!(
            ApiError::unauthenticated("x").business_code().transport_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::forbidden("x").business_code().transport_status(),
            StatusCode::OK
        );
        assert_eq!(
            ApiError::not_found("x").business_code().transport_status(),
            StatusCode::OK
        );
    }
}
